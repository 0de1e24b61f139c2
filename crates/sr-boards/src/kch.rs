//! KCH（树莓派扩展板）
//!
//! 三个用户 RGB LED 和一个启动 LED。没有 KCH 时所有操作只记录日志。

use crate::BoardError;
use parking_lot::Mutex;
use sr_backend::{Discovered, KchBackend};
use sr_types::{Colour, UserLed};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

struct State {
    backend: Option<Box<dyn KchBackend>>,
    leds: [Colour; 3],
    start_led: bool,
}

/// KCH
#[derive(Clone)]
pub struct Kch {
    state: Arc<Mutex<State>>,
}

impl Kch {
    pub fn new(backend: Option<Box<dyn KchBackend>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                backend,
                leds: [Colour::Off; 3],
                start_led: false,
            })),
        }
    }

    /// 没有连接 KCH
    pub fn absent() -> Self {
        Self::new(None)
    }

    pub fn is_present(&self) -> bool {
        self.state.lock().backend.is_some()
    }

    /// 最近一次设置的颜色
    pub fn led(&self, led: UserLed) -> Colour {
        self.state.lock().leds[led.index()]
    }

    pub fn set_led(&self, led: UserLed, colour: Colour) -> Result<(), BoardError> {
        let mut state = self.state.lock();
        match state.backend.as_mut() {
            Some(backend) => backend.set_user_led(led, colour)?,
            None => warn!("No KCH present, ignoring request to set LED {} to {:?}", led, colour),
        }
        state.leds[led.index()] = colour;
        Ok(())
    }

    pub fn start_led(&self) -> bool {
        self.state.lock().start_led
    }

    pub fn set_start_led(&self, on: bool) -> Result<(), BoardError> {
        let mut state = self.state.lock();
        match state.backend.as_mut() {
            Some(backend) => backend.set_start_led(on)?,
            None => debug!("No KCH present, ignoring start LED"),
        }
        state.start_led = on;
        Ok(())
    }

    /// 关闭全部 LED
    pub fn turn_off_leds(&self) -> Result<(), BoardError> {
        for led in UserLed::ALL {
            self.set_led(led, Colour::Off)?;
        }
        self.set_start_led(false)
    }
}

impl From<Option<Discovered<dyn KchBackend>>> for Kch {
    fn from(found: Option<Discovered<dyn KchBackend>>) -> Self {
        Self::new(found.map(|d| d.backend))
    }
}

impl fmt::Debug for Kch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Kch")
            .field("present", &state.backend.is_some())
            .field("leds", &state.leds)
            .field("start_led", &state.start_led)
            .finish()
    }
}
