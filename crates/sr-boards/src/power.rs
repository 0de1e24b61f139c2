//! 电源板
//!
//! 七路输出口、电池传感器、蜂鸣器、启动按钮和两个状态 LED。

use crate::{Board, BoardError};
use parking_lot::Mutex;
use sr_backend::{BoardKind, Discovered, PowerBoardBackend, PowerBoardLed};
use sr_types::{Pitch, PowerOutputPosition, ValueError};
use std::fmt;
use std::ops::Index;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct State {
    backend: Box<dyn PowerBoardBackend>,
    run_led: bool,
    error_led: bool,
}

struct Inner {
    serial: String,
    state: Mutex<State>,
}

/// 电源板
#[derive(Clone)]
pub struct PowerBoard {
    inner: Arc<Inner>,
}

impl PowerBoard {
    pub fn new(serial: impl Into<String>, backend: Box<dyn PowerBoardBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                serial: serial.into(),
                state: Mutex::new(State {
                    backend,
                    run_led: false,
                    error_led: false,
                }),
            }),
        }
    }

    /// 全部输出口
    pub fn outputs(&self) -> PowerOutputs<'_> {
        PowerOutputs {
            outputs: PowerOutputPosition::ALL.map(|position| PowerOutput {
                board: self,
                position,
            }),
        }
    }

    pub fn output(&self, position: PowerOutputPosition) -> PowerOutput<'_> {
        PowerOutput {
            board: self,
            position,
        }
    }

    pub fn battery_sensor(&self) -> BatterySensor<'_> {
        BatterySensor { board: self }
    }

    pub fn piezo(&self) -> Piezo<'_> {
        Piezo { board: self }
    }

    pub fn start_button(&self) -> StartButton<'_> {
        StartButton { board: self }
    }

    /// 运行 LED（绿色）
    pub fn run_led(&self) -> Led<'_> {
        Led {
            board: self,
            led: PowerBoardLed::Run,
        }
    }

    /// 错误 LED（红色）
    pub fn error_led(&self) -> Led<'_> {
        Led {
            board: self,
            led: PowerBoardLed::Error,
        }
    }

    fn with_backend<R>(
        &self,
        f: impl FnOnce(&mut dyn PowerBoardBackend) -> Result<R, sr_backend::BackendError>,
    ) -> Result<R, BoardError> {
        let mut state = self.inner.state.lock();
        Ok(f(state.backend.as_mut())?)
    }
}

impl From<Discovered<dyn PowerBoardBackend>> for PowerBoard {
    fn from(found: Discovered<dyn PowerBoardBackend>) -> Self {
        Self::new(found.serial_number, found.backend)
    }
}

impl Board for PowerBoard {
    const KIND: BoardKind = BoardKind::PowerBoard;

    fn serial_number(&self) -> &str {
        &self.inner.serial
    }

    fn firmware_version(&self) -> Result<Option<String>, BoardError> {
        self.with_backend(|b| b.firmware_version())
    }

    /// 关闭所有输出口
    fn make_safe(&self) -> Result<(), BoardError> {
        debug!("Making power board {} safe", self.inner.serial);
        self.outputs().power_off()
    }
}

impl fmt::Debug for PowerBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBoard")
            .field("serial", &self.inner.serial)
            .finish_non_exhaustive()
    }
}

/// 电源板输出口
#[derive(Clone, Copy)]
pub struct PowerOutput<'a> {
    board: &'a PowerBoard,
    position: PowerOutputPosition,
}

impl PowerOutput<'_> {
    pub fn position(&self) -> PowerOutputPosition {
        self.position
    }

    pub fn is_enabled(&self) -> Result<bool, BoardError> {
        self.board.with_backend(|b| b.output_enabled(self.position))
    }

    pub fn set_is_enabled(&self, enabled: bool) -> Result<(), BoardError> {
        self.board
            .with_backend(|b| b.set_output_enabled(self.position, enabled))
    }

    /// 输出电流（A）
    pub fn current(&self) -> Result<f32, BoardError> {
        self.board.with_backend(|b| b.output_current(self.position))
    }
}

impl fmt::Debug for PowerOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerOutput")
            .field("board", &self.board.inner.serial)
            .field("position", &self.position)
            .finish()
    }
}

/// 全部输出口，可按位置索引
#[derive(Debug, Clone, Copy)]
pub struct PowerOutputs<'a> {
    outputs: [PowerOutput<'a>; 7],
}

impl<'a> PowerOutputs<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &PowerOutput<'a>> {
        self.outputs.iter()
    }

    /// 打开所有输出口
    pub fn power_on(&self) -> Result<(), BoardError> {
        self.set_all(true)
    }

    /// 关闭所有输出口
    pub fn power_off(&self) -> Result<(), BoardError> {
        self.set_all(false)
    }

    fn set_all(&self, enabled: bool) -> Result<(), BoardError> {
        self.outputs
            .iter()
            .try_for_each(|output| output.set_is_enabled(enabled))
    }
}

impl<'a> Index<PowerOutputPosition> for PowerOutputs<'a> {
    type Output = PowerOutput<'a>;

    fn index(&self, position: PowerOutputPosition) -> &PowerOutput<'a> {
        &self.outputs[position.index()]
    }
}

/// 电池传感器
#[derive(Clone, Copy)]
pub struct BatterySensor<'a> {
    board: &'a PowerBoard,
}

impl BatterySensor<'_> {
    /// 电池电压（V）
    pub fn voltage(&self) -> Result<f32, BoardError> {
        self.board.with_backend(|b| b.battery_voltage())
    }

    /// 电池电流（A）
    pub fn current(&self) -> Result<f32, BoardError> {
        self.board.with_backend(|b| b.battery_current())
    }
}

/// 蜂鸣器
#[derive(Clone, Copy)]
pub struct Piezo<'a> {
    board: &'a PowerBoard,
}

impl Piezo<'_> {
    /// 发声（非阻塞）
    ///
    /// # 错误
    /// - `BoardError::Value`: 频率为 0
    pub fn buzz(&self, duration: Duration, pitch: impl Into<Pitch>) -> Result<(), BoardError> {
        let pitch = pitch.into().validate()?;
        self.board
            .with_backend(|b| b.buzz(duration, pitch.frequency()))
    }

    /// 以秒为单位的时长发声
    ///
    /// # 错误
    /// - `BoardError::Value`: 时长为负数、NaN 或无穷，或频率为 0
    pub fn buzz_secs(&self, seconds: f64, pitch: impl Into<Pitch>) -> Result<(), BoardError> {
        if !seconds.is_finite() {
            return Err(ValueError::NotFinite { field: "buzz duration" }.into());
        }
        let duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
            ValueError::InvalidValue {
                field: "buzz duration",
                value: seconds.to_string(),
            }
        })?;
        self.buzz(duration, pitch)
    }
}

/// 启动按钮
#[derive(Clone, Copy)]
pub struct StartButton<'a> {
    board: &'a PowerBoard,
}

impl StartButton<'_> {
    /// 上次读取以来按钮是否被按下过
    pub fn is_pressed(&self) -> Result<bool, BoardError> {
        self.board.with_backend(|b| b.start_button_pressed())
    }
}

/// 电源板状态 LED
#[derive(Clone, Copy)]
pub struct Led<'a> {
    board: &'a PowerBoard,
    led: PowerBoardLed,
}

impl Led<'_> {
    /// 最近一次设置的状态
    pub fn is_on(&self) -> bool {
        let state = self.board.inner.state.lock();
        match self.led {
            PowerBoardLed::Run => state.run_led,
            PowerBoardLed::Error => state.error_led,
        }
    }

    pub fn set(&self, on: bool) -> Result<(), BoardError> {
        let mut state = self.board.inner.state.lock();
        state.backend.set_led(self.led, on)?;
        match self.led {
            PowerBoardLed::Run => state.run_led = on,
            PowerBoardLed::Error => state.error_led = on,
        }
        Ok(())
    }

    pub fn on(&self) -> Result<(), BoardError> {
        self.set(true)
    }

    pub fn off(&self) -> Result<(), BoardError> {
        self.set(false)
    }

    pub fn toggle(&self) -> Result<(), BoardError> {
        self.set(!self.is_on())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::sim::Simulation;
    use sr_types::Note;

    fn board() -> (Simulation, PowerBoard) {
        let sim = Simulation::new().with_power_board("SRPB1");
        let board = sim
            .environment()
            .discover_power_boards()
            .unwrap()
            .into_iter()
            .map(PowerBoard::from)
            .next()
            .unwrap();
        (sim, board)
    }

    #[test]
    fn test_outputs_power_on_and_off() {
        let (sim, board) = board();
        board.outputs().power_on().unwrap();
        assert!(sim.power_board("SRPB1").unwrap().lock().outputs.iter().all(|&o| o));

        board.make_safe().unwrap();
        assert!(sim.power_board("SRPB1").unwrap().lock().outputs.iter().all(|&o| !o));
    }

    #[test]
    fn test_output_index_and_current() {
        let (sim, board) = board();
        sim.power_board("SRPB1").unwrap().lock().output_currents[4] = 1.5;

        let outputs = board.outputs();
        let l2 = outputs[PowerOutputPosition::L2];
        assert_eq!(l2.position(), PowerOutputPosition::L2);
        assert_eq!(l2.current().unwrap(), 1.5);

        l2.set_is_enabled(true).unwrap();
        assert!(board.output(PowerOutputPosition::L2).is_enabled().unwrap());
        assert!(!board.output(PowerOutputPosition::L3).is_enabled().unwrap());
    }

    #[test]
    fn test_battery_sensor() {
        let (sim, board) = board();
        {
            let state = sim.power_board("SRPB1").unwrap();
            let mut state = state.lock();
            state.battery_voltage = 11.8;
            state.battery_current = 0.75;
        }
        assert_eq!(board.battery_sensor().voltage().unwrap(), 11.8);
        assert_eq!(board.battery_sensor().current().unwrap(), 0.75);
    }

    #[test]
    fn test_piezo_validation() {
        let (sim, board) = board();
        board.piezo().buzz(Duration::from_millis(250), Note::A6).unwrap();
        board.piezo().buzz_secs(0.5, Pitch::Hz(440)).unwrap();

        assert!(matches!(
            board.piezo().buzz(Duration::from_millis(10), Pitch::Hz(0)),
            Err(BoardError::Value(_))
        ));
        assert!(matches!(
            board.piezo().buzz_secs(f64::NAN, Note::C6),
            Err(BoardError::Value(ValueError::NotFinite { .. }))
        ));
        assert!(matches!(
            board.piezo().buzz_secs(-1.0, Note::C6),
            Err(BoardError::Value(ValueError::InvalidValue { .. }))
        ));

        let buzzes = sim.power_board("SRPB1").unwrap().lock().buzzes.clone();
        assert_eq!(
            buzzes,
            vec![
                (Duration::from_millis(250), Note::A6.frequency()),
                (Duration::from_millis(500), 440)
            ]
        );
    }

    #[test]
    fn test_leds_track_state() {
        let (sim, board) = board();
        assert!(!board.run_led().is_on());
        board.run_led().toggle().unwrap();
        assert!(board.run_led().is_on());
        board.error_led().on().unwrap();

        let state = sim.power_board("SRPB1").unwrap();
        let state = state.lock();
        assert!(state.run_led);
        assert!(state.error_led);
    }

    #[test]
    fn test_clones_share_backend() {
        let (_sim, board) = board();
        let other = board.clone();
        other.output(PowerOutputPosition::H0).set_is_enabled(true).unwrap();
        assert!(board.output(PowerOutputPosition::H0).is_enabled().unwrap());
    }
}
