//! Ruggeduino
//!
//! 引脚模式规则：
//! - 数字引脚 2..=13：`DigitalInput`、`DigitalInputPullup`、`DigitalOutput`
//! - 模拟引脚 A0..=A3：以上三种，外加 `AnalogueInput`
//! - A4/A5：保留给 I2C，任何设置和读写都会失败
//!
//! 初始模式：数字引脚为 `DigitalInput`，模拟引脚为 `AnalogueInput`。

use crate::{Board, BoardError};
use parking_lot::Mutex;
use sr_backend::{BackendError, BoardKind, Discovered, RuggeduinoBackend};
use sr_types::{GpioPinMode, PinId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const PIN_COUNT: usize = (PinId::LAST - PinId::FIRST + 1) as usize;

const DIGITAL_MODES: &[GpioPinMode] = &[
    GpioPinMode::DigitalInput,
    GpioPinMode::DigitalInputPullup,
    GpioPinMode::DigitalOutput,
];

const ANALOGUE_MODES: &[GpioPinMode] = &[
    GpioPinMode::DigitalInput,
    GpioPinMode::DigitalInputPullup,
    GpioPinMode::DigitalOutput,
    GpioPinMode::AnalogueInput,
];

fn slot(pin: PinId) -> usize {
    (pin.number() - PinId::FIRST) as usize
}

fn initial_mode(pin: PinId) -> GpioPinMode {
    if pin.is_analogue() {
        GpioPinMode::AnalogueInput
    } else {
        GpioPinMode::DigitalInput
    }
}

struct State {
    backend: Box<dyn RuggeduinoBackend>,
    modes: [GpioPinMode; PIN_COUNT],
}

struct Inner {
    serial: String,
    device: Option<String>,
    state: Mutex<State>,
}

/// Ruggeduino
#[derive(Clone)]
pub struct Ruggeduino {
    inner: Arc<Inner>,
}

impl Ruggeduino {
    pub fn new(
        serial: impl Into<String>,
        device: Option<String>,
        backend: Box<dyn RuggeduinoBackend>,
    ) -> Self {
        let mut modes = [GpioPinMode::DigitalInput; PIN_COUNT];
        for pin in PinId::all() {
            modes[slot(pin)] = initial_mode(pin);
        }
        Self {
            inner: Arc::new(Inner {
                serial: serial.into(),
                device,
                state: Mutex::new(State { backend, modes }),
            }),
        }
    }

    /// 设备路径（如 `/dev/ttyACM0`）
    pub fn device(&self) -> Option<&str> {
        self.inner.device.as_deref()
    }

    pub fn pin(&self, id: PinId) -> Pin<'_> {
        Pin { board: self, id }
    }

    /// 全部引脚（含保留引脚）
    pub fn pins(&self) -> impl Iterator<Item = Pin<'_>> {
        PinId::all().map(move |id| Pin { board: self, id })
    }
}

impl From<Discovered<dyn RuggeduinoBackend>> for Ruggeduino {
    fn from(found: Discovered<dyn RuggeduinoBackend>) -> Self {
        Self::new(found.serial_number, found.device, found.backend)
    }
}

impl Board for Ruggeduino {
    const KIND: BoardKind = BoardKind::Ruggeduino;

    fn serial_number(&self) -> &str {
        &self.inner.serial
    }

    fn firmware_version(&self) -> Result<Option<String>, BoardError> {
        Ok(self.inner.state.lock().backend.firmware_version()?)
    }

    /// 输出引脚恢复为 `DigitalInput`
    fn make_safe(&self) -> Result<(), BoardError> {
        debug!("Making Ruggeduino {} safe", self.inner.serial);
        self.pins()
            .filter(|pin| pin.mode() == GpioPinMode::DigitalOutput)
            .try_for_each(|pin| pin.set_mode(GpioPinMode::DigitalInput))
    }
}

impl fmt::Debug for Ruggeduino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruggeduino")
            .field("serial", &self.inner.serial)
            .field("device", &self.inner.device)
            .finish_non_exhaustive()
    }
}

/// Ruggeduino 引脚
#[derive(Clone, Copy)]
pub struct Pin<'a> {
    board: &'a Ruggeduino,
    id: PinId,
}

impl Pin<'_> {
    pub fn id(&self) -> PinId {
        self.id
    }

    /// 当前模式
    pub fn mode(&self) -> GpioPinMode {
        self.board.inner.state.lock().modes[slot(self.id)]
    }

    /// 该引脚支持的模式（保留引脚为空）
    pub fn supported_modes(&self) -> &'static [GpioPinMode] {
        if self.id.is_reserved() {
            &[]
        } else if self.id.is_analogue() {
            ANALOGUE_MODES
        } else {
            DIGITAL_MODES
        }
    }

    /// 设置模式
    ///
    /// # 错误
    /// - `BoardError::ReservedPin`: A4/A5
    /// - `BoardError::UnsupportedMode`: 该引脚不支持此模式
    pub fn set_mode(&self, mode: GpioPinMode) -> Result<(), BoardError> {
        self.check_reserved()?;
        if !self.supported_modes().contains(&mode) {
            return Err(BoardError::UnsupportedMode { pin: self.id, mode });
        }

        let mut state = self.board.inner.state.lock();
        state.backend.set_pin_mode(self.id, mode)?;
        state.modes[slot(self.id)] = mode;
        debug!("Ruggeduino {}: pin {} set to {}", self.board.inner.serial, self.id, mode);
        Ok(())
    }

    /// 数字电平
    ///
    /// 需要数字输入模式或 `DigitalOutput`（输出引脚返回最近写入的电平）。
    pub fn digital_state(&self) -> Result<bool, BoardError> {
        self.with_mode(
            |mode| mode.is_digital_input() || mode == GpioPinMode::DigitalOutput,
            "a digital mode",
            |backend, pin| backend.digital_read(pin),
        )
    }

    /// 写数字电平，需要 `DigitalOutput`
    pub fn set_digital_state(&self, state: bool) -> Result<(), BoardError> {
        self.with_mode(
            |mode| mode == GpioPinMode::DigitalOutput,
            "DIGITAL_OUTPUT",
            |backend, pin| backend.digital_write(pin, state),
        )
    }

    /// 模拟电压（V），需要 `AnalogueInput`
    pub fn analogue_value(&self) -> Result<f32, BoardError> {
        self.with_mode(
            |mode| mode == GpioPinMode::AnalogueInput,
            "ANALOGUE_INPUT",
            |backend, pin| backend.analogue_read(pin),
        )
    }

    fn check_reserved(&self) -> Result<(), BoardError> {
        if self.id.is_reserved() {
            return Err(BoardError::ReservedPin(self.id));
        }
        Ok(())
    }

    fn with_mode<R>(
        &self,
        allowed: impl Fn(GpioPinMode) -> bool,
        required: &'static str,
        op: impl FnOnce(&mut dyn RuggeduinoBackend, PinId) -> Result<R, BackendError>,
    ) -> Result<R, BoardError> {
        self.check_reserved()?;
        let mut state = self.board.inner.state.lock();
        let mode = state.modes[slot(self.id)];
        if !allowed(mode) {
            return Err(BoardError::BadPinMode {
                pin: self.id,
                mode,
                required,
            });
        }
        Ok(op(state.backend.as_mut(), self.id)?)
    }
}

impl fmt::Debug for Pin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pin")
            .field("board", &self.board.inner.serial)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::sim::Simulation;
    use sr_types::{A0, A3, A4, A5};

    fn board() -> (Simulation, Ruggeduino) {
        let sim = Simulation::new().with_ruggeduino("RUG1", Some("/dev/ttyACM0"));
        let found = sim.environment().discover_ruggeduinos().unwrap();
        let board = found.into_iter().map(Ruggeduino::from).next().unwrap();
        (sim, board)
    }

    fn pin(n: u8) -> PinId {
        PinId::new(n).unwrap()
    }

    #[test]
    fn test_initial_modes() {
        let (_sim, board) = board();
        assert_eq!(board.pin(pin(2)).mode(), GpioPinMode::DigitalInput);
        assert_eq!(board.pin(pin(13)).mode(), GpioPinMode::DigitalInput);
        assert_eq!(board.pin(A0).mode(), GpioPinMode::AnalogueInput);
        assert_eq!(board.device(), Some("/dev/ttyACM0"));
        assert_eq!(board.pins().count(), 18);
    }

    #[test]
    fn test_reserved_pins_reject_everything() {
        let (_sim, board) = board();
        for id in [A4, A5] {
            let p = board.pin(id);
            assert!(p.supported_modes().is_empty());
            for mode in GpioPinMode::ALL {
                assert!(matches!(p.set_mode(mode), Err(BoardError::ReservedPin(pin)) if pin == id));
            }
            assert!(matches!(p.digital_state(), Err(BoardError::ReservedPin(_))));
            assert!(matches!(p.analogue_value(), Err(BoardError::ReservedPin(_))));
            assert!(matches!(p.set_digital_state(true), Err(BoardError::ReservedPin(_))));
        }
    }

    #[test]
    fn test_unsupported_modes() {
        let (_sim, board) = board();
        let digital = board.pin(pin(5));
        assert!(matches!(
            digital.set_mode(GpioPinMode::AnalogueInput),
            Err(BoardError::UnsupportedMode { .. })
        ));
        assert!(matches!(
            digital.set_mode(GpioPinMode::PwmOutput),
            Err(BoardError::UnsupportedMode { .. })
        ));
        assert_eq!(digital.mode(), GpioPinMode::DigitalInput);

        board.pin(A3).set_mode(GpioPinMode::DigitalOutput).unwrap();
        board.pin(A3).set_mode(GpioPinMode::AnalogueInput).unwrap();
    }

    #[test]
    fn test_digital_output() {
        let (sim, board) = board();
        let led = board.pin(pin(13));

        assert!(matches!(
            led.set_digital_state(true),
            Err(BoardError::BadPinMode { required: "DIGITAL_OUTPUT", .. })
        ));

        led.set_mode(GpioPinMode::DigitalOutput).unwrap();
        led.set_digital_state(true).unwrap();
        assert!(led.digital_state().unwrap());
        assert!(sim.ruggeduino("RUG1").unwrap().lock().digital[&pin(13)]);
    }

    #[test]
    fn test_inputs() {
        let (sim, board) = board();
        let state = sim.ruggeduino("RUG1").unwrap();
        state.lock().digital.insert(pin(4), true);
        state.lock().analogue.insert(A0, 4.2);

        assert!(board.pin(pin(4)).digital_state().unwrap());
        assert_eq!(board.pin(A0).analogue_value().unwrap(), 4.2);

        assert!(matches!(
            board.pin(A0).digital_state(),
            Err(BoardError::BadPinMode { mode: GpioPinMode::AnalogueInput, .. })
        ));
        assert!(matches!(
            board.pin(pin(4)).analogue_value(),
            Err(BoardError::BadPinMode { required: "ANALOGUE_INPUT", .. })
        ));

        board.pin(pin(6)).set_mode(GpioPinMode::DigitalInputPullup).unwrap();
        assert!(board.pin(pin(6)).digital_state().unwrap());
        assert_eq!(state.lock().modes[&pin(6)], GpioPinMode::DigitalInputPullup);
    }

    #[test]
    fn test_make_safe_resets_outputs() {
        let (sim, board) = board();
        board.pin(pin(8)).set_mode(GpioPinMode::DigitalOutput).unwrap();
        board.pin(pin(9)).set_mode(GpioPinMode::DigitalInputPullup).unwrap();

        board.make_safe().unwrap();
        assert_eq!(board.pin(pin(8)).mode(), GpioPinMode::DigitalInput);
        assert_eq!(board.pin(pin(9)).mode(), GpioPinMode::DigitalInputPullup);
        assert_eq!(
            sim.ruggeduino("RUG1").unwrap().lock().modes[&pin(8)],
            GpioPinMode::DigitalInput
        );
    }
}
