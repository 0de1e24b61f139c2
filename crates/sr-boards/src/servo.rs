//! 舵机板（12 路舵机）

use crate::{Board, BoardError};
use parking_lot::Mutex;
use sr_backend::{BackendError, BoardKind, Discovered, ServoBoardBackend};
use sr_types::check_range;
use std::fmt;
use std::sync::Arc;

/// 每块舵机板的舵机数量
pub const SERVO_COUNT: usize = 12;

struct Inner {
    serial: String,
    backend: Mutex<Box<dyn ServoBoardBackend>>,
}

/// 舵机板
#[derive(Clone)]
pub struct ServoBoard {
    inner: Arc<Inner>,
}

impl ServoBoard {
    pub fn new(serial: impl Into<String>, backend: Box<dyn ServoBoardBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                serial: serial.into(),
                backend: Mutex::new(backend),
            }),
        }
    }

    pub fn servo(&self, index: usize) -> Result<Servo<'_>, BoardError> {
        if index >= SERVO_COUNT {
            return Err(BoardError::InvalidIndex {
                component: "servo",
                index,
                count: SERVO_COUNT,
            });
        }
        Ok(Servo { board: self, index })
    }

    pub fn servos(&self) -> impl Iterator<Item = Servo<'_>> {
        (0..SERVO_COUNT).map(move |index| Servo { board: self, index })
    }

    fn with_backend<R>(
        &self,
        f: impl FnOnce(&mut dyn ServoBoardBackend) -> Result<R, BackendError>,
    ) -> Result<R, BoardError> {
        let mut backend = self.inner.backend.lock();
        Ok(f(backend.as_mut())?)
    }
}

impl From<Discovered<dyn ServoBoardBackend>> for ServoBoard {
    fn from(found: Discovered<dyn ServoBoardBackend>) -> Self {
        Self::new(found.serial_number, found.backend)
    }
}

impl Board for ServoBoard {
    const KIND: BoardKind = BoardKind::ServoBoard;

    fn serial_number(&self) -> &str {
        &self.inner.serial
    }

    fn firmware_version(&self) -> Result<Option<String>, BoardError> {
        self.with_backend(|b| b.firmware_version())
    }

    /// 舵机保持当前位置，不做任何操作
    fn make_safe(&self) -> Result<(), BoardError> {
        Ok(())
    }
}

impl fmt::Debug for ServoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServoBoard")
            .field("serial", &self.inner.serial)
            .finish_non_exhaustive()
    }
}

/// 舵机
#[derive(Clone, Copy)]
pub struct Servo<'a> {
    board: &'a ServoBoard,
    index: usize,
}

impl Servo<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// 当前位置，`None` 表示未上电
    pub fn position(&self) -> Result<Option<f32>, BoardError> {
        self.board.with_backend(|b| b.servo_position(self.index))
    }

    /// 设置位置（[-1.0, 1.0]），`None` 断开舵机
    pub fn set_position(&self, position: Option<f32>) -> Result<(), BoardError> {
        if let Some(value) = position {
            check_range("servo position", value as f64, -1.0, 1.0)?;
        }
        self.board
            .with_backend(|b| b.set_servo_position(self.index, position))
    }
}

impl fmt::Debug for Servo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Servo")
            .field("board", &self.board.inner.serial)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::sim::Simulation;
    use sr_types::ValueError;

    fn board() -> (Simulation, ServoBoard) {
        let sim = Simulation::new().with_servo_board("SRSB1");
        let found = sim.environment().discover_servo_boards().unwrap();
        let board = found.into_iter().map(ServoBoard::from).next().unwrap();
        (sim, board)
    }

    #[test]
    fn test_position_round_trip() {
        let (sim, board) = board();
        let servo = board.servo(11).unwrap();
        assert_eq!(servo.position().unwrap(), None);

        servo.set_position(Some(-1.0)).unwrap();
        assert_eq!(servo.position().unwrap(), Some(-1.0));
        assert_eq!(sim.servo_board("SRSB1").unwrap().lock().servos[11], Some(-1.0));

        servo.set_position(None).unwrap();
        assert_eq!(servo.position().unwrap(), None);
    }

    #[test]
    fn test_range_check() {
        let (_sim, board) = board();
        let servo = board.servo(0).unwrap();
        assert!(matches!(
            servo.set_position(Some(1.01)),
            Err(BoardError::Value(ValueError::OutOfRange { .. }))
        ));
        assert!(servo.set_position(Some(f32::INFINITY)).is_err());
        assert!(board.servo(12).is_err());
        assert_eq!(board.servos().count(), SERVO_COUNT);
    }

    #[test]
    fn test_make_safe_leaves_positions() {
        let (sim, board) = board();
        board.servo(3).unwrap().set_position(Some(0.25)).unwrap();
        board.make_safe().unwrap();
        assert_eq!(sim.servo_board("SRSB1").unwrap().lock().servos[3], Some(0.25));
    }
}
