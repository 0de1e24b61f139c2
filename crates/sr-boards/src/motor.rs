//! 电机板（两路电机）

use crate::{Board, BoardError};
use parking_lot::Mutex;
use sr_backend::{BackendError, BoardKind, Discovered, MotorBoardBackend};
use sr_types::MotorPower;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 每块电机板的电机数量
pub const MOTOR_COUNT: usize = 2;

struct Inner {
    serial: String,
    backend: Mutex<Box<dyn MotorBoardBackend>>,
}

/// 电机板
#[derive(Clone)]
pub struct MotorBoard {
    inner: Arc<Inner>,
}

impl MotorBoard {
    pub fn new(serial: impl Into<String>, backend: Box<dyn MotorBoardBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                serial: serial.into(),
                backend: Mutex::new(backend),
            }),
        }
    }

    /// 第 `index` 路电机
    ///
    /// # 错误
    /// - `BoardError::InvalidIndex`: `index` 不小于 [`MOTOR_COUNT`]
    pub fn motor(&self, index: usize) -> Result<Motor<'_>, BoardError> {
        if index >= MOTOR_COUNT {
            return Err(BoardError::InvalidIndex {
                component: "motor",
                index,
                count: MOTOR_COUNT,
            });
        }
        Ok(Motor { board: self, index })
    }

    pub fn motors(&self) -> impl Iterator<Item = Motor<'_>> {
        (0..MOTOR_COUNT).map(move |index| Motor { board: self, index })
    }

    fn with_backend<R>(
        &self,
        f: impl FnOnce(&mut dyn MotorBoardBackend) -> Result<R, BackendError>,
    ) -> Result<R, BoardError> {
        let mut backend = self.inner.backend.lock();
        Ok(f(backend.as_mut())?)
    }
}

impl From<Discovered<dyn MotorBoardBackend>> for MotorBoard {
    fn from(found: Discovered<dyn MotorBoardBackend>) -> Self {
        Self::new(found.serial_number, found.backend)
    }
}

impl Board for MotorBoard {
    const KIND: BoardKind = BoardKind::MotorBoard;

    fn serial_number(&self) -> &str {
        &self.inner.serial
    }

    fn firmware_version(&self) -> Result<Option<String>, BoardError> {
        self.with_backend(|b| b.firmware_version())
    }

    /// 所有电机刹车
    fn make_safe(&self) -> Result<(), BoardError> {
        debug!("Making motor board {} safe", self.inner.serial);
        self.motors().try_for_each(|motor| motor.set_power(MotorPower::Brake))
    }
}

impl fmt::Debug for MotorBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotorBoard")
            .field("serial", &self.inner.serial)
            .finish_non_exhaustive()
    }
}

/// 电机
#[derive(Clone, Copy)]
pub struct Motor<'a> {
    board: &'a MotorBoard,
    index: usize,
}

impl Motor<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn power(&self) -> Result<MotorPower, BoardError> {
        self.board.with_backend(|b| b.motor_power(self.index))
    }

    /// 设置功率
    ///
    /// 接受 [`MotorPower`]、`f32` 或 [`sr_types::MotorSpecialState`]。
    ///
    /// # 错误
    /// - `BoardError::Value`: 速度不在 [-1.0, 1.0] 内或不是有限值
    pub fn set_power(&self, power: impl Into<MotorPower>) -> Result<(), BoardError> {
        let power = power.into().validate()?;
        self.board
            .with_backend(|b| b.set_motor_power(self.index, power))
    }
}

impl fmt::Debug for Motor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Motor")
            .field("board", &self.board.inner.serial)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::sim::Simulation;
    use sr_types::{MotorSpecialState, ValueError};

    fn board() -> (Simulation, MotorBoard) {
        let sim = Simulation::new().with_motor_board("SRMB1");
        let found = sim.environment().discover_motor_boards().unwrap();
        let board = found.into_iter().map(MotorBoard::from).next().unwrap();
        (sim, board)
    }

    #[test]
    fn test_set_power() {
        let (sim, board) = board();
        board.motor(0).unwrap().set_power(MotorPower::Speed(0.5)).unwrap();
        board.motor(1).unwrap().set_power(MotorSpecialState::Coast).unwrap();

        assert_eq!(board.motor(0).unwrap().power().unwrap(), MotorPower::Speed(0.5));
        assert_eq!(
            sim.motor_board("SRMB1").unwrap().lock().motors,
            [MotorPower::Speed(0.5), MotorPower::Coast]
        );
    }

    #[test]
    fn test_rejects_out_of_range_power() {
        let (_sim, board) = board();
        let motor = board.motor(1).unwrap();
        assert!(matches!(
            motor.set_power(MotorPower::Speed(1.5)),
            Err(BoardError::Value(ValueError::OutOfRange { .. }))
        ));
        assert!(matches!(
            motor.set_power(MotorPower::Speed(f32::NAN)),
            Err(BoardError::Value(ValueError::NotFinite { .. }))
        ));
        assert_eq!(motor.power().unwrap(), MotorPower::Coast);
    }

    #[test]
    fn test_invalid_index() {
        let (_sim, board) = board();
        assert!(matches!(
            board.motor(2),
            Err(BoardError::InvalidIndex { index: 2, count: 2, .. })
        ));
        assert_eq!(board.motors().count(), MOTOR_COUNT);
    }

    #[test]
    fn test_make_safe_brakes() {
        let (sim, board) = board();
        board.motor(0).unwrap().set_power(MotorPower::Speed(-1.0)).unwrap();
        board.make_safe().unwrap();
        assert_eq!(
            sim.motor_board("SRMB1").unwrap().lock().motors,
            [MotorPower::Brake, MotorPower::Brake]
        );
    }
}
