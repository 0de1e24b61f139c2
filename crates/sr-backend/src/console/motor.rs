use super::Console;
use crate::{BackendError, MotorBoardBackend};
use sr_types::MotorPower;

/// 控制台电机板（两路电机）
pub struct ConsoleMotorBoardBackend {
    console: Console,
    motors: [MotorPower; 2],
}

impl ConsoleMotorBoardBackend {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            motors: [MotorPower::Coast; 2],
        }
    }
}

impl MotorBoardBackend for ConsoleMotorBoardBackend {
    fn motor_power(&mut self, index: usize) -> Result<MotorPower, BackendError> {
        self.motors
            .get(index)
            .copied()
            .ok_or(BackendError::NotSupported("motor index"))
    }

    fn set_motor_power(&mut self, index: usize, power: MotorPower) -> Result<(), BackendError> {
        let slot = self
            .motors
            .get_mut(index)
            .ok_or(BackendError::NotSupported("motor index"))?;
        *slot = power;
        self.console.info(&format!("Setting motor {} to {}", index, power))
    }
}
