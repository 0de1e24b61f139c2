//! 常用类型
//!
//! ```rust
//! use sr_robot3::prelude::*;
//! ```

pub use crate::{Robot, RobotBuilder, RobotError};
pub use sr_backend::Environment;
pub use sr_boards::{Board, BoardGroup, Marker};
pub use sr_types::{
    A0, A1, A2, A3, A4, A5, Colour, GpioPinMode, MotorPower, MotorSpecialState, Note, Pitch,
    PinId, PowerOutputPosition, RobotMode, UserLed,
};

/// 电源板输出口
pub const OUT_H0: PowerOutputPosition = PowerOutputPosition::H0;
pub const OUT_H1: PowerOutputPosition = PowerOutputPosition::H1;
pub const OUT_L0: PowerOutputPosition = PowerOutputPosition::L0;
pub const OUT_L1: PowerOutputPosition = PowerOutputPosition::L1;
pub const OUT_L2: PowerOutputPosition = PowerOutputPosition::L2;
pub const OUT_L3: PowerOutputPosition = PowerOutputPosition::L3;
pub const OUT_FIVE_VOLT: PowerOutputPosition = PowerOutputPosition::FiveVolt;

/// 电机特殊状态
pub const BRAKE: MotorPower = MotorPower::Brake;
pub const COAST: MotorPower = MotorPower::Coast;

/// 运行模式
pub const COMP: RobotMode = RobotMode::Comp;
pub const DEV: RobotMode = RobotMode::Dev;
