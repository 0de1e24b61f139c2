//! # SR Boards
//!
//! 板卡层：把后端 trait 包装成带类型检查的板卡和组件句柄。
//!
//! - 板卡（`PowerBoard`、`MotorBoard` ...）可以廉价克隆，内部共享同一个后端
//! - 组件（`PowerOutput`、`Motor`、`Pin` ...）是借用板卡的轻量句柄
//! - 参数和引脚模式在这里检查，后端只负责执行
//!
//! ```rust
//! use sr_backend::sim::Simulation;
//! use sr_boards::{Board, PowerBoard};
//! use sr_types::PowerOutputPosition;
//!
//! let sim = Simulation::new().with_power_board("SRPB1");
//! let found = sim.environment().discover_power_boards().unwrap();
//! let board = found.into_iter().map(PowerBoard::from).next().unwrap();
//!
//! board.outputs().power_on().unwrap();
//! assert!(board.output(PowerOutputPosition::H0).is_enabled().unwrap());
//! assert_eq!(board.serial_number(), "SRPB1");
//! ```

use sr_backend::BoardKind;

mod camera;
mod error;
mod group;
mod kch;
mod motor;
mod power;
mod ruggeduino;
mod servo;

pub use camera::{CameraBoard, Marker, MarkerSizes};
pub use error::BoardError;
pub use group::BoardGroup;
pub use kch::Kch;
pub use motor::{MOTOR_COUNT, Motor, MotorBoard};
pub use power::{BatterySensor, Led, Piezo, PowerBoard, PowerOutput, PowerOutputs, StartButton};
pub use ruggeduino::{Pin, Ruggeduino};
pub use servo::{SERVO_COUNT, Servo, ServoBoard};

/// 板卡公共接口
pub trait Board: Send + Sync {
    /// 板卡种类
    const KIND: BoardKind;

    /// 板卡名称
    fn name(&self) -> &'static str {
        Self::KIND.name()
    }

    fn serial_number(&self) -> &str;

    /// 固件版本（未知时为 `None`）
    fn firmware_version(&self) -> Result<Option<String>, BoardError>;

    /// 进入安全状态（停止所有可能造成危险的输出）
    fn make_safe(&self) -> Result<(), BoardError>;
}
