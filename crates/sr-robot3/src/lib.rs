//! # sr-robot3
//!
//! Student Robotics 机器人 API。
//!
//! 创建一个 [`Robot`] 即可访问机器人上的所有板卡：
//!
//! ```rust
//! use sr_backend::sim::Simulation;
//! use sr_robot3::prelude::*;
//!
//! let sim = Simulation::new()
//!     .with_power_board("SRPB1")
//!     .with_motor_board("SRMB1")
//!     .with_ruggeduino("752303138333517171B1", Some("/dev/ttyACM0"));
//!
//! let robot = Robot::builder()
//!     .environment(sim.environment())
//!     .auto_start(true)
//!     .skip_lock(true)
//!     .build()
//!     .unwrap();
//!
//! robot.motor_board().unwrap().motor(0).unwrap().set_power(MotorPower::Speed(0.5)).unwrap();
//! robot.power_board().output(OUT_H0).set_is_enabled(false).unwrap();
//!
//! let pin = robot.ruggeduino().unwrap().pin(A0);
//! assert_eq!(pin.mode(), GpioPinMode::AnalogueInput);
//! ```
//!
//! ## 模块
//!
//! - [`metadata`]: 比赛元数据（场地、区域、模式、比赛时长）
//! - [`game`]: 标记规则
//! - [`calibration`]: 摄像头标定文件选择
//! - [`config`]: TOML 配置文件
//! - [`logging`]: 日志初始化

pub mod builder;
pub mod calibration;
pub mod config;
mod error;
pub mod game;
pub mod lock;
pub mod logging;
pub mod metadata;
pub mod prelude;
mod robot;
pub mod start;
pub mod timer;

pub use builder::RobotBuilder;
pub use config::{ConfigError, EnvironmentKind, RobotConfig};
pub use error::RobotError;
pub use game::GameError;
pub use metadata::{
    FetchedMetadata, JsonFileMetadata, Metadata, MetadataError, MetadataSource, StaticMetadata,
};
pub use robot::{Robot, START_POLL_INTERVAL, TimeoutAction};
pub use start::{StartListener, StartSignal, start_signal};
pub use timer::GameTimer;

// 下层 crate
pub use sr_backend;
pub use sr_boards;
pub use sr_types;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
