//! # SR Types
//!
//! 套件各板卡共用的值类型定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `pin`: Ruggeduino 引脚编号与 GPIO 模式
//! - `power`: 电源板输出口位置
//! - `motor`: 电机功率（速度 / 滑行 / 刹车）
//! - `piezo`: 蜂鸣器音符与音高
//! - `mode`: 机器人运行模式（比赛 / 开发）
//! - `kch`: KCH 用户 LED 与颜色
//!
//! 所有类型都是 `Copy` 的纯数据，板卡层和后端层通过它们交换数值。

pub mod kch;
pub mod mode;
pub mod motor;
pub mod piezo;
pub mod pin;
pub mod power;

// 重新导出常用类型
pub use kch::{Colour, UserLed};
pub use mode::RobotMode;
pub use motor::{MotorPower, MotorSpecialState};
pub use piezo::{Note, Pitch};
pub use pin::{A0, A1, A2, A3, A4, A5, GpioPinMode, PinId};
pub use power::PowerOutputPosition;

use thiserror::Error;

/// 值校验错误
///
/// 用户传入的数值不满足类型约束时返回（超出范围、非法标签等）。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    #[error("Value {value} for {field} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Value for {field} must be finite")]
    NotFinite { field: &'static str },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// 校验浮点值在闭区间内（拒绝 NaN / 无穷）
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValueError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}
