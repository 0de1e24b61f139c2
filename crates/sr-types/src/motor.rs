//! 电机功率

use crate::{ValueError, check_range};
use std::fmt;

/// 电机特殊状态（非速度输出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorSpecialState {
    /// 滑行：断开输出，电机自由转动
    Coast,
    /// 刹车：短接输出，电机迅速停止
    Brake,
}

/// 电机功率
///
/// `Speed` 的取值范围是 [-1.0, 1.0]，负值表示反转。
/// 通过 [`MotorPower::speed`] 构造可保证数值合法。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorPower {
    Speed(f32),
    #[default]
    Coast,
    Brake,
}

impl MotorPower {
    /// 最大功率
    pub const MAX: f32 = 1.0;
    /// 最小功率（满功率反转）
    pub const MIN: f32 = -Self::MAX;

    /// 创建速度输出
    ///
    /// # 错误
    /// - `ValueError::NotFinite`: NaN 或无穷
    /// - `ValueError::OutOfRange`: 不在 [-1.0, 1.0] 内
    pub fn speed(value: f32) -> Result<Self, ValueError> {
        check_range("motor power", value as f64, Self::MIN as f64, Self::MAX as f64)?;
        Ok(Self::Speed(value))
    }

    /// 校验当前值（用于直接构造的 `Speed` 变体）
    pub fn validate(self) -> Result<Self, ValueError> {
        match self {
            Self::Speed(value) => Self::speed(value),
            other => Ok(other),
        }
    }

    /// 以浮点数表示的功率（`Coast`/`Brake` 为 0.0）
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Speed(value) => value,
            Self::Coast | Self::Brake => 0.0,
        }
    }
}

impl From<MotorSpecialState> for MotorPower {
    fn from(state: MotorSpecialState) -> Self {
        match state {
            MotorSpecialState::Coast => Self::Coast,
            MotorSpecialState::Brake => Self::Brake,
        }
    }
}

/// 未经校验的速度输出，使用前需调用 [`MotorPower::validate`]
impl From<f32> for MotorPower {
    fn from(value: f32) -> Self {
        Self::Speed(value)
    }
}

impl fmt::Display for MotorPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speed(value) => write!(f, "{:.3}", value),
            Self::Coast => f.write_str("COAST"),
            Self::Brake => f.write_str("BRAKE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_range() {
        assert_eq!(MotorPower::speed(0.5).unwrap(), MotorPower::Speed(0.5));
        assert!(MotorPower::speed(-1.0).is_ok());
        assert!(MotorPower::speed(1.01).is_err());
        assert!(MotorPower::speed(f32::INFINITY).is_err());
    }

    #[test]
    fn test_validate_direct_construction() {
        assert!(MotorPower::Speed(2.0).validate().is_err());
        assert_eq!(MotorPower::Brake.validate().unwrap(), MotorPower::Brake);
    }

    #[test]
    fn test_special_state_conversion() {
        assert_eq!(MotorPower::from(MotorSpecialState::Coast), MotorPower::Coast);
        assert_eq!(MotorPower::from(MotorSpecialState::Brake), MotorPower::Brake);
        assert_eq!(MotorPower::Brake.as_f32(), 0.0);
        assert_eq!(MotorPower::default(), MotorPower::Coast);
    }

    #[test]
    fn test_from_f32_is_unchecked() {
        assert_eq!(MotorPower::from(0.25_f32), MotorPower::Speed(0.25));
        assert!(MotorPower::from(1.5_f32).validate().is_err());
    }
}
