//! 电源板输出口位置

use std::fmt;

/// 电源板输出口位置
///
/// 两路大电流输出（H0/H1）、四路小电流输出（L0..L3）和一路 5V 输出。
/// 位置与板载编号一一对应，可与 `u8` 索引互转。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerOutputPosition {
    H0 = 0,
    H1 = 1,
    L0 = 2,
    L1 = 3,
    L2 = 4,
    L3 = 5,
    FiveVolt = 6,
}

impl PowerOutputPosition {
    /// 全部输出口（按板载编号排序）
    pub const ALL: [PowerOutputPosition; 7] = [
        PowerOutputPosition::H0,
        PowerOutputPosition::H1,
        PowerOutputPosition::L0,
        PowerOutputPosition::L1,
        PowerOutputPosition::L2,
        PowerOutputPosition::L3,
        PowerOutputPosition::FiveVolt,
    ];

    /// 板载索引
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }

    /// 是否为大电流输出
    pub fn is_high_current(self) -> bool {
        matches!(self, Self::H0 | Self::H1)
    }
}

impl fmt::Display for PowerOutputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::H0 => "H0",
            Self::H1 => "H1",
            Self::L0 => "L0",
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
            Self::FiveVolt => "FIVE_VOLT",
        };
        f.write_str(name)
    }
}
