//! KCH（机器人主控扩展板）用户 LED 与颜色

use std::fmt;

/// KCH 用户 LED 编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserLed {
    A,
    B,
    C,
}

impl UserLed {
    pub const ALL: [UserLed; 3] = [UserLed::A, UserLed::B, UserLed::C];

    /// LED 索引（0..3）
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

impl fmt::Display for UserLed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(name)
    }
}

/// RGB LED 颜色
///
/// KCH 的每个通道只有开/关两种状态，因此只有 8 种颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Colour {
    #[default]
    Off,
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
    White,
}

impl Colour {
    /// 各通道状态 (R, G, B)
    pub const fn rgb(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Yellow => (true, true, false),
            Self::Green => (false, true, false),
            Self::Cyan => (false, true, true),
            Self::Blue => (false, false, true),
            Self::Magenta => (true, false, true),
            Self::White => (true, true, true),
        }
    }

    /// 由通道状态还原颜色
    pub const fn from_rgb(red: bool, green: bool, blue: bool) -> Self {
        match (red, green, blue) {
            (false, false, false) => Self::Off,
            (true, false, false) => Self::Red,
            (true, true, false) => Self::Yellow,
            (false, true, false) => Self::Green,
            (false, true, true) => Self::Cyan,
            (false, false, true) => Self::Blue,
            (true, false, true) => Self::Magenta,
            (true, true, true) => Self::White,
        }
    }
}
