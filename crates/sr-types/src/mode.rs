//! 机器人运行模式

use crate::ValueError;
use std::fmt;
use std::str::FromStr;

/// 机器人运行模式
///
/// - `Comp`: 比赛模式（比赛场地中运行，通常带有比赛时长限制）
/// - `Dev`: 开发模式（默认）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RobotMode {
    #[cfg_attr(feature = "serde", serde(alias = "COMP"))]
    Comp,
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "DEV"))]
    Dev,
}

impl RobotMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comp => "comp",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comp" => Ok(Self::Comp),
            "dev" => Ok(Self::Dev),
            other => Err(ValueError::InvalidValue {
                field: "RobotMode",
                value: other.to_string(),
            }),
        }
    }
}
