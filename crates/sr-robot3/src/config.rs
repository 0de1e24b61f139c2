//! 机器人配置文件（TOML）
//!
//! ```toml
//! environment = "console"
//! auto_start = false
//! verbose = true
//! ignored_ruggeduinos = ["752303138333517171B1"]
//! metadata_path = "/var/run/sr/metadata.json"
//! lock_path = "/tmp/sr-robot3.lock"
//! calibration_dir = "/usr/share/sr-robot3/calibrations"
//! ```
//!
//! 所有字段都可以省略。环境变量 `SR_ROBOT_CONFIG` 可以指定配置文件路径。

use serde::{Deserialize, Serialize};
use sr_backend::Environment;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV_VAR: &str = "SR_ROBOT_CONFIG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown environment '{0}' (expected 'console' or 'console-with-vision')")]
    UnknownEnvironment(String),
}

/// 内置运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentKind {
    #[default]
    Console,
    ConsoleWithVision,
}

impl EnvironmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::ConsoleWithVision => "console-with-vision",
        }
    }

    /// 创建对应的运行环境
    pub fn environment(self) -> Environment {
        match self {
            Self::Console => Environment::console(),
            Self::ConsoleWithVision => Environment::console_with_vision(),
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "console" => Ok(Self::Console),
            "console-with-vision" => Ok(Self::ConsoleWithVision),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// 机器人配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    pub environment: EnvironmentKind,
    /// 跳过等待启动按钮
    pub auto_start: bool,
    /// 输出调试日志
    pub verbose: bool,
    /// 忽略的 Ruggeduino 序列号（运行自定义固件）
    pub ignored_ruggeduinos: Vec<String>,
    /// 元数据 JSON 状态文件
    pub metadata_path: Option<PathBuf>,
    /// 单实例锁文件
    pub lock_path: Option<PathBuf>,
    /// 摄像头标定文件目录
    pub calibration_dir: Option<PathBuf>,
}

impl RobotConfig {
    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// 从 `SR_ROBOT_CONFIG` 指定的文件加载，未设置时返回默认配置
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
