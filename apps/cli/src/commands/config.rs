//! 配置管理命令
//!
//! 配置文件位置按以下顺序确定：`--config` 参数、`SR_ROBOT_CONFIG` 环境变量、
//! `<配置目录>/sr-robot3/config.toml`。

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use sr_robot3::config::CONFIG_ENV_VAR;
use sr_robot3::{EnvironmentKind, RobotConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub fn default_config_path() -> Result<PathBuf> {
    let mut path =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;
    path.push("sr-robot3");
    path.push("config.toml");
    Ok(path)
}

/// 配置文件位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// 是否由用户显式指定（显式指定的文件必须存在）
    pub explicit: bool,
}

impl ConfigLocation {
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self> {
        let explicit = flag.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match explicit {
            Some(path) => Ok(Self {
                path,
                explicit: true,
            }),
            None => Ok(Self {
                path: default_config_path()?,
                explicit: false,
            }),
        }
    }

    /// 加载配置；默认位置没有文件时返回默认配置
    pub fn load(&self) -> Result<RobotConfig> {
        if !self.explicit && !self.path.exists() {
            tracing::debug!("No config file at {}, using defaults", self.path.display());
            return Ok(RobotConfig::default());
        }
        RobotConfig::load(&self.path)
            .with_context(|| format!("Failed to load config from {}", self.path.display()))
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示配置文件路径
    Path,

    /// 显示当前配置（TOML）
    Show,

    /// 生成配置文件
    Init {
        /// 运行环境（console 或 console-with-vision）
        #[arg(short, long, default_value = "console")]
        environment: EnvironmentKind,

        /// 覆盖已存在的配置文件
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, location: &ConfigLocation) -> Result<()> {
        match self {
            ConfigCommand::Path => {
                println!("{}", location.path.display());
                Ok(())
            },

            ConfigCommand::Show => {
                let config = location.load()?;
                print!("{}", config.to_toml()?);
                Ok(())
            },

            ConfigCommand::Init { environment, force } => {
                init(&location.path, environment, force)?;
                println!("Wrote {}", location.path.display());
                Ok(())
            },
        }
    }
}

fn init(path: &Path, environment: EnvironmentKind, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }

    let config = RobotConfig {
        environment,
        ..RobotConfig::default()
    };
    fs::write(path, config.to_toml()?)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}
