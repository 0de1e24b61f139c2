//! 机器人层错误类型定义

use crate::config::ConfigError;
use sr_backend::BackendError;
use sr_boards::BoardError;
use std::path::PathBuf;
use thiserror::Error;

/// 机器人层错误类型
#[derive(Error, Debug)]
pub enum RobotError {
    /// 同一台机器上已经有一个 Robot 在运行
    #[error(
        "Another robot is already running (lock held on {path}{})",
        .pid.map(|pid| format!(" by PID {}", pid)).unwrap_or_default()
    )]
    AlreadyRunning {
        path: PathBuf,
        /// 锁文件中记录的持有者 PID
        pid: Option<u32>,
    },

    /// 锁文件操作失败
    #[error("Failed to acquire robot lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 板卡错误
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    /// 发现板卡时后端出错
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 无法启动比赛计时线程
    #[error("Failed to start game timer: {0}")]
    Timer(#[source] std::io::Error),
}

impl RobotError {
    /// 是否为致命错误（板卡已断开）
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Board(e) => e.is_fatal(),
            Self::Backend(e) => e.is_fatal(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::BoardKind;

    #[test]
    fn test_display() {
        let err = RobotError::AlreadyRunning {
            path: PathBuf::from("/tmp/sr-robot3.lock"),
            pid: Some(4242),
        };
        assert_eq!(
            err.to_string(),
            "Another robot is already running (lock held on /tmp/sr-robot3.lock by PID 4242)"
        );

        let err = RobotError::AlreadyRunning {
            path: PathBuf::from("/tmp/sr-robot3.lock"),
            pid: None,
        };
        assert_eq!(
            err.to_string(),
            "Another robot is already running (lock held on /tmp/sr-robot3.lock)"
        );

        let err: RobotError = BoardError::NotSingular {
            kind: BoardKind::PowerBoard,
            count: 0,
        }
        .into();
        assert!(err.to_string().contains("found 0"), "{}", err);
        assert!(!err.is_fatal());
    }
}
