//! 板卡层错误类型定义

use sr_backend::{BackendError, BoardKind};
use sr_types::{GpioPinMode, PinId, ValueError};
use thiserror::Error;

/// 板卡层错误类型
#[derive(Error, Debug)]
pub enum BoardError {
    /// 需要恰好一块板卡，但实际数量不是一
    #[error("expected exactly one {kind} to be connected, found {count}")]
    NotSingular { kind: BoardKind, count: usize },

    /// 引脚被保留（A4/A5 用于 I2C），不能使用
    #[error("pin {0} is reserved and cannot be used")]
    ReservedPin(PinId),

    /// 引脚当前模式不支持该操作
    #[error("pin {pin} is in mode {mode}, operation requires {required}")]
    BadPinMode {
        pin: PinId,
        mode: GpioPinMode,
        required: &'static str,
    },

    /// 引脚不支持该模式
    #[error("pin {pin} does not support mode {mode}")]
    UnsupportedMode { pin: PinId, mode: GpioPinMode },

    /// 组件索引越界
    #[error("{component} index {index} out of range (board has {count})")]
    InvalidIndex {
        component: &'static str,
        index: usize,
        count: usize,
    },

    /// 后端错误
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// 参数不合法
    #[error("Invalid value: {0}")]
    Value(#[from] ValueError),
}

impl BoardError {
    /// 是否为致命错误（板卡已断开）
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_fatal(),
            _ => false,
        }
    }
}
