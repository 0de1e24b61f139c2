//! 日志初始化
//!
//! 安装 `tracing-subscriber` 的 fmt 输出（写到标准错误），`try_init` 同时安装 `LogTracer`，
//! 把 `log` crate 的记录桥接到 `tracing`。
//! `RUST_LOG` 优先；未设置时各 crate 为 `info`，verbose 时为 `debug`。
//! 重复调用不会出错（已有全局 subscriber 时静默忽略）。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "sr_robot3=debug,sr_boards=debug,sr_backend=debug,sr_cli=debug"
    } else {
        "sr_robot3=info,sr_boards=info,sr_backend=info,sr_cli=info"
    }
}

/// 构建过滤器
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// 初始化日志，返回本次调用是否安装了 subscriber
pub fn init(verbose: bool) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_directives() {
        assert!(default_directives(true).contains("sr_robot3=debug"));
        assert!(default_directives(false).contains("sr_robot3=info"));
    }

    #[test]
    #[serial]
    fn test_init_twice_is_harmless() {
        init(false);
        assert!(!init(true));
    }
}
