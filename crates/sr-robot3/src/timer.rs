//! 比赛计时器
//!
//! 比赛开始后在后台线程计时，到时执行指定动作（默认：让所有板卡进入安全状态并退出进程）。
//! 计时器被取消或被 drop 时动作不会执行。

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

/// 比赛计时器
#[derive(Debug)]
pub struct GameTimer {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    timeout: Duration,
}

impl GameTimer {
    /// 启动计时器，`timeout` 后执行 `action`
    pub fn start<F>(timeout: Duration, action: F) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("Kill Signal Timeout set: {}s", timeout.as_secs_f64());
        let (cancel, cancelled) = bounded::<()>(1);
        let handle = std::thread::Builder::new()
            .name("sr-game-timer".to_string())
            .spawn(move || match cancelled.recv_timeout(timeout) {
                Err(RecvTimeoutError::Timeout) => action(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("Game timer cancelled");
                },
            })?;

        Ok(Self {
            cancel: Some(cancel),
            handle: Some(handle),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 计时线程是否已结束（已触发或已取消）
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// 取消计时器并等待后台线程退出
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    #[test]
    fn test_action_runs_after_timeout() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let start = Instant::now();
        let timer = GameTimer::start(Duration::from_millis(50), move || {
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();

        while !timer.is_finished() {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(fired.load(Ordering::SeqCst));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(timer.timeout(), Duration::from_millis(50));
    }

    #[test]
    fn test_cancel_prevents_action() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let timer = GameTimer::start(Duration::from_secs(60), move || {
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();

        let start = Instant::now();
        timer.cancel();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_cancels() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        {
            let _timer = GameTimer::start(Duration::from_secs(60), move || {
                flag.store(true, Ordering::SeqCst);
            })
            .unwrap();
        }
        assert!(!fired.load(Ordering::SeqCst));
    }
}
