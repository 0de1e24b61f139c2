//! 外部启动信号
//!
//! 除了电源板上的启动按钮，其他线程（例如远程控制服务）也可以通过
//! [`StartSignal`] 让 `Robot::wait_start` 返回。

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// 创建一对启动信号的发送端和接收端
pub fn start_signal() -> (StartSignal, StartListener) {
    let (tx, rx) = bounded(1);
    (StartSignal { tx }, StartListener { rx })
}

/// 启动信号发送端
#[derive(Debug, Clone)]
pub struct StartSignal {
    tx: Sender<()>,
}

impl StartSignal {
    /// 发送启动信号
    ///
    /// 返回 `false` 表示接收端已不存在。重复发送是安全的。
    pub fn send(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// 启动信号接收端
#[derive(Debug)]
pub struct StartListener {
    rx: Receiver<()>,
}

impl StartListener {
    /// 是否收到了启动信号（非阻塞，信号被消费）
    pub fn try_receive(&self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_is_consumed_once() {
        let (signal, listener) = start_signal();
        assert!(!listener.try_receive());
        assert!(signal.send());
        assert!(signal.send());
        assert!(listener.try_receive());
        assert!(!listener.try_receive());
    }

    #[test]
    fn test_signal_from_other_thread() {
        let (signal, listener) = start_signal();
        std::thread::spawn(move || signal.send()).join().unwrap();
        assert!(listener.try_receive());
    }

    #[test]
    fn test_send_after_listener_dropped() {
        let (signal, listener) = start_signal();
        drop(listener);
        assert!(!signal.send());
    }
}
