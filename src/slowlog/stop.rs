//! 协作式取消
//!
//! `StopHandle` 内部持有一个永不发送数据的通道。`stop()` 丢弃发送端，
//! 接收端随即进入断开状态，因此既能非阻塞地轮询，也能放进
//! `crossbeam_channel::select!` 与阻塞发送竞争。

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::sync::{Arc, Mutex};

/// 取消信号句柄，可克隆并跨线程使用
#[derive(Debug, Clone)]
pub struct StopHandle {
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self { trigger: Arc::new(Mutex::new(Some(tx))), signal: rx }
    }

    /// 发出取消信号，重复调用无副作用
    pub fn stop(&self) {
        let mut guard = match self.trigger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            #[cfg(feature = "logging")]
            tracing::debug!("收到停止信号");
        }
    }

    /// 是否已发出取消信号（不阻塞）
    pub fn is_stopped(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// 用于 `select!` 的接收端，取消后立即就绪
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_stop_is_idempotent() {
        let handle = StopHandle::new();
        assert!(!handle.is_stopped());
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = StopHandle::new();
        let clone = handle.clone();
        thread::spawn(move || clone.stop()).join().unwrap();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_signal_ready_after_stop() {
        let handle = StopHandle::new();
        handle.stop();
        assert!(handle.signal().recv().is_err());
    }
}
