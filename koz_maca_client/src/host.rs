//! 宿主就绪握手。
//!
//! 第一手牌显示出来之后通知宿主内容已可见。只尝试一次：失败时记录警告，
//! 不重试，也不影响游戏。

use koz_maca_core::ClientMessage;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct HostHandshake {
    attempted: bool,
}

impl HostHandshake {
    pub fn attempted(&self) -> bool {
        self.attempted
    }

    /// 发送就绪信号；之后的调用什么也不做
    pub fn signal(&mut self, tx: &UnboundedSender<ClientMessage>) {
        if self.attempted {
            return;
        }
        self.attempted = true;
        match tx.send(ClientMessage::Ready) {
            Ok(()) => debug!("[miniapp] 已发送 ready 信号"),
            Err(e) => warn!("[miniapp] ready 信号发送失败: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn signals_exactly_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handshake = HostHandshake::default();
        handshake.signal(&tx);
        handshake.signal(&tx);

        assert_eq!(rx.try_recv().ok(), Some(ClientMessage::Ready));
        assert!(rx.try_recv().is_err());
        assert!(handshake.attempted());
    }

    #[test]
    fn failure_is_not_retried() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut handshake = HostHandshake::default();
        handshake.signal(&tx);
        assert!(handshake.attempted());
    }
}
