//! Stop notification fanned out to every running server.
//!
//! `serve_until` owns one `Shutdown`; each `HttpServer::run` holds a
//! receiver and starts draining when the unit message arrives. Integration
//! tests hold their own to stop a server they spawned.

use tokio::sync::broadcast;

pub struct Shutdown {
    sender: broadcast::Sender<()>,
}

impl Shutdown {
    /// A single slot is enough: the only message ever sent is "stop".
    pub fn new() -> Self {
        Self {
            sender: broadcast::Sender::new(1),
        }
    }

    /// Receivers only see a stop sent after they subscribed, so subscribe
    /// before spawning the server.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Tell every subscribed server to stop accepting connections. A no-op
    /// when nothing is listening.
    pub fn trigger(&self) {
        let _ = self.sender.send(());
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_trigger() {
        let shutdown = Shutdown::new();
        let _early = shutdown.subscribe();
        shutdown.trigger();

        let mut late = shutdown.subscribe();
        assert!(matches!(
            late.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_trigger_without_subscribers() {
        Shutdown::default().trigger();
    }
}
