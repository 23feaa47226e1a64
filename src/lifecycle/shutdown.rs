//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::lifecycle::signals::shutdown_signal;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe before the signal can fire; a trigger
/// reaches every subscriber exactly once.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Triggering with no subscribers is a no-op.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger on SIGINT/SIGTERM from a background task.
    ///
    /// Returns a receiver subscribed before the task starts, so a signal
    /// arriving right away is not lost.
    pub fn trigger_on_signal(&self) -> broadcast::Receiver<()> {
        let receiver = self.subscribe();
        let shutdown = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        });
        receiver
    }

    /// Subscribers still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
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
    async fn trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.clone().subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn signal_receiver_sees_an_immediate_trigger() {
        let shutdown = Shutdown::new();
        let mut receiver = shutdown.trigger_on_signal();

        shutdown.trigger();
        assert!(receiver.recv().await.is_ok());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        Shutdown::new().trigger();
    }
}
