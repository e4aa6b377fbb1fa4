//! The orchestrator's view of the client channel.

use tokio::sync::mpsc;

use super::ws::WsMsg;

/// Tells connected clients to reload.
///
/// Called from the orchestrator worker thread after every successful build.
pub trait ReloadNotifier: Send + Sync {
    fn full_reload(&self);
}

/// Sends reload requests to a running [`WsActor`](super::ws::WsActor).
#[derive(Debug, Clone)]
pub struct ReloadHandle {
    tx: mpsc::Sender<WsMsg>,
}

impl ReloadHandle {
    pub(super) fn new(tx: mpsc::Sender<WsMsg>) -> Self {
        Self { tx }
    }

    /// Close all client connections and stop the actor.
    pub fn shutdown(&self) {
        let _ = self.tx.blocking_send(WsMsg::Shutdown);
    }
}

impl ReloadNotifier for ReloadHandle {
    fn full_reload(&self) {
        if self.tx.blocking_send(WsMsg::Reload).is_err() {
            crate::debug!("reload"; "reload channel closed");
        }
    }
}

/// Used when no clients can be connected (production build, clean).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn full_reload(&self) {}
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::ReloadNotifier;

    /// Counts reload notifications.
    #[derive(Debug, Default)]
    pub struct CountingNotifier {
        count: AtomicUsize,
    }

    impl CountingNotifier {
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl ReloadNotifier for CountingNotifier {
        fn full_reload(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
