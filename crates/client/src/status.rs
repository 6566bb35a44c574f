//! Observable busy/error status of the store.

use tokio::sync::watch;

/// Snapshot of the store's status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Operations currently running.
    pub in_flight: usize,
    /// Message of the most recent failure; cleared when a new operation starts.
    pub error: Option<String>,
}

impl StoreStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Owner of the status channel.
///
/// Operations hold a [`BusyGuard`] for their whole duration, so overlapping
/// operations keep the store busy until the last one finishes, and a
/// cancelled operation still releases its slot.
#[derive(Debug)]
pub struct StatusTracker {
    tx: watch::Sender<StoreStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreStatus::default());
        Self { tx }
    }

    pub fn current(&self) -> StoreStatus {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.tx.subscribe()
    }

    /// Mark an operation as started.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.tx.send_modify(|status| {
            status.in_flight += 1;
            status.error = None;
        });
        BusyGuard { tracker: self }
    }

    pub fn record_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|status| status.error = Some(message));
    }

    pub fn clear_error(&self) {
        self.tx.send_if_modified(|status| status.error.take().is_some());
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases one in-flight slot when dropped.
#[must_use = "the operation is only tracked while the guard is alive"]
#[derive(Debug)]
pub struct BusyGuard<'a> {
    tracker: &'a StatusTracker,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.tracker
            .tx
            .send_modify(|status| status.in_flight = status.in_flight.saturating_sub(1));
    }
}
