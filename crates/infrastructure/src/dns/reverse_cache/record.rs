use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tokio::time::Instant;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub(crate) type Callback = oneshot::Sender<Vec<String>>;

/// One IP's lookup state. Only touched while holding the map lock.
pub(crate) struct LookupRecord {
    pub domains: Vec<String>,
    pub expires_at: Instant,
    pub completed: bool,
    /// Distinguishes this record from a later one created for the same IP,
    /// so a slow lookup cannot complete its replacement.
    pub generation: u64,
    pub callbacks: Vec<Callback>,
}

impl LookupRecord {
    pub fn pending(expires_at: Instant, first_waiter: Callback) -> Self {
        Self {
            domains: Vec::new(),
            expires_at,
            completed: false,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            callbacks: vec![first_waiter],
        }
    }

    /// Adds a waiter, dropping those whose callers already gave up.
    pub fn subscribe(&mut self, waiter: Callback) {
        self.callbacks.retain(|callback| !callback.is_closed());
        self.callbacks.push(waiter);
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    /// Records the answer and hands back the waiters to notify.
    pub fn complete(&mut self, domains: Vec<String>, expires_at: Instant) -> Vec<Callback> {
        self.domains = domains;
        self.completed = true;
        self.expires_at = expires_at;
        std::mem::take(&mut self.callbacks)
    }
}
