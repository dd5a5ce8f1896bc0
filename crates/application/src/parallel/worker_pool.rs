use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting semaphore bounding how many units of work run at once.
///
/// Clones share the same slots.
#[derive(Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

/// One occupied slot. The slot is released when the token is checked in or
/// dropped, so a token can never be returned twice.
#[must_use = "dropping the token releases the worker slot immediately"]
pub struct WorkerToken {
    _permit: Option<OwnedSemaphorePermit>,
}

impl WorkerPool {
    /// A pool of `size` slots; a size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Waits until a slot is free and occupies it.
    pub async fn checkout(&self) -> WorkerToken {
        let permit = Arc::clone(&self.slots).acquire_owned().await.ok();
        WorkerToken { _permit: permit }
    }

    /// Occupies a slot only if one is free right now.
    pub fn try_checkout(&self) -> Option<WorkerToken> {
        Arc::clone(&self.slots)
            .try_acquire_owned()
            .ok()
            .map(|permit| WorkerToken {
                _permit: Some(permit),
            })
    }

    pub fn checkin(&self, token: WorkerToken) {
        drop(token);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn in_use(&self) -> usize {
        self.size - self.available()
    }
}
