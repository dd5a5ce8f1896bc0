use std::collections::VecDeque;
use tokio::time::Instant;

struct ExpiryEntry {
    ip: String,
    expires_at: Instant,
}

/// Append-only queue of expiry deadlines, sorted so a sweep only has to
/// look at its front.
///
/// Deadlines are computed before the push, so concurrent writers can
/// arrive slightly out of order; a deadline earlier than the tail is raised
/// to the tail's. An IP may appear more than once; the map record decides
/// whether it is actually stale.
#[derive(Default)]
pub(crate) struct ExpiryQueue {
    entries: VecDeque<ExpiryEntry>,
}

impl ExpiryQueue {
    pub fn push(&mut self, ip: &str, expires_at: Instant) {
        let expires_at = match self.entries.back() {
            Some(tail) if tail.expires_at > expires_at => tail.expires_at,
            _ => expires_at,
        };
        self.entries.push_back(ExpiryEntry {
            ip: ip.to_string(),
            expires_at,
        });
    }

    /// Removes and returns the IPs of the expired prefix.
    pub fn pop_expired(&mut self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        while let Some(front) = self.entries.front() {
            if front.expires_at > now {
                break;
            }
            if let Some(entry) = self.entries.pop_front() {
                expired.push(entry.ip);
            }
        }
        expired
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
