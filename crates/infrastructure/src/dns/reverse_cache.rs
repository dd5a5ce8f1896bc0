//! Single-flight reverse DNS cache.
//!
//! Concurrent requests for the same address share one outstanding query.
//! Answers live for `ttl` after the query completes and are swept by
//! [`ReverseDnsCache::cleanup`].

mod expiry;
mod metrics;
mod record;

pub use metrics::{CacheMetrics, CacheStats};

use expiry::ExpiryQueue;
use record::LookupRecord;

use async_trait::async_trait;
use metric_rdns_application::parallel::WorkerPool;
use metric_rdns_application::ports::{AddressResolver, CacheCleanupOutcome, HostnameLookup};
use metric_rdns_domain::{effective_worker_count, DomainError, ReverseDnsConfig};
use rustc_hash::FxHashMap;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

enum Subscription {
    Ready(Vec<String>),
    Waiting(oneshot::Receiver<Vec<String>>),
}

struct CacheState {
    ttl: Duration,
    lookup_timeout: Duration,
    resolver: Arc<dyn AddressResolver>,
    workers: WorkerPool,
    records: RwLock<FxHashMap<String, LookupRecord>>,
    expiry: Mutex<ExpiryQueue>,
    metrics: CacheMetrics,
}

/// Cheap to clone; clones share the same records and lookup workers.
#[derive(Clone)]
pub struct ReverseDnsCache {
    state: Arc<CacheState>,
}

impl ReverseDnsCache {
    pub fn new(
        ttl: Duration,
        lookup_timeout: Duration,
        max_parallel_lookups: i64,
        resolver: Arc<dyn AddressResolver>,
    ) -> Self {
        let workers = WorkerPool::new(effective_worker_count(max_parallel_lookups));

        debug!(
            ttl_secs = ttl.as_secs(),
            lookup_timeout_ms = lookup_timeout.as_millis() as u64,
            workers = workers.size(),
            "Reverse DNS cache created"
        );

        Self {
            state: Arc::new(CacheState {
                ttl,
                lookup_timeout,
                resolver,
                workers,
                records: RwLock::new(FxHashMap::default()),
                expiry: Mutex::new(ExpiryQueue::default()),
                metrics: CacheMetrics::default(),
            }),
        }
    }

    pub fn from_config(config: &ReverseDnsConfig, resolver: Arc<dyn AddressResolver>) -> Self {
        Self::new(
            config.cache_ttl,
            config.lookup_timeout,
            config.max_parallel_lookups,
            resolver,
        )
    }

    /// Hostnames for `ip`, or an empty list when the address is unknown or
    /// the answer did not arrive within the lookup timeout. A lookup that
    /// times out keeps running and fills the cache for later callers.
    pub async fn lookup(&self, ip: &str) -> Vec<String> {
        if ip.is_empty() {
            return Vec::new();
        }

        let rx = match self.subscribe(ip) {
            Subscription::Ready(domains) => return domains,
            Subscription::Waiting(rx) => rx,
        };

        match tokio::time::timeout(self.state.lookup_timeout, rx).await {
            Ok(Ok(domains)) => domains,
            Ok(Err(_)) => {
                debug!(ip = %ip, "Pending reverse lookup was replaced");
                Vec::new()
            }
            Err(_) => {
                debug!(
                    ip = %ip,
                    timeout_ms = self.state.lookup_timeout.as_millis() as u64,
                    "Reverse lookup timed out"
                );
                Vec::new()
            }
        }
    }

    fn subscribe(&self, ip: &str) -> Subscription {
        let state = &self.state;

        {
            let records = state.records.read().unwrap_or_else(|e| e.into_inner());
            if let Some(record) = records.get(ip) {
                if record.completed && !record.is_expired(Instant::now()) {
                    state.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                    return Subscription::Ready(record.domains.clone());
                }
            }
        }

        let (tx, rx) = oneshot::channel();
        let created = {
            let mut records = state.records.write().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();

            match records.get_mut(ip) {
                Some(record) if !record.is_expired(now) => {
                    if record.completed {
                        state.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                        return Subscription::Ready(record.domains.clone());
                    }
                    record.subscribe(tx);
                    return Subscription::Waiting(rx);
                }
                _ => {
                    state.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                    let expires_at = now + state.ttl;
                    let record = LookupRecord::pending(expires_at, tx);
                    let generation = record.generation;
                    records.insert(ip.to_string(), record);
                    (generation, expires_at)
                }
            }
        };

        let (generation, expires_at) = created;
        state
            .expiry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ip, expires_at);

        tokio::spawn(Arc::clone(state).do_lookup(ip.to_string(), generation));

        Subscription::Waiting(rx)
    }

    /// Removes records whose TTL has lapsed.
    pub fn cleanup(&self) -> CacheCleanupOutcome {
        self.cleanup_at(Instant::now())
    }

    pub fn cleanup_at(&self, now: Instant) -> CacheCleanupOutcome {
        let state = &self.state;

        let candidates = state
            .expiry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_expired(now);

        let mut records = state.records.write().unwrap_or_else(|e| e.into_inner());
        let mut removed = 0usize;

        for ip in candidates {
            let stale = records
                .get(&ip)
                .is_some_and(|record| record.is_expired(now));
            if stale {
                records.remove(&ip);
                removed += 1;
            }
        }

        state
            .metrics
            .expirations
            .fetch_add(removed as u64, AtomicOrdering::Relaxed);

        CacheCleanupOutcome {
            entries_expired: removed,
            cache_size: records.len(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.state.metrics.snapshot(self.len())
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.state.metrics
    }

    /// True when a record exists for `ip`, pending or completed.
    pub fn contains(&self, ip: &str) -> bool {
        self.state
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(ip)
    }

    pub fn len(&self) -> usize {
        self.state
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Callers currently attached to a pending record for `ip`.
    pub fn pending_waiters(&self, ip: &str) -> usize {
        self.state
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(ip)
            .map_or(0, |record| record.callbacks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.state.workers
    }
}

impl CacheState {
    async fn do_lookup(self: Arc<Self>, ip: String, generation: u64) {
        let token = self.workers.checkout().await;

        // The slot is held until the resolver call itself returns, even if
        // nobody waits for it any more.
        let workers = self.workers.clone();
        let resolver = Arc::clone(&self.resolver);
        let query_ip = ip.clone();
        let call = tokio::spawn(async move {
            let result = resolver.lookup_addr(&query_ip).await;
            workers.checkin(token);
            result
        });

        let domains = match tokio::time::timeout(self.lookup_timeout, call).await {
            Ok(Ok(Ok(domains))) => domains,
            Ok(Ok(Err(e))) => {
                debug!(ip = %ip, error = %e, "Reverse lookup failed");
                return;
            }
            Ok(Err(e)) => {
                debug!(ip = %ip, error = %e, "Reverse lookup task aborted");
                return;
            }
            Err(_) => {
                let e = DomainError::LookupTimeout(self.lookup_timeout.as_millis() as u64);
                debug!(ip = %ip, error = %e, "Resolver did not answer before the deadline");
                return;
            }
        };

        let completed = {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            match records.get_mut(&ip) {
                Some(record) if record.generation == generation => {
                    let expires_at = Instant::now() + self.ttl;
                    Some((record.complete(domains.clone(), expires_at), expires_at))
                }
                _ => None,
            }
        };

        let Some((callbacks, expires_at)) = completed else {
            debug!(ip = %ip, "Reverse lookup record evicted before completion");
            return;
        };

        self.expiry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(&ip, expires_at);

        debug!(ip = %ip, names = domains.len(), waiters = callbacks.len(), "Reverse lookup completed");

        for callback in callbacks {
            let _ = callback.send(domains.clone());
        }
    }
}

#[async_trait]
impl HostnameLookup for ReverseDnsCache {
    async fn lookup(&self, ip: &str) -> Vec<String> {
        ReverseDnsCache::lookup(self, ip).await
    }
}
