use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_PARALLEL_LOOKUPS: usize = 10;

/// Where a lookup rule reads its IP address from. The resolved hostname is
/// written back to the same kind of slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    Field(String),
    Tag(String),
}

/// One `[[reverse_dns.lookup]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LookupRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    pub dest: String,
}

impl LookupRule {
    pub fn field(name: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            tag: None,
            dest: dest.into(),
        }
    }

    pub fn tag(name: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            field: None,
            tag: Some(name.into()),
            dest: dest.into(),
        }
    }

    /// Resolves the configured source, rejecting rules that name both a
    /// field and a tag, neither, or no destination.
    pub fn source(&self) -> Result<LookupSource, String> {
        if self.dest.trim().is_empty() {
            return Err("dest must not be empty".to_string());
        }

        let field = self.field.as_deref().filter(|f| !f.is_empty());
        let tag = self.tag.as_deref().filter(|t| !t.is_empty());

        match (field, tag) {
            (Some(field), None) => Ok(LookupSource::Field(field.to_string())),
            (None, Some(tag)) => Ok(LookupSource::Tag(tag.to_string())),
            (Some(_), Some(_)) => Err("set either field or tag, not both".to_string()),
            (None, None) => Err("one of field or tag is required".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReverseDnsConfig {
    /// How long a successful answer stays valid.
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Upper bound on how long a single lookup waits for an answer.
    #[serde(default = "default_lookup_timeout", with = "humantime_serde")]
    pub lookup_timeout: Duration,

    /// Concurrent outstanding DNS queries. Values <= 0 fall back to 10.
    #[serde(default = "default_max_parallel_lookups")]
    pub max_parallel_lookups: i64,

    /// Deliver metrics in arrival order.
    #[serde(default = "default_true")]
    pub ordered: bool,

    #[serde(default = "default_cleanup_interval", with = "humantime_serde")]
    pub cleanup_interval: Duration,

    #[serde(default, rename = "lookup")]
    pub lookups: Vec<LookupRule>,
}

impl ReverseDnsConfig {
    pub fn effective_parallel_lookups(&self) -> usize {
        effective_worker_count(self.max_parallel_lookups)
    }
}

/// Maps a configured worker count to a usable one.
pub fn effective_worker_count(configured: i64) -> usize {
    if configured <= 0 {
        DEFAULT_MAX_PARALLEL_LOOKUPS
    } else {
        configured as usize
    }
}

impl Default for ReverseDnsConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_cache_ttl(),
            lookup_timeout: default_lookup_timeout(),
            max_parallel_lookups: default_max_parallel_lookups(),
            ordered: true,
            cleanup_interval: default_cleanup_interval(),
            lookups: vec![],
        }
    }
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_lookup_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_max_parallel_lookups() -> i64 {
    DEFAULT_MAX_PARALLEL_LOOKUPS as i64
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_true() -> bool {
    true
}
