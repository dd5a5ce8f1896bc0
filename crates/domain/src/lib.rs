//! metric-rdns domain layer
pub mod config;
pub mod errors;
pub mod metric;

pub use config::{
    effective_worker_count, CliOverrides, Config, ConfigError, LogFormat, LoggingConfig,
    LookupRule, LookupSource, ReverseDnsConfig, DEFAULT_MAX_PARALLEL_LOOKUPS,
};
pub use errors::DomainError;
pub use metric::{FieldValue, Metric};
