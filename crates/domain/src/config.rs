pub mod errors;
pub mod logging;
pub mod reverse_dns;
pub mod root;

pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use reverse_dns::{
    effective_worker_count, LookupRule, LookupSource, ReverseDnsConfig,
    DEFAULT_MAX_PARALLEL_LOOKUPS,
};
pub use root::{CliOverrides, Config};
