use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Reverse lookup failed for {ip}: {reason}")]
    LookupFailed { ip: String, reason: String },

    #[error("No PTR name found for {0}")]
    NoHostname(String),

    #[error("Lookup timed out after {0} ms")]
    LookupTimeout(u64),

    #[error("Invalid lookup rule #{index}: {reason}")]
    InvalidLookupRule { index: usize, reason: String },

    #[error("Processor has not been started")]
    ProcessorNotStarted,

    #[error("I/O error: {0}")]
    IoError(String),
}
