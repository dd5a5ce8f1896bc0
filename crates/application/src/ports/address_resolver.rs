use async_trait::async_trait;
use metric_rdns_domain::DomainError;

/// Reverse lookup primitive backed by the host resolver.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Returns the PTR names for `ip`, or an error when the address has no
    /// name or the resolver could not be reached.
    async fn lookup_addr(&self, ip: &str) -> Result<Vec<String>, DomainError>;
}
