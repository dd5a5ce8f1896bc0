use async_trait::async_trait;

#[async_trait]
pub trait HostnameLookup: Send + Sync {
    /// Never fails: an unknown, slow or unresolvable address yields an
    /// empty list.
    async fn lookup(&self, ip: &str) -> Vec<String>;
}
