use async_trait::async_trait;
use metric_rdns_application::ports::AddressResolver;
use metric_rdns_domain::DomainError;
use std::net::IpAddr;
use tracing::debug;

/// Reverse lookups through the host's own resolver (`getnameinfo`), so
/// `/etc/hosts` and the configured nameservers are honored.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAddressResolver;

impl SystemAddressResolver {
    pub fn new() -> Self {
        Self
    }

    /// Dotted names become fully qualified (`dns.google.`); single labels
    /// such as `localhost` are returned as-is.
    pub fn absolute_name(name: &str) -> String {
        if name.contains('.') && !name.ends_with('.') {
            format!("{}.", name)
        } else {
            name.to_string()
        }
    }
}

#[async_trait]
impl AddressResolver for SystemAddressResolver {
    async fn lookup_addr(&self, ip: &str) -> Result<Vec<String>, DomainError> {
        let addr: IpAddr = ip
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(ip.to_string()))?;

        let name = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr))
            .await
            .map_err(|e| DomainError::IoError(format!("resolver thread failed: {}", e)))?
            .map_err(|e| DomainError::LookupFailed {
                ip: ip.to_string(),
                reason: e.to_string(),
            })?;

        // getnameinfo falls back to the numeric form when no PTR exists.
        if name.is_empty() || name.parse::<IpAddr>().is_ok_and(|echo| echo == addr) {
            debug!(ip = %ip, "No hostname for address");
            return Err(DomainError::NoHostname(ip.to_string()));
        }

        let hostname = Self::absolute_name(&name);
        debug!(ip = %ip, hostname = %hostname, "System reverse lookup successful");
        Ok(vec![hostname])
    }
}
