//! Turns a host specifier such as `ahu-3.plant.local:47809` into a
//! [`NetworkAddress`].

use crate::address::{split_specifier, AddressError, NetworkAddress};
use std::io;
use std::net::IpAddr;

/// Host-name resolution, swappable for tests.
pub trait HostLookup: Send + Sync {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// The operating system resolver, via `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

impl HostLookup for SystemLookup {
    async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolves `specifier` with the system resolver.
pub async fn resolve(specifier: &str) -> Result<NetworkAddress, AddressError> {
    resolve_with(specifier, &SystemLookup).await
}

/// Resolves the host part (up to the first `/` or `:`) and keeps the rest
/// verbatim as the suffix. Literal IPs skip the lookup; IPv4 results win
/// over IPv6.
pub async fn resolve_with<L: HostLookup>(
    specifier: &str,
    lookup: &L,
) -> Result<NetworkAddress, AddressError> {
    let (host, suffix) = split_specifier(specifier)?;

    let ip = match host.parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(_) => {
            let candidates = lookup
                .lookup(host)
                .await
                .map_err(|source| AddressError::Lookup {
                    host: host.to_string(),
                    source,
                })?;
            candidates
                .iter()
                .copied()
                .find(IpAddr::is_ipv4)
                .or_else(|| candidates.first().copied())
                .ok_or_else(|| AddressError::NoAddress(host.to_string()))?
        }
    };

    log::debug!("resolved '{specifier}' to {ip}{suffix}");
    Ok(NetworkAddress::new(ip, suffix))
}

#[cfg(test)]
mod tests {
    use super::{resolve_with, HostLookup};
    use crate::address::AddressError;
    use std::collections::HashMap;
    use std::io;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FixedLookup {
        table: HashMap<&'static str, Vec<IpAddr>>,
        calls: AtomicUsize,
    }

    impl FixedLookup {
        fn with(mut self, host: &'static str, addrs: &[&str]) -> Self {
            self.table
                .insert(host, addrs.iter().map(|a| a.parse().unwrap()).collect());
            self
        }
    }

    impl HostLookup for FixedLookup {
        async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table
                .get(host)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such host"))
        }
    }

    #[tokio::test]
    async fn name_with_port_suffix() {
        let lookup = FixedLookup::default().with("ahu-3", &["192.168.1.40"]);
        let addr = resolve_with("ahu-3:47809", &lookup).await.unwrap();
        assert_eq!(addr.host(), "192.168.1.40".parse::<IpAddr>().unwrap());
        assert_eq!(addr.suffix(), ":47809");
        assert_eq!(addr.to_string(), "192.168.1.40:47809");
    }

    #[tokio::test]
    async fn first_delimiter_wins() {
        let lookup = FixedLookup::default().with("ctl", &["10.0.0.2"]);
        let addr = resolve_with("ctl/24:47809", &lookup).await.unwrap();
        assert_eq!(addr.suffix(), "/24:47809");
    }

    #[tokio::test]
    async fn literal_ip_skips_lookup() {
        let lookup = FixedLookup::default();
        let addr = resolve_with("10.1.1.9", &lookup).await.unwrap();
        assert_eq!(addr.suffix(), "");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ipv4_preferred() {
        let lookup = FixedLookup::default().with("dual", &["fe80::1", "172.16.0.5"]);
        let addr = resolve_with("dual", &lookup).await.unwrap();
        assert_eq!(addr.host(), "172.16.0.5".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn failures_are_resolution_errors() {
        let lookup = FixedLookup::default().with("empty", &[]);
        assert!(matches!(
            resolve_with("", &lookup).await,
            Err(AddressError::EmptySpecifier)
        ));
        assert!(matches!(
            resolve_with(":47808", &lookup).await,
            Err(AddressError::EmptyHost(_))
        ));
        assert!(matches!(
            resolve_with("nowhere", &lookup).await,
            Err(AddressError::Lookup { .. })
        ));
        assert!(matches!(
            resolve_with("empty", &lookup).await,
            Err(AddressError::NoAddress(_))
        ));
    }
}
