use core::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

/// Well-known BACnet/IP UDP port (0xBAC0).
pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

/// Where a frame goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("empty address specifier")]
    EmptySpecifier,
    #[error("address specifier '{0}' has no host part")]
    EmptyHost(String),
    #[error("cannot resolve host '{host}': {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("host '{0}' resolved to no addresses")]
    NoAddress(String),
    #[error("invalid address suffix '{0}' (expected [/prefix][:port])")]
    InvalidSuffix(String),
}

/// A resolved host plus the unparsed remainder of its specifier.
///
/// The suffix is kept byte-for-byte; only [`socket_addr`](Self::socket_addr)
/// and friends interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkAddress {
    host: IpAddr,
    suffix: String,
}

/// The interpreted `[/prefix][:port]` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suffix {
    pub prefix_len: Option<u8>,
    pub port: u16,
}

impl NetworkAddress {
    pub fn new(host: IpAddr, suffix: impl Into<String>) -> Self {
        Self {
            host,
            suffix: suffix.into(),
        }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn parse_suffix(&self) -> Result<Suffix, AddressError> {
        parse_suffix(&self.suffix)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddressError> {
        Ok(SocketAddr::new(self.host, self.parse_suffix()?.port))
    }

    pub fn data_link(&self) -> Result<DataLinkAddress, AddressError> {
        self.socket_addr().map(DataLinkAddress::Ip)
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.suffix)
    }
}

/// Splits at the first `/` or `:`; the delimiter stays with the suffix.
pub fn split_specifier(specifier: &str) -> Result<(&str, &str), AddressError> {
    if specifier.is_empty() {
        return Err(AddressError::EmptySpecifier);
    }
    let at = specifier.find(['/', ':']).unwrap_or(specifier.len());
    let (host, suffix) = specifier.split_at(at);
    if host.is_empty() {
        return Err(AddressError::EmptyHost(specifier.to_string()));
    }
    Ok((host, suffix))
}

pub fn parse_suffix(suffix: &str) -> Result<Suffix, AddressError> {
    let invalid = || AddressError::InvalidSuffix(suffix.to_string());

    let (prefix_part, port_part) = match suffix.find(':') {
        Some(at) => (&suffix[..at], Some(&suffix[at + 1..])),
        None => (suffix, None),
    };

    let prefix_len = match prefix_part {
        "" => None,
        p => {
            let digits = p.strip_prefix('/').ok_or_else(invalid)?;
            let len = parse_digits::<u8>(digits).ok_or_else(invalid)?;
            if len > 32 {
                return Err(invalid());
            }
            Some(len)
        }
    };

    let port = match port_part {
        None => BACNET_IP_DEFAULT_PORT,
        Some(p) => parse_digits::<u16>(p).ok_or_else(invalid)?,
    };

    Ok(Suffix { prefix_len, port })
}

fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn suffix(s: &str) -> Suffix {
        parse_suffix(s).unwrap()
    }

    #[test]
    fn suffix_grammar() {
        assert_eq!(
            suffix(""),
            Suffix {
                prefix_len: None,
                port: 47808
            }
        );
        assert_eq!(suffix(":47809").port, 47809);
        assert_eq!(
            suffix("/24"),
            Suffix {
                prefix_len: Some(24),
                port: 47808
            }
        );
        assert_eq!(
            suffix("/24:47809"),
            Suffix {
                prefix_len: Some(24),
                port: 47809
            }
        );
    }

    #[test]
    fn garbage_suffix_is_invalid() {
        for bad in ["/", ":", "/33", ":70000", ":port", "/24/8", "x", ":47809/24", "/ 24"] {
            assert!(
                matches!(parse_suffix(bad), Err(AddressError::InvalidSuffix(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn prefix_does_not_change_destination() {
        let host = "192.168.1.10".parse().unwrap();
        let with_prefix = NetworkAddress::new(host, "/24:47809");
        assert_eq!(
            with_prefix.socket_addr().unwrap(),
            NetworkAddress::new(host, ":47809").socket_addr().unwrap()
        );
        assert_eq!(with_prefix.suffix(), "/24:47809");
    }

    #[test]
    fn display_is_host_plus_suffix() {
        let addr = NetworkAddress::new("10.0.0.7".parse().unwrap(), ":47809");
        assert_eq!(addr.to_string(), "10.0.0.7:47809");
    }

    #[test]
    fn split_rejects_empty_parts() {
        assert!(matches!(split_specifier(""), Err(AddressError::EmptySpecifier)));
        assert!(matches!(split_specifier(":47808"), Err(AddressError::EmptyHost(_))));
        assert_eq!(split_specifier("plant-ctl").unwrap(), ("plant-ctl", ""));
        assert_eq!(split_specifier("ahu1/24:47809").unwrap(), ("ahu1", "/24:47809"));
    }

    proptest! {
        #[test]
        fn split_keeps_suffix_verbatim(host in "[a-z0-9.-]{1,24}", suffix in "([/:][ -~]{0,12})?") {
            let specifier = format!("{host}{suffix}");
            let (h, s) = split_specifier(&specifier).unwrap();
            prop_assert_eq!(h, host.as_str());
            prop_assert_eq!(s, suffix.as_str());
        }

        #[test]
        fn any_port_round_trips(port in any::<u16>(), prefix in 0u8..=32) {
            let parsed = parse_suffix(&format!("/{prefix}:{port}")).unwrap();
            prop_assert_eq!(parsed.port, port);
            prop_assert_eq!(parsed.prefix_len, Some(prefix));
        }
    }
}
