//! Network address types for the server the board reports to.
//!
//! The configured host is either an IPv4 literal (the usual case on a LAN,
//! found with `hostname -I` on the server) or a DNS name that the firmware
//! resolves after DHCP completes.

use core::fmt;

use crate::error::{BoardError, Result};

/// Port the ingestion service listens on for board connections.
pub const DEFAULT_SERVER_PORT: u16 = 8010;

/// Longest hostname accepted, excluding an optional trailing dot.
pub const MAX_HOSTNAME_LEN: usize = 253;

/// Longest single label inside a hostname.
pub const MAX_LABEL_LEN: usize = 63;

/// IPv4 address representation.
///
/// A lightweight wrapper around a 4-byte array usable without `std`.
///
/// # Examples
///
/// ```
/// use respeaker_board::net::Ipv4Addr;
///
/// let addr = Ipv4Addr::new(192, 168, 1, 23);
/// assert_eq!(addr.octets(), [192, 168, 1, 23]);
///
/// let parsed: Ipv4Addr = "192.168.1.23".parse().unwrap();
/// assert_eq!(addr, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv4Addr {
    octets: [u8; 4],
}

impl Ipv4Addr {
    /// Create a new IPv4 address from individual octets.
    #[inline]
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self {
            octets: [a, b, c, d],
        }
    }

    /// Returns the four octets that make up this address.
    #[inline]
    pub const fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Unspecified address (0.0.0.0).
    pub const UNSPECIFIED: Self = Self::new(0, 0, 0, 0);

    /// Localhost address (127.0.0.1).
    pub const LOCALHOST: Self = Self::new(127, 0, 0, 1);
}

impl From<[u8; 4]> for Ipv4Addr {
    #[inline]
    fn from(octets: [u8; 4]) -> Self {
        Self { octets }
    }
}

impl From<Ipv4Addr> for [u8; 4] {
    #[inline]
    fn from(addr: Ipv4Addr) -> [u8; 4] {
        addr.octets
    }
}

impl fmt::Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.octets[0], self.octets[1], self.octets[2], self.octets[3]
        )
    }
}

impl core::str::FromStr for Ipv4Addr {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let mut octets = [0u8; 4];

        for octet in &mut octets {
            let part = parts.next().ok_or_else(BoardError::invalid_ipv4)?;
            // u8::from_str accepts a leading '+', which is not valid in a dotted quad
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(BoardError::invalid_ipv4());
            }
            // inet_aton reads a leading zero as octal
            if part.len() > 1 && part.starts_with('0') {
                return Err(BoardError::invalid_ipv4());
            }
            *octet = part.parse().map_err(|_| BoardError::invalid_ipv4())?;
        }

        if parts.next().is_some() {
            return Err(BoardError::invalid_ipv4());
        }

        Ok(Self { octets })
    }
}

/// Server host as configured: an IPv4 literal or a DNS name.
///
/// # Examples
///
/// ```
/// use respeaker_board::net::{Host, Ipv4Addr};
///
/// assert_eq!(Host::parse("10.0.0.5").unwrap(), Host::Ip(Ipv4Addr::new(10, 0, 0, 5)));
/// assert_eq!(Host::parse("ingest.local").unwrap(), Host::Name("ingest.local"));
/// assert!(Host::parse("bad host").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Host<'a> {
    /// Literal IPv4 address, no lookup needed
    Ip(Ipv4Addr),
    /// Hostname to resolve through DNS
    Name(&'a str),
}

impl<'a> Host<'a> {
    /// Parse a configured host string.
    ///
    /// IPv4 literals are tried first. A dotted string of digits that is not
    /// a valid address (including zero-padded octets) is reported as a bad
    /// IPv4 literal rather than accepted as a name.
    pub fn parse(s: &'a str) -> Result<Self> {
        if s.is_empty() {
            return Err(BoardError::empty_host());
        }

        if let Ok(addr) = s.parse::<Ipv4Addr>() {
            return Ok(Host::Ip(addr));
        }

        let looks_numeric = s.bytes().any(|b| b.is_ascii_digit())
            && s.bytes().all(|b| b.is_ascii_digit() || b == b'.');
        if looks_numeric {
            return Err(BoardError::invalid_ipv4());
        }

        validate_hostname(s)?;
        Ok(Host::Name(s))
    }

    /// Returns the address if no DNS lookup is needed.
    pub const fn ip(&self) -> Option<Ipv4Addr> {
        match self {
            Host::Ip(addr) => Some(*addr),
            Host::Name(_) => None,
        }
    }

    /// Check whether the firmware has to resolve this host.
    pub const fn needs_resolution(&self) -> bool {
        matches!(self, Host::Name(_))
    }
}

impl fmt::Display for Host<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ip(addr) => write!(f, "{addr}"),
            Host::Name(name) => f.write_str(name),
        }
    }
}

/// RFC 1123 hostname check.
fn validate_hostname(s: &str) -> Result<()> {
    let name = s.strip_suffix('.').unwrap_or(s);

    if name.len() > MAX_HOSTNAME_LEN {
        return Err(BoardError::hostname_too_long());
    }
    if name.is_empty() {
        return Err(BoardError::invalid_hostname());
    }

    for label in name.split('.') {
        let bytes = label.as_bytes();
        let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
            return Err(BoardError::invalid_hostname());
        };
        if label.len() > MAX_LABEL_LEN {
            return Err(BoardError::hostname_too_long());
        }
        if first == b'-' || last == b'-' {
            return Err(BoardError::invalid_hostname());
        }
        if !bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-') {
            return Err(BoardError::invalid_hostname());
        }
    }

    Ok(())
}

/// Host and port of the ingestion server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServerEndpoint<'a> {
    /// Configured host
    pub host: Host<'a>,
    /// TCP port
    pub port: u16,
}

impl<'a> ServerEndpoint<'a> {
    /// Create a new endpoint.
    #[inline]
    pub const fn new(host: Host<'a>, port: u16) -> Self {
        Self { host, port }
    }
}

impl fmt::Display for ServerEndpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_from_str() {
        let addr: Ipv4Addr = "192.168.1.23".parse().unwrap();
        assert_eq!(addr.octets(), [192, 168, 1, 23]);
        assert_eq!(format!("{addr}"), "192.168.1.23");
    }

    #[test]
    fn test_ipv4_from_str_invalid() {
        assert!("192.168.1".parse::<Ipv4Addr>().is_err());
        assert!("192.168.1.256".parse::<Ipv4Addr>().is_err());
        assert!("192.168.1.10.5".parse::<Ipv4Addr>().is_err());
        assert!("192.168..10".parse::<Ipv4Addr>().is_err());
        assert!("192.168.1.+1".parse::<Ipv4Addr>().is_err());
        assert!("a.b.c.d".parse::<Ipv4Addr>().is_err());
    }

    #[test]
    fn test_ipv4_rejects_zero_padded_octets() {
        assert!("0010.0.0.1".parse::<Ipv4Addr>().is_err());
        assert!("192.168.01.1".parse::<Ipv4Addr>().is_err());
        assert!("10.0.0.00".parse::<Ipv4Addr>().is_err());

        let addr: Ipv4Addr = "10.0.0.0".parse().unwrap();
        assert_eq!(addr.octets(), [10, 0, 0, 0]);
    }

    #[test]
    fn test_host_zero_padded_is_bad_ipv4() {
        let BoardError::Host(e) = Host::parse("192.168.001.10").unwrap_err() else {
            panic!("expected host error");
        };
        assert!(e.is_invalid_ipv4());
    }

    #[test]
    fn test_ipv4_conversions() {
        let addr = Ipv4Addr::from([10, 0, 0, 1]);
        assert_eq!(<[u8; 4]>::from(addr), [10, 0, 0, 1]);
        assert_eq!(Ipv4Addr::UNSPECIFIED.octets(), [0, 0, 0, 0]);
        assert_eq!(Ipv4Addr::LOCALHOST.octets(), [127, 0, 0, 1]);
    }

    #[test]
    fn test_host_ip_literal() {
        let host = Host::parse("192.168.1.23").unwrap();
        assert_eq!(host.ip(), Some(Ipv4Addr::new(192, 168, 1, 23)));
        assert!(!host.needs_resolution());
    }

    #[test]
    fn test_host_names() {
        for name in ["localhost", "mqtt", "respeaker-service.lan", "a1.b2.example.com."] {
            let host = Host::parse(name).unwrap();
            assert_eq!(host, Host::Name(name));
            assert!(host.needs_resolution());
        }
    }

    #[test]
    fn test_host_numeric_but_not_ipv4() {
        let BoardError::Host(e) = Host::parse("192.168.1.300").unwrap_err() else {
            panic!("expected host error");
        };
        assert!(e.is_invalid_ipv4());
        assert!(Host::parse("10.0.0").is_err());
    }

    #[test]
    fn test_host_invalid_names() {
        for bad in ["bad host", "-lead.example", "trail-.example", "a..b", ".", "x_y.lan", "héllo"] {
            let err = Host::parse(bad).unwrap_err();
            let BoardError::Host(e) = err else {
                panic!("expected host error for {bad}");
            };
            assert!(e.is_invalid_hostname(), "{bad}");
        }
    }

    #[test]
    fn test_host_dots_only_is_bad_hostname() {
        for bad in [".", "..", "..."] {
            let BoardError::Host(e) = Host::parse(bad).unwrap_err() else {
                panic!("expected host error for {bad}");
            };
            assert!(e.is_invalid_hostname(), "{bad}");
            assert!(!e.is_invalid_ipv4(), "{bad}");
        }
    }

    #[test]
    fn test_host_empty() {
        let BoardError::Host(e) = Host::parse("").unwrap_err() else {
            panic!("expected host error");
        };
        assert!(e.is_empty());
    }

    #[test]
    fn test_host_length_limits() {
        let label = "a".repeat(MAX_LABEL_LEN + 1);
        assert!(Host::parse(&label).is_err());

        let label = "a".repeat(MAX_LABEL_LEN);
        assert!(Host::parse(&label).is_ok());

        // 4 * 63 + 3 dots = 255 bytes
        let long = [label.as_str(); 4].join(".");
        assert!(Host::parse(&long).is_err());
    }

    #[test]
    fn test_endpoint_display() {
        let ep = ServerEndpoint::new(Host::Ip(Ipv4Addr::new(10, 0, 0, 2)), DEFAULT_SERVER_PORT);
        assert_eq!(format!("{ep}"), "10.0.0.2:8010");

        let ep = ServerEndpoint::new(Host::Name("ingest.lan"), 9000);
        assert_eq!(format!("{ep}"), "ingest.lan:9000");
    }
}
