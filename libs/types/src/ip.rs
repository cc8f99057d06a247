//! # IP Address + Port Descriptor
//!
//! Describes where a peer can be reached. The wire form is always 18 bytes
//! (16 IPv6 octets + big-endian port); IPv4 addresses travel v4-mapped. The
//! constructor normalizes v4-mapped IPv6 input back to IPv4 so a value always
//! compares equal to its own decode.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// An IP address and port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpPort {
    addr: IpAddr,
    port: u16,
}

impl IpPort {
    /// Construct a descriptor, normalizing v4-mapped IPv6 addresses to IPv4
    pub fn new(addr: IpAddr, port: u16) -> Self {
        let addr = match addr {
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            },
            v4 => v4,
        };
        IpPort { addr, port }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The 16 IPv6 octets of the address (IPv4 addresses are v4-mapped)
    pub fn ipv6_octets(&self) -> [u8; 16] {
        match self.addr {
            IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
            IpAddr::V6(v6) => v6.octets(),
        }
    }

    /// Rebuild from 16 IPv6 octets and a port
    pub fn from_ipv6_octets(octets: [u8; 16], port: u16) -> Self {
        IpPort::new(IpAddr::V6(Ipv6Addr::from(octets)), port)
    }

    /// Whether the address is unspecified (0.0.0.0 or ::)
    pub fn is_unspecified(&self) -> bool {
        self.addr.is_unspecified()
    }
}

impl fmt::Display for IpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SocketAddr::new(self.addr, self.port).fmt(f)
    }
}

impl From<SocketAddr> for IpPort {
    fn from(sa: SocketAddr) -> Self {
        IpPort::new(sa.ip(), sa.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_v4_octets_roundtrip() {
        let ip = IpPort::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 9651);
        let rebuilt = IpPort::from_ipv6_octets(ip.ipv6_octets(), ip.port());
        assert_eq!(rebuilt, ip);
        assert_eq!(rebuilt.addr(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_v6_octets_roundtrip() {
        let v6: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let ip = IpPort::new(IpAddr::V6(v6), 9651);
        let rebuilt = IpPort::from_ipv6_octets(ip.ipv6_octets(), ip.port());
        assert_eq!(rebuilt, ip);
    }

    #[test]
    fn test_v4_mapped_input_normalizes() {
        let mapped: Ipv6Addr = "::ffff:192.0.2.7".parse().unwrap();
        let ip = IpPort::new(IpAddr::V6(mapped), 80);
        assert_eq!(ip.addr(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)));
    }
}
