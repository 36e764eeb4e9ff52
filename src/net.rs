//! Address helpers: bind address rewriting and RFC 1918 detection.
//!
//! to_connectable / is_private / first_private_interface_address

use std::net::IpAddr;

use crate::error::AddrError;

const LOOPBACK_HOST: &str = "127.0.0.1";
const ALL_INTERFACES_PREFIX: &str = "0.0.0.0:";

/// Turn a listen (bind) address into one a local client can dial.
///
/// `0.0.0.0:PORT` and `:PORT` become `127.0.0.1:PORT`; anything else is
/// returned as-is. Purely textual: no DNS, no port validation.
pub fn to_connectable(bind_address: &str) -> String {
    if let Some(port) = bind_address.strip_prefix(ALL_INTERFACES_PREFIX) {
        return format!("{LOOPBACK_HOST}:{port}");
    }
    if bind_address.starts_with(':') {
        return format!("{LOOPBACK_HOST}{bind_address}");
    }
    bind_address.to_string()
}

/// True for addresses inside 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16.
///
/// Loopback and link-local are not private here. IPv4-mapped IPv6
/// addresses are checked against the IPv4 ranges.
pub fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().is_some_and(|v4| v4.is_private()),
    }
}

/// First private address among `addrs`, in iteration order.
pub fn first_private<I>(addrs: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find(|ip| is_private(*ip))
}

/// Scan the host interfaces (OS order) for the first private address.
pub fn first_private_interface_address() -> Result<IpAddr, AddrError> {
    let interfaces = if_addrs::get_if_addrs()?;
    for iface in &interfaces {
        tracing::trace!(interface = %iface.name, ip = %iface.ip(), "inspecting interface address");
    }
    first_private(interfaces.iter().map(|iface| iface.ip())).ok_or(AddrError::NoPrivateAddressFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn wildcard_host_becomes_loopback() {
        assert_eq!(to_connectable("0.0.0.0:8800"), "127.0.0.1:8800");
    }

    #[test]
    fn bare_port_gets_loopback_host() {
        assert_eq!(to_connectable(":8800"), "127.0.0.1:8800");
    }

    #[test]
    fn concrete_host_is_unchanged() {
        assert_eq!(to_connectable("10.0.0.5:8800"), "10.0.0.5:8800");
        assert_eq!(to_connectable("agent.local:7373"), "agent.local:7373");
        assert_eq!(to_connectable(""), "");
    }

    #[test]
    fn rfc1918_ranges_are_private() {
        for s in ["10.1.2.3", "172.16.0.1", "172.31.255.255", "192.168.1.1"] {
            assert!(is_private(ip(s)), "{s} should be private");
        }
    }

    #[test]
    fn public_loopback_and_link_local_are_not_private() {
        for s in ["8.8.8.8", "127.0.0.1", "169.254.1.1", "172.32.0.1", "11.0.0.1"] {
            assert!(!is_private(ip(s)), "{s} should not be private");
        }
    }

    #[test]
    fn ipv6_only_private_when_mapped_from_rfc1918() {
        let mapped = IpAddr::V6(Ipv4Addr::new(10, 0, 0, 1).to_ipv6_mapped());
        assert!(is_private(mapped));
        assert!(!is_private(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert!(!is_private(ip("fe80::1")));
        assert!(!is_private(ip("fd00::1")));
    }

    #[test]
    fn first_private_keeps_order() {
        let addrs = vec![ip("127.0.0.1"), ip("8.8.8.8"), ip("192.168.0.7"), ip("10.0.0.1")];
        assert_eq!(first_private(addrs), Some(ip("192.168.0.7")));
        assert_eq!(first_private(vec![ip("127.0.0.1")]), None);
        assert_eq!(first_private(Vec::new()), None);
    }
}
