//! Outbound URL guard: keeps link checks away from loopback, private, and
//! cloud-metadata addresses.

use std::fmt;
use std::net::IpAddr;
use url::{Host, Url};

/// A link whose host is, or resolves to, an internal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedHost {
    pub host: String,
    pub addr: Option<IpAddr>,
}

impl fmt::Display for BlockedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            Some(addr) => write!(f, "host '{}' resolves to internal address {addr}", self.host),
            None => write!(f, "host '{}' is internal", self.host),
        }
    }
}

impl std::error::Error for BlockedHost {}

/// Check whether an IP address is private, loopback, link-local, or metadata.
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4.octets()),
        IpAddr::V6(v6) => {
            let segs = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                || (segs[0] & 0xfe00) == 0xfc00 // unique-local fc00::/7
                || (segs[0] & 0xffc0) == 0xfe80 // link-local fe80::/10
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_v4(v4.octets()))
        }
    }
}

fn is_private_v4(octets: [u8; 4]) -> bool {
    let v4 = std::net::Ipv4Addr::from(octets);
    v4.is_loopback()
        || v4.is_private()
        || v4.is_link_local()
        || v4.is_unspecified()
        || v4.is_broadcast()
        // carrier-grade NAT 100.64.0.0/10
        || (octets[0] == 100 && (octets[1] & 0xc0) == 64)
}

/// Literal check on the URL host, without DNS.
///
/// Used where resolution is not possible, such as the redirect policy.
pub fn is_private_url(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(v4)) => is_private_ip(&IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => is_private_ip(&IpAddr::V6(v6)),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        None => true,
    }
}

/// Reject `url` when its host is internal or any resolved address is.
///
/// Resolution failures pass; the check itself will then fail to connect.
pub async fn ensure_public_url(url: &Url) -> Result<(), BlockedHost> {
    let host = url.host_str().unwrap_or_default();
    if is_private_url(url) {
        return Err(BlockedHost {
            host: host.to_string(),
            addr: None,
        });
    }

    let Some(Host::Domain(domain)) = url.host() else {
        return Ok(());
    };
    let port = url.port_or_known_default().unwrap_or(443);
    if let Ok(addrs) = tokio::net::lookup_host((domain, port)).await {
        for addr in addrs {
            if is_private_ip(&addr.ip()) {
                return Err(BlockedHost {
                    host: host.to_string(),
                    addr: Some(addr.ip()),
                });
            }
        }
    }
    Ok(())
}
