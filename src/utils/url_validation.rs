//! URL safety classification for SSRF protection
//!
//! The worker receives audio URLs from an upstream API and must decide whether
//! a URL points into private or local network space before fetching it. This
//! module answers that question without performing any I/O: hostnames that are
//! not IP literals are treated as public DNS names.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::{Host, Url};

/// Hostnames that always refer to the local machine.
const LOCALHOST_ALIASES: &[&str] = &["localhost", "localhost.localdomain", "ip6-localhost"];

/// Errors that can occur while parsing an audio URL
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Checks if an IPv4 address is private/internal
///
/// Private addresses include:
/// - Loopback (127.0.0.0/8)
/// - Private (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
/// - Link-local (169.254.0.0/16)
/// - Broadcast (255.255.255.255)
/// - Documentation (192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24)
/// - Unspecified (0.0.0.0)
/// - Shared (100.64.0.0/10 - CGNAT)
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    if ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
    {
        return true;
    }
    let octets = ip.octets();
    // Shared address space (CGNAT) 100.64.0.0/10
    if octets[0] == 100 && (octets[1] & 0xC0) == 64 {
        return true;
    }
    // Reserved for benchmarking 198.18.0.0/15
    octets[0] == 198 && (octets[1] == 18 || octets[1] == 19)
}

/// Checks if an IPv6 address is private/internal
///
/// Private addresses include:
/// - Loopback (::1)
/// - Unspecified (::)
/// - Link-local (fe80::/10)
/// - Unique local (fc00::/7)
/// - Documentation (2001:db8::/32)
/// - IPv4-mapped private addresses
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }

    let segments = ip.segments();

    // Link-local (fe80::/10)
    if segments[0] & 0xFFC0 == 0xFE80 {
        return true;
    }
    // Unique local address (fc00::/7)
    if segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }
    // Documentation (2001:db8::/32)
    if segments[0] == 0x2001 && segments[1] == 0x0DB8 {
        return true;
    }

    match ip.to_ipv4_mapped() {
        Some(ipv4) => is_private_ipv4(&ipv4),
        None => false,
    }
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

/// Returns true when `hostname` names loopback, link-local or private address
/// space, or is a well-known localhost alias.
///
/// Anything that is not an IP literal (including malformed input) is treated as
/// a public DNS name and yields false. Bracketed IPv6 literals such as `[::1]`
/// are accepted.
///
/// # Example
/// ```rust
/// use talesync_worker::utils::url_validation::is_private_or_local_host;
///
/// assert!(is_private_or_local_host("localhost"));
/// assert!(is_private_or_local_host("192.168.1.20"));
/// assert!(!is_private_or_local_host("example.com"));
/// ```
pub fn is_private_or_local_host(hostname: &str) -> bool {
    let host = hostname.trim().to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }
    if LOCALHOST_ALIASES.contains(&host.as_str()) {
        return true;
    }

    let literal = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(&host);

    literal
        .parse::<IpAddr>()
        .map(|ip| is_private_ip(&ip))
        .unwrap_or(false)
}

/// Classifies an already parsed URL host.
pub fn is_private_or_local(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => is_private_or_local_host(domain),
        Host::Ipv4(ip) => is_private_ipv4(ip),
        Host::Ipv6(ip) => is_private_ipv6(ip),
    }
}

/// Parses an audio URL, requiring an absolute http(s) URL with a host.
pub fn parse_audio_url(raw: &str) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(raw.trim())?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}
