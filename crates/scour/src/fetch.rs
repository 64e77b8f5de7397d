// ABOUTME: Pluggable URL fetching for multi-page traversal.
// ABOUTME: Default blocking HTTP fetcher with private-network guard, size cap, and charset detection.

use std::net::{IpAddr, ToSocketAddrs};
use std::time::Duration;

use anyhow::{anyhow, bail};
use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use url::Url;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Reads the raw HTML behind a URL.
///
/// Implementations may fail with any error; the multi-page assembler treats
/// every failure as "stop appending". Swapping this out is also the easy way
/// to test multi-page assembly without a network.
pub trait Fetcher: Send + Sync {
    fn urlread(&self, url: &str) -> anyhow::Result<String>;
}

/// Blocking HTTP fetcher used when nothing else is injected.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "scour/0.1".to_string(),
            allow_private_networks: false,
        }
    }
}

static PRIVATE_V4: Lazy<[Ipv4Net; 5]> = Lazy::new(|| {
    [
        // RFC1918 private ranges
        "10.0.0.0/8".parse().unwrap(),
        "172.16.0.0/12".parse().unwrap(),
        "192.168.0.0/16".parse().unwrap(),
        // Loopback
        "127.0.0.0/8".parse().unwrap(),
        // Link-local
        "169.254.0.0/16".parse().unwrap(),
    ]
});

static PRIVATE_V6: Lazy<[Ipv6Net; 2]> = Lazy::new(|| {
    [
        // Unique local
        "fc00::/7".parse().unwrap(),
        // Link-local
        "fe80::/10".parse().unwrap(),
    ]
});

fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => ip.is_loopback() || PRIVATE_V6.iter().any(|net| net.contains(ip)),
    }
}

/// Refuse URLs whose host resolves into a private or reserved range.
fn check_host(parsed: &Url) -> anyhow::Result<()> {
    let Some(host) = parsed.host_str() else {
        bail!("URL has no host");
    };
    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            bail!("private IP addresses are not allowed");
        }
        return Ok(());
    }
    let port = parsed
        .port()
        .unwrap_or(if parsed.scheme() == "https" { 443 } else { 80 });
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|err| anyhow!("DNS lookup failed: {}", err))?;
    for addr in addrs {
        if is_private_ip(&addr.ip()) {
            bail!("private IP addresses are not allowed");
        }
    }
    Ok(())
}

/// Extract the charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Decode body bytes using the declared charset, falling back to detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(content_type) = content_type {
        if let Some(charset) = extract_charset(content_type) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

impl Fetcher for HttpFetcher {
    fn urlread(&self, url: &str) -> anyhow::Result<String> {
        if url.is_empty() {
            bail!("empty URL");
        }
        let parsed = Url::parse(url).map_err(|err| anyhow!("invalid URL: {}", err))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            bail!("scheme must be http or https");
        }
        if !self.allow_private_networks {
            check_host(&parsed)?;
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()?;

        let response = client.get(url).send()?;
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_lowercase());

        if let Some(length) = response.content_length() {
            if length as usize > MAX_CONTENT_LENGTH {
                bail!("content too large");
            }
        }
        if !status.is_success() {
            bail!("HTTP status {}", status.as_u16());
        }

        let body = response.bytes()?;
        if body.len() > MAX_CONTENT_LENGTH {
            bail!("content too large");
        }

        Ok(decode_body(&body, content_type.as_deref()))
    }
}
