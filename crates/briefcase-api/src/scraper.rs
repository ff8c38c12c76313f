use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{header::LOCATION, Url};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::OnceLock;
use std::time::Duration;

/// Fetches a web page and reduces it to readable text
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Page fetcher for prospect research.
///
/// Every hop, redirects included, must resolve to a public address unless
/// private hosts are explicitly allowed. The connection is pinned to the
/// address that was checked.
pub struct HttpScraper {
    timeout: Duration,
    max_chars: usize,
    allow_private_hosts: bool,
}

const MAX_REDIRECTS: usize = 5;

impl HttpScraper {
    pub fn new(max_chars: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            timeout,
            max_chars,
            allow_private_hosts: false,
        })
    }

    pub fn with_private_hosts(mut self, allow: bool) -> Self {
        self.allow_private_hosts = allow;
        self
    }

    async fn resolve(&self, url: &Url) -> Result<SocketAddr> {
        let host = url
            .host_str()
            .with_context(|| format!("URL has no host: {}", url))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let port = url.port_or_known_default().unwrap_or(80);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
            .await
            .with_context(|| format!("Failed to resolve {}", host))?
            .collect();

        if !self.allow_private_hosts {
            if let Some(addr) = addrs.iter().find(|a| !is_public(a.ip())) {
                bail!("Refusing to fetch {}: resolves to non-public address {}", host, addr.ip());
            }
        }

        addrs
            .into_iter()
            .next()
            .with_context(|| format!("No addresses found for {}", host))
    }

    fn client_for(&self, url: &Url, addr: SocketAddr) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("briefcase/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none());
        if let Some(host) = url.host_str() {
            builder = builder.resolve(host, addr);
        }
        builder.build().context("Failed to create HTTP client")
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut target = parse_http_url(url)?;

        for _ in 0..=MAX_REDIRECTS {
            let addr = self.resolve(&target).await?;
            let response = self
                .client_for(&target, addr)?
                .get(target.clone())
                .send()
                .await
                .with_context(|| format!("Failed to fetch {}", target))?;

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .with_context(|| format!("Redirect from {} without a location", target))?;
                let next = target
                    .join(location)
                    .with_context(|| format!("Invalid redirect location: {}", location))?;
                target = parse_http_url(next.as_str())?;
                continue;
            }
            if !status.is_success() {
                bail!("Fetching {} failed with status {}", target, status);
            }

            let html = response.text().await.context("Failed to read page body")?;
            let text = html_to_text(&html, self.max_chars);
            tracing::debug!(url = %target, chars = text.chars().count(), "Scraped page");
            return Ok(text);
        }

        bail!("Too many redirects fetching {}", url)
    }
}

fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme: {}", parsed.scheme());
    }
    Ok(parsed)
}

/// Globally routable unicast address
fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(v4),
            None => {
                let first = v6.segments()[0];
                !(v6.is_loopback()
                    || v6.is_unspecified()
                    || v6.is_multicast()
                    || (first & 0xfe00) == 0xfc00
                    || (first & 0xffc0) == 0xfe80)
            }
        },
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_multicast()
        || ip.is_documentation()
        || a == 0
        || (a == 100 && (64..128).contains(&b)))
}

fn patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>")
                .unwrap(),
            Regex::new(r"(?s)<[^>]*>").unwrap(),
            Regex::new(r"\s+").unwrap(),
        )
    })
}

/// Drop scripts, styles and tags, decode the common entities, collapse
/// whitespace and keep at most `max_chars` characters.
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    let (blocks, tags, spaces) = patterns();

    let without_blocks = blocks.replace_all(html, " ");
    let without_tags = tags.replace_all(&without_blocks, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let collapsed = spaces.replace_all(&decoded, " ");

    collapsed.trim().chars().take(max_chars).collect()
}
