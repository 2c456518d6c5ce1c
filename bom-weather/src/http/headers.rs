//! Browser-like request headers.
//!
//! The agency's pages sit behind bot detection that rejects obvious
//! scripted clients. Every request carries the header set a desktop
//! browser sends for a top-level navigation, and the User-Agent can be
//! rotated through a small pool after a 403.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::RngExt;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, DNT, HeaderMap, HeaderName, HeaderValue, UPGRADE_INSECURE_REQUESTS,
};

/// Realistic desktop browser signatures.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
];

/// Static headers sent on every request (everything except User-Agent).
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-AU,en-GB;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let fetch_metadata = [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
        (
            "sec-ch-ua",
            "\"Chromium\";v=\"118\", \"Google Chrome\";v=\"118\", \"Not=A?Brand\";v=\"99\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"macOS\""),
    ];
    for (name, value) in fetch_metadata {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
}

/// The User-Agent currently in use, rotatable from [`USER_AGENTS`].
#[derive(Debug, Default)]
pub struct UserAgentPool {
    current: AtomicUsize,
}

impl UserAgentPool {
    /// Start with the first signature in the pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The User-Agent to send on the next request.
    pub fn current(&self) -> &'static str {
        USER_AGENTS[self.current.load(Ordering::Relaxed) % USER_AGENTS.len()]
    }

    /// Switch to a different, randomly chosen signature and return it.
    pub fn rotate(&self) -> &'static str {
        let current = self.current.load(Ordering::Relaxed) % USER_AGENTS.len();
        // Pick from the other entries so a rotation always changes the value.
        let offset = rand::rng().random_range(1..USER_AGENTS.len());
        let next = (current + offset) % USER_AGENTS.len();
        self.current.store(next, Ordering::Relaxed);
        USER_AGENTS[next]
    }
}
