//! Resilient HTTP client for the agency's publication website.
//!
//! The agency publishes no stable API, only HTML pages and monthly CSV
//! files behind bot detection. This module provides:
//! - browser-like headers with User-Agent rotation
//! - per-client request spacing with random jitter
//! - status classification (403 blocked, 429 rate limited, other errors)
//! - an explicit [`RetryPolicy`] with exponential backoff

mod client;
mod error;
mod headers;
mod retry;

pub use client::{
    AgencyClient, ClientConfig, DEFAULT_TIMEOUT_SECS, PageFetcher, RequestPacer, SessionInfo,
    classify_status,
};
pub use error::FetchError;
pub use headers::{USER_AGENTS, UserAgentPool, browser_headers};
pub use retry::RetryPolicy;
