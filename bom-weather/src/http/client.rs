//! Agency HTTP client.
//!
//! Sends browser-like GET requests, spaces consecutive requests with a
//! randomized delay, classifies blocking status codes, and wraps requests
//! in a [`RetryPolicy`] that rotates the User-Agent after a 403.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::RngExt;
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::error::FetchError;
use super::headers::{UserAgentPool, browser_headers};
use super::retry::RetryPolicy;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of agency pages.
///
/// The pipeline phases only depend on this trait, so tests can serve
/// fixture pages without a network.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch `url` as text, retrying according to `policy`.
    ///
    /// Returns the final error once retries are exhausted or a
    /// non-retryable error occurs.
    async fn fetch(&self, url: &str, policy: &RetryPolicy) -> Result<String, FetchError>;
}

/// Configuration for the agency client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Lower bound of the spacing between consecutive requests
    pub min_delay: Duration,
    /// Upper bound of the spacing between consecutive requests
    pub max_delay: Duration,
}

impl ClientConfig {
    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the request spacing bounds.
    pub fn with_delay(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay.max(min_delay);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Enforces a minimum randomized gap between requests from one client.
///
/// The lock is held while sleeping, so concurrent callers sharing a client
/// queue up behind each other.
#[derive(Debug)]
pub struct RequestPacer {
    min_delay: Duration,
    max_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    /// Create a pacer with the given spacing bounds.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
            last_request: Mutex::new(None),
        }
    }

    /// Pick this request's required spacing from `[min_delay, max_delay]`.
    fn required_gap(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let secs = rand::rng()
            .random_range(self.min_delay.as_secs_f64()..=self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Wait until enough time has passed since the previous request, then
    /// record this request's start. Returns how long it slept.
    pub async fn wait(&self) -> Duration {
        let mut last = self.last_request.lock().await;

        let mut slept = Duration::ZERO;
        if let Some(previous) = *last {
            let gap = self.required_gap();
            let elapsed = previous.elapsed();
            if elapsed < gap {
                slept = gap - elapsed;
                debug!(wait_ms = slept.as_millis() as u64, "rate limiting");
                tokio::time::sleep(slept).await;
            }
        }

        *last = Some(Instant::now());
        slept
    }
}

/// Map a response status to the client's error taxonomy.
///
/// 403 is bot detection, 429 is rate limiting, anything else >= 400 is a
/// plain HTTP error.
pub fn classify_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    let url = url.to_string();
    match status {
        StatusCode::FORBIDDEN => Err(FetchError::Blocked { url }),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited { url }),
        s if s.is_client_error() || s.is_server_error() => Err(FetchError::HttpStatus {
            url,
            status: s.as_u16(),
        }),
        _ => Ok(()),
    }
}

/// Snapshot of the client's session for diagnostics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionInfo {
    pub request_count: u64,
    pub user_agent: String,
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
}

/// HTTP client for the agency's publication website.
#[derive(Debug)]
pub struct AgencyClient {
    http: reqwest::Client,
    user_agents: UserAgentPool,
    pacer: RequestPacer,
    request_count: AtomicU64,
}

impl AgencyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            user_agents: UserAgentPool::new(),
            pacer: RequestPacer::new(config.min_delay, config.max_delay),
            request_count: AtomicU64::new(0),
        })
    }

    /// Issue one paced GET request and return the body text.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.wait().await;

        let user_agent = self.user_agents.current();
        debug!(url, "requesting");

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url, &e))?;

        let status = response.status();
        if let Err(err) = classify_status(url, status) {
            if matches!(err, FetchError::Blocked { .. }) {
                warn!(url, user_agent, "request blocked by bot detection");
            } else {
                debug!(url, status = status.as_u16(), "request failed");
            }
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(url, &e))?;

        self.request_count.fetch_add(1, Ordering::Relaxed);
        debug!(url, status = status.as_u16(), chars = body.len(), "downloaded");
        Ok(body)
    }

    /// GET with retries, rotating the User-Agent after each 403.
    pub async fn get_with_retry(
        &self,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<String, FetchError> {
        policy
            .run(
                || self.get(url),
                |err| {
                    if matches!(err, FetchError::Blocked { .. }) {
                        let agent = self.user_agents.rotate();
                        debug!(user_agent = agent, "rotated user agent");
                    }
                },
            )
            .await
    }

    /// Number of successful requests made by this client.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Current session state.
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            request_count: self.request_count(),
            user_agent: self.user_agents.current().to_string(),
            min_delay_secs: self.pacer.min_delay.as_secs_f64(),
            max_delay_secs: self.pacer.max_delay.as_secs_f64(),
        }
    }
}

impl PageFetcher for AgencyClient {
    async fn fetch(&self, url: &str, policy: &RetryPolicy) -> Result<String, FetchError> {
        self.get_with_retry(url, policy).await
    }
}
