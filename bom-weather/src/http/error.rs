//! HTTP client error types.

/// Errors from a single agency request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// HTTP 403: the agency's bot detection rejected the request
    #[error("403 Forbidden: agency is blocking requests to {url}")]
    Blocked { url: String },

    /// HTTP 429
    #[error("429 Too Many Requests: agency is rate limiting requests to {url}")]
    RateLimited { url: String },

    /// Connect or read timeout
    #[error("timed out requesting {url}")]
    Timeout { url: String },

    /// Host name could not be resolved
    #[error("DNS resolution failed for {url}")]
    DnsFailure { url: String },

    /// Any other transport failure (refused, reset, TLS, body read)
    #[error("connection error for {url}: {message}")]
    Connection { url: String, message: String },

    /// Any other status >= 400
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },
}

impl FetchError {
    /// Build a transport error from a `reqwest` failure, separating
    /// timeouts and DNS failures from other connection problems.
    pub fn from_transport(url: &str, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            return FetchError::Timeout { url };
        }

        let message = error_chain(err);
        if is_dns_failure(&message) {
            FetchError::DnsFailure { url }
        } else {
            FetchError::Connection { url, message }
        }
    }

    /// Whether the retry wrapper should try again after this error.
    ///
    /// Plain HTTP errors (404, 500, ...) are final: a missing monthly CSV
    /// will not appear on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Blocked { .. }
                | FetchError::RateLimited { .. }
                | FetchError::Timeout { .. }
                | FetchError::DnsFailure { .. }
                | FetchError::Connection { .. }
        )
    }

    /// The URL the failed request was for, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Blocked { url }
            | FetchError::RateLimited { url }
            | FetchError::Timeout { url }
            | FetchError::DnsFailure { url }
            | FetchError::Connection { url, .. }
            | FetchError::HttpStatus { url, .. } => Some(url),
            FetchError::Client { .. } => None,
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_dns_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("nodename nor servname")
        || lower.contains("name or service not known")
}
