//! Pipeline error types.
//!
//! Every failure that can end a query is a [`WeatherError`]. The facade
//! never lets one escape: it is folded into a failed `WeatherResult`
//! carrying the message and a [`FailureKind`] tag.

use serde::Serialize;

use crate::domain::MonthKey;
use crate::http::FetchError;

/// Which pipeline step a network failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The state's daily-observations index page
    IndexPage,
    /// A letter-group page listing stations
    LetterGroupPage,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::IndexPage => f.write_str("index page"),
            Phase::LetterGroupPage => f.write_str("letter group page"),
        }
    }
}

/// Errors that end a weather query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    /// The request could not be turned into a query
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// State is not in the static table
    #[error("Unknown state: {state}")]
    UnknownState { state: String },

    /// Index page contained no letter-group links
    #[error("could not find letter group links on {url}")]
    NoLetterGroupsFound { url: String },

    /// No letter group covers the location (strict mode only)
    #[error("no letter group found for location '{location}'; available groups: {available:?}")]
    NoMatchingGroup {
        location: String,
        available: Vec<String>,
    },

    /// Letter-group page contained no station links
    #[error("no station links found in letter group {group}")]
    NoStationsFound { group: String },

    /// No station link matched the location
    #[error("location '{location}' not found in letter group {group}")]
    NoStationMatch { location: String, group: String },

    /// Every month failed, or no downloaded row matched a requested date
    #[error("no data extracted for target dates ({months_processed} of {months_requested} months downloaded)")]
    NoTargetRecords {
        station_id: String,
        months_processed: usize,
        months_requested: usize,
        months_failed: Vec<MonthKey>,
        /// Rows parsed before filtering to the requested dates
        total_records: usize,
    },

    /// A page fetch failed after retries
    #[error("failed to fetch {phase}: {source}")]
    Fetch {
        phase: Phase,
        #[source]
        source: FetchError,
    },

    /// A page could not be interpreted at all
    #[error("unexpected parse failure: {message}")]
    UnexpectedParse { message: String },
}

/// Serializable failure category for callers that branch on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidQuery,
    UnknownState,
    NoLetterGroupsFound,
    NoMatchingGroup,
    NoStationsFound,
    NoStationMatch,
    NoTargetRecordsExtracted,
    Blocked,
    RateLimited,
    DnsFailure,
    ConnectionTimeout,
    ConnectionError,
    HttpError,
    UnexpectedParseFailure,
}

impl WeatherError {
    /// The failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::InvalidQuery { .. } => FailureKind::InvalidQuery,
            WeatherError::UnknownState { .. } => FailureKind::UnknownState,
            WeatherError::NoLetterGroupsFound { .. } => FailureKind::NoLetterGroupsFound,
            WeatherError::NoMatchingGroup { .. } => FailureKind::NoMatchingGroup,
            WeatherError::NoStationsFound { .. } => FailureKind::NoStationsFound,
            WeatherError::NoStationMatch { .. } => FailureKind::NoStationMatch,
            WeatherError::NoTargetRecords { .. } => FailureKind::NoTargetRecordsExtracted,
            WeatherError::Fetch { source, .. } => match source {
                FetchError::Blocked { .. } => FailureKind::Blocked,
                FetchError::RateLimited { .. } => FailureKind::RateLimited,
                FetchError::DnsFailure { .. } => FailureKind::DnsFailure,
                FetchError::Timeout { .. } => FailureKind::ConnectionTimeout,
                FetchError::Connection { .. } | FetchError::Client { .. } => {
                    FailureKind::ConnectionError
                }
                FetchError::HttpStatus { .. } => FailureKind::HttpError,
            },
            WeatherError::UnexpectedParse { .. } => FailureKind::UnexpectedParseFailure,
        }
    }

    /// Station identifier, when the failure happened after one was resolved.
    pub fn station_id(&self) -> Option<&str> {
        match self {
            WeatherError::NoTargetRecords { station_id, .. } => Some(station_id),
            _ => None,
        }
    }

    pub(crate) fn fetch(phase: Phase, source: FetchError) -> Self {
        WeatherError::Fetch { phase, source }
    }
}
