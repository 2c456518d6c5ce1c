//! Weather queries.
//!
//! A [`WeatherRequest`] is what callers hand in: free text and date
//! strings. A [`WeatherQuery`] is the validated form the pipeline runs on.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::warn;

use super::{AustralianState, MonthKey};
use crate::error::WeatherError;

/// Date format accepted for query dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An unvalidated query as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRequest {
    /// Town name, e.g. "Launceston".
    pub location: String,
    /// State name or postal code, e.g. "Tasmania" or "TAS".
    pub state: String,
    /// First day of an inclusive range (`YYYY-MM-DD`).
    pub date_from: Option<String>,
    /// Last day of an inclusive range (`YYYY-MM-DD`).
    pub date_to: Option<String>,
    /// Explicit dates; when present, the range fields are ignored.
    pub dates: Option<Vec<String>>,
}

impl WeatherRequest {
    /// Query an inclusive date range.
    pub fn range(
        location: impl Into<String>,
        state: impl Into<String>,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            state: state.into(),
            date_from: Some(date_from.into()),
            date_to: Some(date_to.into()),
            dates: None,
        }
    }

    /// Query a single day.
    pub fn day(
        location: impl Into<String>,
        state: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            state: state.into(),
            date_from: Some(date.into()),
            ..Self::default()
        }
    }

    /// Query an explicit set of dates.
    pub fn dates<I, S>(location: impl Into<String>, state: impl Into<String>, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            location: location.into(),
            state: state.into(),
            dates: Some(dates.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// "{location}, {state}" as the caller wrote them.
    pub fn display_location(&self) -> String {
        format!("{}, {}", self.location.trim(), self.state.trim())
    }
}

/// A validated query: known state, non-empty location, at least one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    location: String,
    state: &'static AustralianState,
    dates: BTreeSet<NaiveDate>,
}

impl WeatherQuery {
    /// Validate a request.
    ///
    /// Fails with `InvalidQuery` for an empty location or when no valid
    /// date can be derived, and `UnknownState` when the state is not in the
    /// table. Makes no network requests.
    pub fn from_request(request: &WeatherRequest) -> Result<Self, WeatherError> {
        let location = request.location.trim();
        if location.is_empty() {
            return Err(WeatherError::InvalidQuery {
                reason: "location must not be empty".to_string(),
            });
        }

        let dates = derive_dates(request)?;

        let state =
            AustralianState::lookup(&request.state).ok_or_else(|| WeatherError::UnknownState {
                state: request.state.clone(),
            })?;

        Ok(Self {
            location: location.to_string(),
            state,
            dates,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> &'static AustralianState {
        self.state
    }

    /// Requested dates, ascending.
    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    /// Distinct months spanned by the requested dates, ascending.
    pub fn months(&self) -> BTreeSet<MonthKey> {
        self.dates.iter().map(|d| MonthKey::of(*d)).collect()
    }

    /// Canonical cache key: `location|state|sorted dates`.
    ///
    /// Location is lowercased and whitespace-collapsed; the state is the
    /// table code, so "TAS" and "Tasmania" share entries.
    pub fn cache_key(&self) -> String {
        let location = self
            .location
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let dates = self
            .dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}|{}|{}", location, self.state.code, dates)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Expand the request's date fields into a set of dates.
fn derive_dates(request: &WeatherRequest) -> Result<BTreeSet<NaiveDate>, WeatherError> {
    let no_dates = || WeatherError::InvalidQuery {
        reason: "no valid dates provided".to_string(),
    };

    if let Some(dates) = request.dates.as_ref().filter(|d| !d.is_empty()) {
        let mut parsed = BTreeSet::new();
        for raw in dates {
            match parse_date(raw) {
                Some(date) => {
                    parsed.insert(date);
                }
                None => warn!(date = %raw, "skipping invalid date"),
            }
        }
        if parsed.is_empty() {
            return Err(no_dates());
        }
        return Ok(parsed);
    }

    let from = match request.date_from.as_deref() {
        Some(raw) => parse_date(raw).ok_or_else(|| WeatherError::InvalidQuery {
            reason: format!("invalid date_from '{raw}', expected YYYY-MM-DD"),
        })?,
        None => return Err(no_dates()),
    };

    let to = match request.date_to.as_deref() {
        Some(raw) => parse_date(raw).ok_or_else(|| WeatherError::InvalidQuery {
            reason: format!("invalid date_to '{raw}', expected YYYY-MM-DD"),
        })?,
        None => from,
    };

    if from > to {
        return Err(WeatherError::InvalidQuery {
            reason: format!("date_from {from} is after date_to {to}"),
        });
    }

    Ok(from.iter_days().take_while(|d| *d <= to).collect())
}
