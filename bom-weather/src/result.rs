//! Query results returned by the service facade.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DailyRecord, MonthKey};
use crate::error::{FailureKind, WeatherError};
use crate::stations::MatchType;

/// Attribution carried in every successful result.
pub const DATA_SOURCE: &str = "Bureau of Meteorology (BOM) Australia";

/// How the records were obtained.
pub const METHOD: &str = "HTML navigation + monthly CSV";

/// Provenance and coverage of a result.
///
/// Failed results carry whatever was known when the query stopped: the
/// letter group and station fields are `None` until that phase finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMetadata {
    pub requested_dates: usize,
    pub records_returned: usize,
    /// `"{records_returned}/{requested_dates}"`
    pub coverage: String,
    pub months_processed: usize,
    pub months_failed: Vec<MonthKey>,
    /// Rows downloaded before filtering to the requested dates.
    pub total_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_group: Option<String>,
    /// True when no letter group covered the location and the first
    /// group was searched instead.
    pub letter_group_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    pub extraction_timestamp: DateTime<Utc>,
    pub data_source: String,
    pub method: String,
}

impl ResultMetadata {
    /// Metadata for a query over `requested_dates` dates before any
    /// phase has run.
    pub fn pending(requested_dates: usize) -> Self {
        Self {
            requested_dates,
            records_returned: 0,
            coverage: format!("0/{requested_dates}"),
            months_processed: 0,
            months_failed: Vec::new(),
            total_records: 0,
            letter_group: None,
            letter_group_fallback: false,
            station_name: None,
            match_type: None,
            match_score: None,
            extraction_timestamp: Utc::now(),
            data_source: DATA_SOURCE.to_string(),
            method: METHOD.to_string(),
        }
    }

    pub(crate) fn set_records_returned(&mut self, records_returned: usize) {
        self.records_returned = records_returned;
        self.coverage = format!("{records_returned}/{}", self.requested_dates);
    }
}

/// Outcome of one weather query.
///
/// Failures are values, not errors: `success` is false, `error` holds
/// the message and `failure` its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResult {
    pub success: bool,
    /// `"{location}, {state}"` as requested.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(rename = "data")]
    pub records: Vec<DailyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResultMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_timestamp: Option<DateTime<Utc>>,
}

impl WeatherResult {
    pub fn success(
        location: impl Into<String>,
        station_id: impl Into<String>,
        records: Vec<DailyRecord>,
        metadata: ResultMetadata,
    ) -> Self {
        Self {
            success: true,
            location: location.into(),
            station_id: Some(station_id.into()),
            records,
            metadata: Some(metadata),
            error: None,
            failure: None,
            cached: false,
            cache_timestamp: None,
        }
    }

    /// A failed result for `err`, without metadata. Keeps the station id
    /// when one had already been resolved.
    pub fn failure(location: impl Into<String>, err: &WeatherError) -> Self {
        Self {
            success: false,
            location: location.into(),
            station_id: err.station_id().map(str::to_string),
            records: Vec::new(),
            metadata: None,
            error: Some(err.to_string()),
            failure: Some(err.kind()),
            cached: false,
            cache_timestamp: None,
        }
    }

    /// Attach the metadata gathered before a failure.
    pub fn with_metadata(mut self, metadata: ResultMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// This result as served from a cache entry stored at `stored_at`.
    pub fn into_cached(self, stored_at: DateTime<Utc>) -> Self {
        Self {
            cached: true,
            cache_timestamp: Some(stored_at),
            ..self
        }
    }
}

/// Snapshot of the result cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub ttl_hours: f64,
    pub max_entries: u64,
    pub total_entries: u64,
    pub valid_entries: u64,
    pub expired_entries: u64,
}

/// Outcome of clearing the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearedCache {
    pub success: bool,
    pub entries_cleared: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn metadata() -> ResultMetadata {
        let mut metadata = ResultMetadata::pending(2);
        metadata.set_records_returned(1);
        metadata.months_processed = 1;
        metadata.months_failed = vec![MonthKey::of(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())];
        metadata.total_records = 31;
        metadata.letter_group = Some("L".into());
        metadata.station_name = Some("Launceston Airport".into());
        metadata.match_type = Some(MatchType::Substring);
        metadata.match_score = Some(582);
        metadata
    }

    #[test]
    fn success_serializes_records_as_data() {
        let month = MonthKey::of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let mut record = DailyRecord::new("2025-01-01", month);
        record.insert("rainfall_mm", "0.2");
        let result = WeatherResult::success(
            "Launceston, Tasmania",
            "IDCJDW7025",
            vec![record],
            metadata(),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["station_id"], "IDCJDW7025");
        assert_eq!(json["data"][0]["date"], "2025-01-01");
        assert_eq!(json["data"][0]["month_key"], "202501");
        assert_eq!(json["data"][0]["rainfall_mm"], "0.2");
        assert_eq!(json["metadata"]["coverage"], "1/2");
        assert_eq!(json["metadata"]["match_type"], "substring");
        assert_eq!(json["metadata"]["months_failed"][0], "202502");
        assert_eq!(json["cached"], false);
        assert!(json.get("error").is_none());
        assert!(json.get("cache_timestamp").is_none());
    }

    #[test]
    fn failure_carries_kind_and_message() {
        let err = WeatherError::UnknownState {
            state: "Ontario".into(),
        };
        let result = WeatherResult::failure("Toronto, Ontario", &err);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown state: Ontario"));
        assert_eq!(result.failure, Some(FailureKind::UnknownState));
        assert!(result.station_id.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["failure"], "unknown_state");
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[test]
    fn failure_keeps_resolved_station() {
        let err = WeatherError::NoTargetRecords {
            station_id: "IDCJDW7025".into(),
            months_processed: 0,
            months_requested: 1,
            months_failed: Vec::new(),
            total_records: 0,
        };
        let result = WeatherResult::failure("Launceston, TAS", &err);
        assert_eq!(result.station_id.as_deref(), Some("IDCJDW7025"));
        assert_eq!(result.failure, Some(FailureKind::NoTargetRecordsExtracted));
    }

    #[test]
    fn pending_metadata_omits_unknown_phases() {
        let err = WeatherError::NoStationsFound { group: "L".into() };
        let mut metadata = ResultMetadata::pending(6);
        metadata.letter_group = Some("L".into());
        let result = WeatherResult::failure("Launceston, TAS", &err).with_metadata(metadata);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["requested_dates"], 6);
        assert_eq!(json["metadata"]["records_returned"], 0);
        assert_eq!(json["metadata"]["coverage"], "0/6");
        assert_eq!(json["metadata"]["letter_group"], "L");
        assert_eq!(json["metadata"]["data_source"], DATA_SOURCE);
        assert!(json["metadata"].get("station_name").is_none());
        assert!(json["metadata"].get("match_type").is_none());
        assert!(json["metadata"]["extraction_timestamp"].is_string());
    }

    #[test]
    fn into_cached_sets_timestamp() {
        let stored_at = Utc::now();
        let result = WeatherResult::success("Launceston, TAS", "IDCJDW7025", vec![], metadata())
            .into_cached(stored_at);
        assert!(result.cached);
        assert_eq!(result.cache_timestamp, Some(stored_at));
    }
}
