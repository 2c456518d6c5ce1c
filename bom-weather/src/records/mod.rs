//! Record extractor: station + dates → daily records.

mod parse;

pub use parse::{normalize_header, parse_monthly_csv};

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{DATE_FORMAT, DailyRecord, MonthKey, StationId};
use crate::endpoints::AgencyEndpoints;
use crate::error::WeatherError;
use crate::http::{PageFetcher, RetryPolicy};

/// Records for the requested dates plus download bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Records whose date was requested, in month then file order.
    pub records: Vec<DailyRecord>,
    /// Months whose CSV was downloaded.
    pub months_processed: usize,
    /// Months whose CSV could not be downloaded.
    pub months_failed: Vec<MonthKey>,
    /// Rows parsed across all downloaded months, before filtering.
    pub total_records: usize,
}

/// Downloads and filters a station's monthly CSVs.
pub struct RecordExtractor<'a, F> {
    fetcher: &'a F,
    endpoints: &'a AgencyEndpoints,
    policy: RetryPolicy,
}

impl<'a, F: PageFetcher> RecordExtractor<'a, F> {
    pub fn new(fetcher: &'a F, endpoints: &'a AgencyEndpoints, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            endpoints,
            policy,
        }
    }

    /// Download every month spanned by `dates` and keep the rows for
    /// those dates.
    ///
    /// A month that fails to download is logged and skipped. Fails with
    /// `NoTargetRecords` when no month could be downloaded or no row
    /// matched a requested date.
    pub async fn extract(
        &self,
        station: &StationId,
        dates: &BTreeSet<NaiveDate>,
    ) -> Result<Extraction, WeatherError> {
        let months: BTreeSet<MonthKey> = dates.iter().map(|d| MonthKey::of(*d)).collect();
        let wanted: BTreeSet<String> = dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();

        info!(
            station_id = %station,
            months = ?months.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "downloading monthly observations"
        );

        let mut all_records = Vec::new();
        let mut months_processed = 0;
        let mut months_failed = Vec::new();

        for month in &months {
            let url = self.endpoints.monthly_csv(station, *month);
            match self.fetcher.fetch(&url, &self.policy).await {
                Ok(text) => {
                    let parsed = parse_monthly_csv(&text, *month);
                    debug!(month = %month, rows = parsed.len(), "parsed monthly CSV");
                    all_records.extend(parsed);
                    months_processed += 1;
                }
                Err(e) => {
                    warn!(month = %month, url = %url, error = %e, "skipping month");
                    months_failed.push(*month);
                }
            }
        }

        let total_records = all_records.len();
        let records: Vec<DailyRecord> = all_records
            .into_iter()
            .filter(|r| wanted.contains(r.date()))
            .collect();

        if records.is_empty() || months_processed == 0 {
            return Err(WeatherError::NoTargetRecords {
                station_id: station.to_string(),
                months_processed,
                months_requested: months.len(),
                months_failed,
                total_records,
            });
        }

        info!(
            station_id = %station,
            records = records.len(),
            requested = dates.len(),
            "extracted target records"
        );

        Ok(Extraction {
            records,
            months_processed,
            months_failed,
            total_records,
        })
    }
}
