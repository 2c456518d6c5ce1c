//! Caching service facade.
//!
//! The single entry point for callers: validates a request, serves it
//! from the result cache when possible, and otherwise drives the three
//! phases (letter group, station, monthly records) against the agency.

use chrono::Utc;
use tracing::{info, warn};

use crate::cache::WeatherCache;
use crate::config::ServiceConfig;
use crate::domain::{AustralianState, DailyRecord, WeatherQuery, WeatherRequest};
use crate::endpoints::AgencyEndpoints;
use crate::error::WeatherError;
use crate::http::{AgencyClient, FetchError, PageFetcher, SessionInfo};
use crate::navigation::Navigator;
use crate::records::RecordExtractor;
use crate::result::{CacheStats, ClearedCache, ResultMetadata, WeatherResult};
use crate::stations::StationMatcher;

/// Weather data service over a page source `F`.
pub struct WeatherService<F = AgencyClient> {
    fetcher: F,
    endpoints: AgencyEndpoints,
    cache: WeatherCache,
    config: ServiceConfig,
}

impl WeatherService<AgencyClient> {
    /// Create a service talking to the live agency website.
    pub fn new(config: ServiceConfig) -> Result<Self, FetchError> {
        let client = AgencyClient::new(config.client.clone())?;
        Ok(Self::with_fetcher(client, config))
    }

    /// Request count and User-Agent of the underlying client.
    pub fn session_info(&self) -> SessionInfo {
        self.fetcher.session_info()
    }
}

impl<F: PageFetcher> WeatherService<F> {
    /// Create a service over any page source.
    pub fn with_fetcher(fetcher: F, config: ServiceConfig) -> Self {
        Self {
            fetcher,
            endpoints: AgencyEndpoints::new(config.base_url.clone()),
            cache: WeatherCache::new(&config.cache),
            config,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Daily observations for a location and date range.
    ///
    /// Never fails: problems are reported in the returned result, with
    /// the metadata gathered up to the failing phase. Invalid requests and
    /// unknown states are rejected before any request is made.
    pub async fn get_weather_data(&self, request: &WeatherRequest) -> WeatherResult {
        let location = request.display_location();

        let query = match WeatherQuery::from_request(request) {
            Ok(query) => query,
            Err(err) => {
                warn!(location = %location, error = %err, "rejected weather request");
                return WeatherResult::failure(location, &err);
            }
        };

        let key = query.cache_key();
        let mut result = self
            .cache
            .get_or_resolve(&key, async {
                let mut metadata = ResultMetadata::pending(query.dates().len());
                match self.resolve(&query, &mut metadata).await {
                    Ok((station_id, records)) => {
                        WeatherResult::success(location.clone(), station_id, records, metadata)
                    }
                    Err(err) => {
                        warn!(location = %location, error = %err, "weather query failed");
                        WeatherResult::failure(location.clone(), &err).with_metadata(metadata)
                    }
                }
            })
            .await;

        result.location = location;
        result
    }

    /// Run the three phases for a validated query, recording progress in
    /// `metadata` as each one completes.
    async fn resolve(
        &self,
        query: &WeatherQuery,
        metadata: &mut ResultMetadata,
    ) -> Result<(String, Vec<DailyRecord>), WeatherError> {
        info!(
            location = query.location(),
            state = query.state().name,
            dates = query.dates().len(),
            "resolving weather query"
        );

        let navigator = Navigator::new(
            &self.fetcher,
            &self.endpoints,
            self.config.navigation_retry.clone(),
            self.config.strict_letter_groups,
        );
        let resolution = navigator
            .resolve_letter_group(query.state(), query.location())
            .await?;
        metadata.letter_group_fallback = resolution.is_fallback();
        let group = resolution.into_group();
        metadata.letter_group = Some(group.label.clone());

        let matcher = StationMatcher::new(&self.fetcher, self.config.navigation_retry.clone());
        let station = matcher.find_station(&group, query.location()).await?;
        metadata.station_name = Some(station.candidate.display_name);
        metadata.match_type = Some(station.match_type);
        metadata.match_score = Some(station.score);

        let extractor = RecordExtractor::new(
            &self.fetcher,
            &self.endpoints,
            self.config.csv_retry.clone(),
        );
        let outcome = extractor.extract(&station.station_id, query.dates()).await;
        metadata.extraction_timestamp = Utc::now();

        let extraction = match outcome {
            Ok(extraction) => extraction,
            Err(err) => {
                if let WeatherError::NoTargetRecords {
                    months_processed,
                    months_failed,
                    total_records,
                    ..
                } = &err
                {
                    metadata.months_processed = *months_processed;
                    metadata.months_failed = months_failed.clone();
                    metadata.total_records = *total_records;
                }
                return Err(err);
            }
        };

        metadata.set_records_returned(extraction.records.len());
        metadata.months_processed = extraction.months_processed;
        metadata.months_failed = extraction.months_failed;
        metadata.total_records = extraction.total_records;

        Ok((station.station_id.to_string(), extraction.records))
    }

    /// The states and territories that can be queried.
    pub fn list_available_states(&self) -> &'static [AustralianState] {
        AustralianState::all()
    }

    /// Drop every cached result.
    pub async fn clear_cache(&self) -> ClearedCache {
        let entries_cleared = self.cache.clear().await;
        info!(entries_cleared, "cleared weather cache");
        ClearedCache {
            success: true,
            entries_cleared,
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
