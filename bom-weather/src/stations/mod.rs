//! Station matcher: letter-group page → station identifier.
//!
//! Lists the station links of a letter group, scores each link's text
//! against the requested location and extracts the identifier of the best
//! one.

mod matcher;
mod parse;

pub use matcher::{
    EXACT_SCORE, MULTI_WORD_ORDERED_SCORE, MULTI_WORD_SCORE, MatchType, PARTIAL_SCORE,
    SUBSTRING_BASE, ScoredCandidate, best_match, score_name,
};
pub use parse::{StationCandidate, parse_station_links};

use tracing::{debug, info};

use crate::domain::StationId;
use crate::error::{Phase, WeatherError};
use crate::http::{PageFetcher, RetryPolicy};
use crate::navigation::LetterGroup;

/// The station chosen for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationMatch {
    pub station_id: StationId,
    pub candidate: StationCandidate,
    pub score: u32,
    pub match_type: MatchType,
}

/// Finds the station for a location within one letter group.
pub struct StationMatcher<'a, F> {
    fetcher: &'a F,
    policy: RetryPolicy,
}

impl<'a, F: PageFetcher> StationMatcher<'a, F> {
    pub fn new(fetcher: &'a F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Fetch the group's page and return the best-scoring station.
    pub async fn find_station(
        &self,
        group: &LetterGroup,
        location: &str,
    ) -> Result<StationMatch, WeatherError> {
        info!(group = %group.label, url = %group.url, "fetching letter group page");

        let html = self
            .fetcher
            .fetch(&group.url, &self.policy)
            .await
            .map_err(|e| WeatherError::fetch(Phase::LetterGroupPage, e))?;

        let candidates = parse_station_links(&html, &group.url);
        if candidates.is_empty() {
            return Err(WeatherError::NoStationsFound {
                group: group.label.clone(),
            });
        }
        debug!(count = candidates.len(), "found station links");

        let no_match = || WeatherError::NoStationMatch {
            location: location.to_string(),
            group: group.label.clone(),
        };

        let best = best_match(location, &candidates).ok_or_else(no_match)?;
        let station_id = best
            .candidate
            .station_id()
            .ok_or_else(|| WeatherError::UnexpectedParse {
                message: format!(
                    "no station identifier in link '{}' for {}",
                    best.candidate.href, best.candidate.display_name
                ),
            })?;

        info!(
            location,
            station = %best.candidate.display_name,
            station_id = %station_id,
            score = best.score,
            match_type = %best.match_type,
            "matched station"
        );

        Ok(StationMatch {
            station_id,
            candidate: best.candidate.clone(),
            score: best.score,
            match_type: best.match_type,
        })
    }
}
