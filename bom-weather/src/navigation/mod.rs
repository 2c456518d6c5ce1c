//! Navigation resolver: state index page → letter group.
//!
//! The agency partitions each state's stations into alphabetic letter
//! groups. The boundaries differ between states and change over time, so
//! the groups are scraped from the index page and the location's first
//! letter is matched against whatever labels are present.

mod parse;

pub(crate) use parse::anchor_text;
pub use parse::{LetterGroup, parse_letter_groups};

use tracing::{info, warn};

use crate::domain::AustralianState;
use crate::endpoints::AgencyEndpoints;
use crate::error::{Phase, WeatherError};
use crate::http::{PageFetcher, RetryPolicy};

/// Outcome of choosing a letter group for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution {
    /// A group's label covers the location's first letter.
    Resolved(LetterGroup),
    /// No label matched; the first group on the page was used instead.
    FallbackUsed {
        group: LetterGroup,
        letter: Option<char>,
    },
}

impl GroupResolution {
    pub fn group(&self) -> &LetterGroup {
        match self {
            GroupResolution::Resolved(group) => group,
            GroupResolution::FallbackUsed { group, .. } => group,
        }
    }

    pub fn into_group(self) -> LetterGroup {
        match self {
            GroupResolution::Resolved(group) => group,
            GroupResolution::FallbackUsed { group, .. } => group,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GroupResolution::FallbackUsed { .. })
    }
}

/// Choose the group for `location` among `groups`.
///
/// Returns `None` only when `groups` is empty.
pub fn choose_group(location: &str, groups: &[LetterGroup]) -> Option<GroupResolution> {
    let first = groups.first()?;
    let letter = location
        .trim()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase());

    if let Some(letter) = letter
        && let Some(group) = groups.iter().find(|g| g.covers(letter))
    {
        return Some(GroupResolution::Resolved(group.clone()));
    }

    Some(GroupResolution::FallbackUsed {
        group: first.clone(),
        letter,
    })
}

/// Resolves a state and location to a letter-group page.
pub struct Navigator<'a, F> {
    fetcher: &'a F,
    endpoints: &'a AgencyEndpoints,
    policy: RetryPolicy,
    strict: bool,
}

impl<'a, F: PageFetcher> Navigator<'a, F> {
    /// Create a navigator.
    ///
    /// With `strict` set, a location no group covers is a
    /// `NoMatchingGroup` failure instead of a first-group fallback.
    pub fn new(
        fetcher: &'a F,
        endpoints: &'a AgencyEndpoints,
        policy: RetryPolicy,
        strict: bool,
    ) -> Self {
        Self {
            fetcher,
            endpoints,
            policy,
            strict,
        }
    }

    /// Fetch the state's index page and pick the letter group for
    /// `location`.
    pub async fn resolve_letter_group(
        &self,
        state: &AustralianState,
        location: &str,
    ) -> Result<GroupResolution, WeatherError> {
        let url = self.endpoints.index_page(state);
        info!(state = state.name, url = %url, "fetching daily observations index");

        let html = self
            .fetcher
            .fetch(&url, &self.policy)
            .await
            .map_err(|e| WeatherError::fetch(Phase::IndexPage, e))?;

        let groups = parse_letter_groups(&html, &url);
        if groups.is_empty() {
            return Err(WeatherError::NoLetterGroupsFound { url });
        }
        info!(
            count = groups.len(),
            labels = ?groups.iter().map(|g| g.label.as_str()).collect::<Vec<_>>(),
            "found letter groups"
        );

        let resolution =
            choose_group(location, &groups).ok_or(WeatherError::NoLetterGroupsFound {
                url: url.clone(),
            })?;

        match &resolution {
            GroupResolution::Resolved(group) => {
                info!(location, group = %group.label, "letter group resolved");
            }
            GroupResolution::FallbackUsed { group, letter } => {
                if self.strict {
                    return Err(WeatherError::NoMatchingGroup {
                        location: location.to_string(),
                        available: groups.into_iter().map(|g| g.label).collect(),
                    });
                }
                warn!(
                    location,
                    letter = ?letter,
                    group = %group.label,
                    "no letter group covers location, using first available group"
                );
            }
        }

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::fixtures::{self, StubAgency};

    fn groups(labels: &[&str]) -> Vec<LetterGroup> {
        labels
            .iter()
            .map(|l| LetterGroup::new(*l, format!("https://example.test/{l}")))
            .collect()
    }

    #[test]
    fn choose_matching_range() {
        let gs = groups(&["A - E", "F - K", "L", "M - R", "S - Z"]);
        let res = choose_group("Launceston", &gs).unwrap();
        assert_eq!(res, GroupResolution::Resolved(gs[2].clone()));

        let res = choose_group("hobart", &gs).unwrap();
        assert_eq!(res.group().label, "F - K");
        assert!(!res.is_fallback());
    }

    #[test]
    fn choose_falls_back_to_first_group() {
        let gs = groups(&["A - E", "F - K"]);
        let res = choose_group("Zeehan", &gs).unwrap();
        assert!(res.is_fallback());
        assert_eq!(res.group().label, "A - E");
        assert_eq!(
            res,
            GroupResolution::FallbackUsed {
                group: gs[0].clone(),
                letter: Some('Z')
            }
        );
    }

    #[test]
    fn choose_with_no_groups() {
        assert!(choose_group("Launceston", &[]).is_none());
    }

    #[test]
    fn choose_for_non_letter_location() {
        let gs = groups(&["A - E"]);
        let res = choose_group("1770", &gs).unwrap();
        assert!(res.is_fallback());
    }

    #[tokio::test]
    async fn every_state_resolves_a_group() {
        let endpoints = AgencyEndpoints::new(fixtures::BASE_URL);
        let mut agency = StubAgency::new();
        for state in AustralianState::all() {
            agency.page(endpoints.index_page(state), fixtures::INDEX_PAGE_RANGES);
        }
        let nav = Navigator::new(&agency, &endpoints, RetryPolicy::none(), false);

        for state in AustralianState::all() {
            let res = nav.resolve_letter_group(state, "Launceston").await.unwrap();
            assert!(!res.group().url.is_empty(), "{}", state.name);
        }
    }

    #[tokio::test]
    async fn adapts_to_irregular_group_boundaries() {
        let endpoints = AgencyEndpoints::new(fixtures::BASE_URL);
        let tas = AustralianState::lookup("TAS").unwrap();
        let mut agency = StubAgency::new();
        agency.page(endpoints.index_page(tas), fixtures::INDEX_PAGE_IRREGULAR);
        let nav = Navigator::new(&agency, &endpoints, RetryPolicy::none(), false);

        let res = nav.resolve_letter_group(tas, "Devonport").await.unwrap();
        let expected = LetterGroup::new(
            "D-G",
            format!("{}/climate/dwo/IDCJDW0700.D.shtml", fixtures::BASE_URL),
        );
        assert_eq!(res, GroupResolution::Resolved(expected));
    }

    #[tokio::test]
    async fn no_groups_on_page() {
        let endpoints = AgencyEndpoints::new(fixtures::BASE_URL);
        let tas = AustralianState::lookup("TAS").unwrap();
        let mut agency = StubAgency::new();
        agency.page(endpoints.index_page(tas), "<html><body>maintenance</body></html>");
        let nav = Navigator::new(&agency, &endpoints, RetryPolicy::none(), false);

        let err = nav.resolve_letter_group(tas, "Hobart").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoLetterGroupsFound);
    }

    #[tokio::test]
    async fn strict_mode_rejects_fallback() {
        let endpoints = AgencyEndpoints::new(fixtures::BASE_URL);
        let tas = AustralianState::lookup("TAS").unwrap();
        let mut agency = StubAgency::new();
        agency.page(endpoints.index_page(tas), fixtures::INDEX_PAGE_SINGLE_L);

        let lenient = Navigator::new(&agency, &endpoints, RetryPolicy::none(), false);
        let res = lenient.resolve_letter_group(tas, "Hobart").await.unwrap();
        assert!(res.is_fallback());

        let strict = Navigator::new(&agency, &endpoints, RetryPolicy::none(), true);
        let err = strict.resolve_letter_group(tas, "Hobart").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoMatchingGroup);
    }

    #[tokio::test]
    async fn blocked_index_page_surfaces_as_fetch_failure() {
        let endpoints = AgencyEndpoints::new(fixtures::BASE_URL);
        let tas = AustralianState::lookup("TAS").unwrap();
        let mut agency = StubAgency::new();
        agency.status(endpoints.index_page(tas), 403);
        let nav = Navigator::new(&agency, &endpoints, RetryPolicy::none(), false);

        let err = nav.resolve_letter_group(tas, "Hobart").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Blocked);
    }
}
