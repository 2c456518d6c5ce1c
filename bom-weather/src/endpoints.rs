//! URL templates of the agency's daily weather observations pages.

use reqwest::Url;

use crate::domain::{AustralianState, MonthKey, StationId};

/// Production base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.bom.gov.au";

/// Builds the agency URLs the pipeline visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyEndpoints {
    base_url: String,
}

impl AgencyEndpoints {
    /// Endpoints rooted at `base_url` (a trailing slash is ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The state's daily-observations index page, listing letter groups.
    pub fn index_page(&self, state: &AustralianState) -> String {
        format!("{}/climate/dwo/{}.shtml", self.base_url, state.index_code)
    }

    /// One station's observations for one month, as CSV.
    pub fn monthly_csv(&self, station: &StationId, month: MonthKey) -> String {
        format!(
            "{}/climate/dwo/{month}/text/{station}.{month}.csv",
            self.base_url
        )
    }
}

impl Default for AgencyEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Resolve an href scraped from `page_url` into an absolute URL.
///
/// Returns `None` for hrefs that cannot be joined (e.g. `javascript:` junk
/// with invalid characters) or when the page URL itself is unparseable.
pub fn absolute_url(page_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    base.join(href.trim()).ok().map(String::from)
}
