//! Station link extraction from a letter-group page.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::StationId;
use crate::endpoints::absolute_url;
use crate::navigation::anchor_text;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector should be valid"));

/// A station link found on a letter-group page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCandidate {
    /// Link text, whitespace-collapsed, e.g. "Launceston Airport".
    pub display_name: String,
    /// The href as written in the page.
    pub href: String,
    /// Absolute URL of the station's latest-observations page.
    pub url: String,
}

impl StationCandidate {
    /// The station identifier embedded in the link, if any.
    pub fn station_id(&self) -> Option<StationId> {
        StationId::from_href(&self.url).or_else(|| StationId::from_href(&self.href))
    }
}

fn is_station_href(href: &str) -> bool {
    href.contains("latest.shtml") && href.contains("IDCJDW")
}

/// Extract every station link from a letter-group page, in page order.
///
/// A station link points at a `latest.shtml` page of an `IDCJDW`
/// identifier. Links with no visible text are skipped.
pub fn parse_station_links(html: &str, page_url: &str) -> Vec<StationCandidate> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if !is_station_href(href) {
                return None;
            }
            let display_name = anchor_text(anchor);
            if display_name.is_empty() {
                return None;
            }
            let url = absolute_url(page_url, href)?;
            Some(StationCandidate {
                display_name,
                href: href.to_string(),
                url,
            })
        })
        .collect()
}
