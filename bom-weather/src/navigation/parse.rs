//! Letter-group link extraction from a state index page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::endpoints::absolute_url;

/// Visible text of a letter-group link: "L", "A - E", "F-K".
static GROUP_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z](\s*-\s*[A-Z])?$").expect("letter group pattern should be valid")
});

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector should be valid"));

/// An alphabetic partition of a state's stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGroup {
    /// Label as printed on the page, e.g. "A - E".
    pub label: String,
    /// Absolute URL of the group's station list.
    pub url: String,
}

impl LetterGroup {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Whether this group covers names starting with `letter`.
    ///
    /// Single-letter labels match by equality; range labels ("X - Y" or
    /// "X-Y") match when `X <= letter <= Y`.
    pub fn covers(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        let label = self.label.trim();

        if let Some((start, end)) = label.split_once('-') {
            return match (single_char(start), single_char(end)) {
                (Some(start), Some(end)) => start <= letter && letter <= end,
                _ => false,
            };
        }

        single_char(label) == Some(letter)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Collapse runs of whitespace (including newlines inside anchors).
pub(crate) fn anchor_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract every letter-group link from an index page, in page order.
///
/// Anchors whose text is not a letter or letter range are ignored, as are
/// hrefs that cannot be resolved against `page_url`. When a label appears
/// more than once the first link wins.
pub fn parse_letter_groups(html: &str, page_url: &str) -> Vec<LetterGroup> {
    let document = Html::parse_document(html);
    let mut groups: Vec<LetterGroup> = Vec::new();

    for anchor in document.select(&ANCHOR) {
        let label = anchor_text(anchor);
        if !GROUP_LABEL.is_match(&label) {
            continue;
        }
        if groups.iter().any(|g| g.label == label) {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = absolute_url(page_url, href) else {
            continue;
        };
        groups.push(LetterGroup { label, url });
    }

    groups
}
