//! Fuzzy scoring of station names against a requested location.

use std::fmt;

use serde::Serialize;

use super::parse::StationCandidate;

/// Score of a case-insensitive exact match.
pub const EXACT_SCORE: u32 = 1000;
/// Base of a substring match; shorter station names score higher.
pub const SUBSTRING_BASE: u32 = 600;
/// Every target word present, in order and adjacent.
pub const MULTI_WORD_ORDERED_SCORE: u32 = 400;
/// Every target word present, in any order.
pub const MULTI_WORD_SCORE: u32 = 300;
/// Single-word target partially overlapping the station name.
pub const PARTIAL_SCORE: u32 = 200;

/// How a station name matched the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Substring,
    MultiWord,
    Partial,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchType::Exact => "exact",
            MatchType::Substring => "substring",
            MatchType::MultiWord => "multi_word",
            MatchType::Partial => "partial",
        };
        f.write_str(s)
    }
}

/// Score `station_name` as a match for `target`.
///
/// Rules are tried in order and the first that applies wins:
///
/// 1. exact (case-insensitive, trimmed): [`EXACT_SCORE`]
/// 2. target is a substring of the name: `SUBSTRING_BASE - min(len, 100)`
///    where `len` is the name's length in characters
/// 3. multi-word target whose words all appear as words of the name:
///    [`MULTI_WORD_ORDERED_SCORE`] when adjacent and in order, else
///    [`MULTI_WORD_SCORE`]
/// 4. single-word target where either string contains the other:
///    [`PARTIAL_SCORE`]
///
/// Returns `None` when nothing applies.
pub fn score_name(target: &str, station_name: &str) -> Option<(u32, MatchType)> {
    let target = target.trim().to_lowercase();
    let name = station_name.trim().to_lowercase();
    if target.is_empty() || name.is_empty() {
        return None;
    }

    if target == name {
        return Some((EXACT_SCORE, MatchType::Exact));
    }

    if name.contains(&target) {
        let len = name.chars().count().min(100) as u32;
        return Some((SUBSTRING_BASE - len, MatchType::Substring));
    }

    let target_words: Vec<&str> = target.split_whitespace().collect();
    let name_words: Vec<&str> = name.split_whitespace().collect();

    if target_words.len() > 1 {
        if !target_words.iter().all(|w| name_words.contains(w)) {
            return None;
        }
        let ordered = name_words
            .windows(target_words.len())
            .any(|window| window == target_words.as_slice());
        let score = if ordered {
            MULTI_WORD_ORDERED_SCORE
        } else {
            MULTI_WORD_SCORE
        };
        return Some((score, MatchType::MultiWord));
    }

    if target.contains(&name) {
        return Some((PARTIAL_SCORE, MatchType::Partial));
    }

    None
}

/// A candidate together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a StationCandidate,
    pub score: u32,
    pub match_type: MatchType,
}

/// Pick the highest-scoring candidate for `target`.
///
/// Ties keep the earlier candidate, so page order breaks ties.
pub fn best_match<'a>(
    target: &str,
    candidates: &'a [StationCandidate],
) -> Option<ScoredCandidate<'a>> {
    let mut best: Option<ScoredCandidate<'a>> = None;

    for candidate in candidates {
        let Some((score, match_type)) = score_name(target, &candidate.display_name) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(ScoredCandidate {
                candidate,
                score,
                match_type,
            });
        }
    }

    best
}
