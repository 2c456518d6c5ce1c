//! Station identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern of a station's "latest observations" page URL.
static STATION_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(IDCJDW\d+)\.latest\.shtml").expect("station href pattern should be valid")
});

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station identifier: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// The agency's identifier for one observation station, e.g. `IDCJDW7025`.
///
/// Always the literal prefix `IDCJDW` followed by one or more ASCII digits.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a bare identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use bom_weather::domain::StationId;
    ///
    /// assert!(StationId::parse("IDCJDW7025").is_ok());
    /// assert!(StationId::parse("IDCJDW").is_err());
    /// assert!(StationId::parse("idcjdw7025").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let digits = s.strip_prefix("IDCJDW").ok_or(InvalidStationId {
            reason: "must start with IDCJDW",
        })?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must end with ASCII digits",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Extract the identifier embedded in a station page link, such as
    /// `/climate/dwo/IDCJDW7025.latest.shtml`.
    pub fn from_href(href: &str) -> Option<Self> {
        let captures = STATION_HREF.captures(href)?;
        Self::parse(captures.get(1)?.as_str()).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(StationId::parse("IDCJDW7025").unwrap().as_str(), "IDCJDW7025");
        assert!(StationId::parse("IDCJDW0").is_ok());
    }

    #[test]
    fn reject_invalid() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse("IDCJDW").is_err());
        assert!(StationId::parse("IDCJDW70a5").is_err());
        assert!(StationId::parse("XDCJDW7025").is_err());
        assert!(StationId::parse(" IDCJDW7025").is_err());
    }

    #[test]
    fn from_absolute_and_relative_hrefs() {
        assert_eq!(
            StationId::from_href("https://www.bom.gov.au/climate/dwo/IDCJDW7025.latest.shtml")
                .unwrap()
                .as_str(),
            "IDCJDW7025"
        );
        assert_eq!(
            StationId::from_href("/climate/dwo/IDCJDW2801.latest.shtml")
                .unwrap()
                .as_str(),
            "IDCJDW2801"
        );
    }

    #[test]
    fn from_href_without_pattern() {
        assert!(StationId::from_href("IDCJDW7025.latest.shtml").is_none());
        assert!(StationId::from_href("/climate/dwo/IDCJDW7025.shtml").is_none());
        assert!(StationId::from_href("/climate/dwo/latest.shtml").is_none());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("IDCJDW7025").unwrap();
        assert_eq!(id.to_string(), "IDCJDW7025");
        assert_eq!(format!("{:?}", id), "StationId(IDCJDW7025)");
    }
}
