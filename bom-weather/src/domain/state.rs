//! Australian states and territories.

use std::fmt;

use serde::Serialize;

/// A state or territory and the identifier of its daily-observations
/// index page on the agency website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AustralianState {
    /// Postal abbreviation, e.g. "TAS".
    pub code: &'static str,
    /// Full name, e.g. "Tasmania".
    pub name: &'static str,
    /// Identifier of the state's daily weather observations index page.
    #[serde(rename = "region_identifier")]
    pub index_code: &'static str,
}

/// Every state and territory the agency publishes daily observations for.
pub const STATES: [AustralianState; 8] = [
    AustralianState {
        code: "QLD",
        name: "Queensland",
        index_code: "IDCJDW0400",
    },
    AustralianState {
        code: "NSW",
        name: "New South Wales",
        index_code: "IDCJDW0200",
    },
    AustralianState {
        code: "VIC",
        name: "Victoria",
        index_code: "IDCJDW0300",
    },
    AustralianState {
        code: "WA",
        name: "Western Australia",
        index_code: "IDCJDW0600",
    },
    AustralianState {
        code: "SA",
        name: "South Australia",
        index_code: "IDCJDW0500",
    },
    AustralianState {
        code: "TAS",
        name: "Tasmania",
        index_code: "IDCJDW0700",
    },
    AustralianState {
        code: "NT",
        name: "Northern Territory",
        index_code: "IDCJDW0800",
    },
    AustralianState {
        code: "ACT",
        name: "Australian Capital Territory",
        index_code: "IDCJDW0100",
    },
];

impl AustralianState {
    /// Look up a state from free text.
    ///
    /// Tries, in order: postal code, exact name, then substring containment
    /// in either direction against the names. Matching is case-insensitive
    /// and ignores surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use bom_weather::domain::AustralianState;
    ///
    /// assert_eq!(AustralianState::lookup("tas").unwrap().name, "Tasmania");
    /// assert_eq!(AustralianState::lookup(" Tasmania ").unwrap().code, "TAS");
    /// assert_eq!(AustralianState::lookup("new south").unwrap().code, "NSW");
    /// assert!(AustralianState::lookup("Ontario").is_none());
    /// ```
    pub fn lookup(input: &str) -> Option<&'static AustralianState> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        if let Some(state) = STATES
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(&normalized))
        {
            return Some(state);
        }

        if let Some(state) = STATES
            .iter()
            .find(|s| s.name.to_lowercase() == normalized)
        {
            return Some(state);
        }

        STATES.iter().find(|s| {
            let name = s.name.to_lowercase();
            name.contains(&normalized) || normalized.contains(&name)
        })
    }

    /// All states, in table order.
    pub fn all() -> &'static [AustralianState] {
        &STATES
    }
}

impl fmt::Display for AustralianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
