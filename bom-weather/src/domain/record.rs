//! Daily observation records.

use std::collections::BTreeMap;

use serde::Serialize;

use super::MonthKey;

/// Field name of the record's ISO date.
pub const DATE_FIELD: &str = "date";

/// Field name of the month the record was downloaded from.
pub const MONTH_KEY_FIELD: &str = "month_key";

/// One day's observations: normalized column name to raw cell text.
///
/// Always contains [`DATE_FIELD`] (`YYYY-MM-DD`) and [`MONTH_KEY_FIELD`].
/// The remaining columns vary by station and over time, so they are kept as
/// strings rather than a fixed struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailyRecord {
    fields: BTreeMap<String, String>,
}

impl DailyRecord {
    /// Start a record for `date` (already ISO formatted) from `month`.
    pub fn new(date: impl Into<String>, month: MonthKey) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(DATE_FIELD.to_string(), date.into());
        fields.insert(MONTH_KEY_FIELD.to_string(), month.to_string());
        Self { fields }
    }

    /// Set an observation column. The date and month key cannot be replaced.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        if column == DATE_FIELD || column == MONTH_KEY_FIELD {
            return;
        }
        self.fields.insert(column, value.into());
    }

    pub fn date(&self) -> &str {
        self.fields.get(DATE_FIELD).map(String::as_str).unwrap_or_default()
    }

    pub fn month_key(&self) -> &str {
        self.fields
            .get(MONTH_KEY_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Look up a column by its normalized name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// All columns, including date and month key.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}
