//! Domain types for daily weather observations.
//!
//! This module contains the core domain model types: the state table,
//! validated queries, month keys, station identifiers and daily records.
//! Types that can be invalid enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod month;
mod query;
mod record;
mod state;
mod station;

pub use month::MonthKey;
pub use query::{DATE_FORMAT, WeatherQuery, WeatherRequest};
pub use record::{DATE_FIELD, DailyRecord, MONTH_KEY_FIELD};
pub use state::{AustralianState, STATES};
pub use station::{InvalidStationId, StationId};
