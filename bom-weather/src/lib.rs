//! Daily weather observations from the Bureau of Meteorology.
//!
//! Resolves a free-text town and state to an observation station by
//! walking the agency's published pages (state index, letter group,
//! station list), downloads the station's monthly CSV files and returns
//! the records for the requested dates. Results are cached per query.

pub mod cache;
pub mod config;
pub mod domain;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod navigation;
pub mod records;
pub mod result;
pub mod service;
pub mod stations;

#[cfg(test)]
mod fixtures;

pub use config::{ConfigError, ServiceConfig};
pub use domain::WeatherRequest;
pub use error::{FailureKind, WeatherError};
pub use result::WeatherResult;
pub use service::WeatherService;
