//! Filter a welcome-survey dataset and compute the aggregates behind its
//! dashboard: value distributions, indicator-group counts, correlations and
//! cross-tabulations.
//!
//! - [`data`]: dataset model, loader, filtering, export, repository
//! - [`analysis`]: aggregation, correlation, cross-tab, summary statistics
//! - [`dashboard`]: every section computed for one filter state
//! - [`state`]: front-end independent session state
//! - [`render`]: plain-text rendering of a report

pub mod analysis;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod render;
pub mod state;

pub use error::SurveyError;
