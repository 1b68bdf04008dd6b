//! Aggregations over a (filtered) dataset.
//!
//! Every function here is pure: it reads an immutable [`Dataset`] snapshot
//! and returns a plain value. Empty input yields an empty result; only
//! unknown fields or groups are errors.
//!
//! [`Dataset`]: crate::data::model::Dataset

pub mod aggregate;
pub mod correlation;
pub mod crosstab;
pub mod summary;

pub use aggregate::{GroupCount, RankOrder, aggregate};
pub use correlation::{CorrelationMatrix, correlate};
pub use crosstab::{CrossTab, cross_tab};
pub use summary::{FieldSummary, GenderCount, ValueCount, gender_distribution, share_percentage, summarize};
