//! Data layer: core types, loading, filtering and export.
//!
//! Architecture:
//! ```text
//!   survey.csv  (`;`-separated)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, normalise missing cells → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ repository │  base snapshot, load() / reload()
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  exact-match criteria → filtered Dataset
//!   └──────────┘
//!        │
//!        ├──────────────► analysis (aggregate, correlate, cross-tab, summary)
//!        ▼
//!   ┌──────────┐
//!   │  export   │  filtered Dataset → `;`-separated text
//!   └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod groups;
pub mod loader;
pub mod model;
pub mod repository;

#[cfg(test)]
pub(crate) mod fixtures;
