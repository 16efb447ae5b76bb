//! Parcel Browser - municipal property-tax dataset filtering.
//!
//! The library side of the browser: CSV dataset ingestion, data-driven
//! grouping-rules configuration, and the three hierarchical checkbox
//! filters (property class, year built, zoning) built on `filter-core`.
//!
//! ## Call chain
//!
//! ```text
//! parcels.csv -> dataset::load_parcels -> Vec<ParcelRecord>
//! config/filters/*.yaml -> grouping::RulesLoader -> GroupingConfig
//! (records, config) -> filters::FilterSet -> snapshots / filtered rows
//! ```
//!
//! The web layer (`parcel-web`) owns the HTTP surface; everything here
//! is synchronous and I/O-free apart from the two loaders.

// Core error handling
pub mod error;

// Dataset ingestion
pub mod dataset;

// Grouping-rules configuration
pub mod grouping;

// Filter instances and orchestration
pub mod filters;

pub use error::DatasetError;
pub use filters::{FilterInstance, FilterSet, FiltersChanged};
pub use grouping::{GroupingConfig, RulesLoader};
