//! Shared types for the parcel browser.
//!
//! This crate is the single source of truth for every type crossing the
//! HTTP boundary between the server and the rendering layer.
//!
//! ## Rules
//!
//! 1. All API types live here - no inline struct definitions in handlers
//! 2. Field names match the wire format (snake_case JSON, CSV headers)
//! 3. Numeric CSV columns deserialize leniently: a blank or garbage cell
//!    is `None`, never a failed row

pub mod api;
pub mod record;

pub use api::{
    FilterKind, FilterSnapshot, FiltersResponse, ParcelsQuery, ParcelsResponse, SnapshotNode,
    SummaryResponse, ToggleRequest,
};
pub use record::{ParcelRecord, YEAR_BUILT_MAX, YEAR_BUILT_MIN};
