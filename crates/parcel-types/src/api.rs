//! Filter API request/response types.
//!
//! The renderer draws its checkboxes from [`FilterSnapshot`] and never
//! reads selection back out of the DOM; the snapshot is the authority.

use serde::{Deserialize, Serialize};

use crate::record::ParcelRecord;

/// The three filter instances. Each owns disjoint state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    PropertyClass,
    YearBuilt,
    Zoning,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [
        FilterKind::PropertyClass,
        FilterKind::YearBuilt,
        FilterKind::Zoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::PropertyClass => "property_class",
            FilterKind::YearBuilt => "year_built",
            FilterKind::Zoning => "zoning",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a rendered filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    pub label: String,
    /// Occurrence count for display ("1010 - Residential (3)").
    pub count: u64,
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Complete render state of one filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub filter: FilterKind,
    /// Dropdown button label ("All Classes", a node label, "3 selected").
    pub summary: String,
    /// True when the select-all sentinel is the only selection.
    pub all_selected: bool,
    /// Total records carrying this filter's field.
    pub total_count: u64,
    pub nodes: Vec<SnapshotNode>,
}

/// All three dropdowns plus a change counter for cheap re-render checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub filters: Vec<FilterSnapshot>,
    /// Increments on every accepted toggle or clear. Most recent wins.
    pub generation: u64,
}

/// One checkbox change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub filter: FilterKind,
    pub node_id: String,
    pub checked: bool,
}

/// Pagination for the parcel listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelsQuery {
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Filtered parcel listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelsResponse {
    /// Records in the dataset.
    pub total: usize,
    /// Records matching the active filters, before pagination.
    pub matched: usize,
    pub parcels: Vec<ParcelRecord>,
}

/// Dataset totals plus the active-filter summary line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_parcels: usize,
    pub matched_parcels: usize,
    /// "All Properties" or "2 property classes, 1 zone" style.
    pub filter_summary: String,
}
