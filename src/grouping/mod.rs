//! Grouping-rules configuration.
//!
//! One authored rules table per filter type, loaded once from YAML.
//! The tables are the only place hierarchy shape is defined; no module
//! re-derives grouping from the dataset.

mod loader;

pub use loader::RulesLoader;

use filter_core::GroupingRules;
use parcel_types::FilterKind;

/// The three rule tables, one per filter instance.
#[derive(Debug, Clone, Default)]
pub struct GroupingConfig {
    /// Primary class -> subclass table (`class_hierarchy.yaml`).
    pub class: GroupingRules,
    /// Decade buckets, newest first (`decades.yaml`).
    pub year: GroupingRules,
    /// Category -> subcategory -> district tree (`zoning.yaml`).
    pub zone: GroupingRules,
}

impl GroupingConfig {
    pub fn rules_for(&self, kind: FilterKind) -> &GroupingRules {
        match kind {
            FilterKind::PropertyClass => &self.class,
            FilterKind::YearBuilt => &self.year,
            FilterKind::Zoning => &self.zone,
        }
    }
}
