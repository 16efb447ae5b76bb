//! Hierarchical selection-set engine.
//!
//! A checkbox filter over a dataset field is three pieces:
//!
//! - [`GroupingRules`]: a static, data-driven table describing how leaf
//!   values group into a two- or three-level tree (class -> subclasses,
//!   decade -> years, zoning category -> subcategory -> district).
//! - [`Hierarchy`]: the tree actually built from a record collection,
//!   carrying per-node occurrence counts. Values absent from the data
//!   are omitted.
//! - [`SelectionState`]: the set of checked node ids, reconciled under
//!   parent/child propagation and the "all" sentinel.
//!
//! The engine is pure: no I/O, no clocks, no shared state. Callers own
//! one `Hierarchy` + one `SelectionState` per filter instance and feed
//! `toggle` from their interaction handlers.

pub mod hierarchy;
pub mod rules;
pub mod selection;

pub use hierarchy::{Hierarchy, NodeRef};
pub use rules::{GroupRule, GroupingRules, RootOrder, RuleError, YearRange};
pub use selection::{ExpandedLeaves, MacroState, SelectionState};

/// Reserved id of the select-all sentinel. Mutually exclusive with every
/// other id in a [`SelectionState`].
pub const ALL_ID: &str = "all";
