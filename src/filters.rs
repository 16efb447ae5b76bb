//! Filter instances and orchestration.
//!
//! Three independent filters (property class, year built, zoning), each
//! owning one hierarchy and one selection state. `FilterSet` applies
//! toggles, intersects the expanded selections against records, and
//! emits a fire-and-forget change notification per mutation.

use crossbeam_channel::{Receiver, Sender};
use filter_core::{ExpandedLeaves, GroupingRules, Hierarchy, NodeRef, SelectionState};
use parcel_types::{FilterKind, FilterSnapshot, ParcelRecord, SnapshotNode};
use tracing::debug;

use crate::grouping::GroupingConfig;

/// Extract one filter's field value from a record. Missing/blank/
/// sentinel values yield `None` and are excluded from counts and
/// matching.
pub fn extract(kind: FilterKind, record: &ParcelRecord) -> Option<String> {
    match kind {
        FilterKind::PropertyClass => record.class_value(),
        FilterKind::YearBuilt => record.year_value().map(|year| year.to_string()),
        FilterKind::Zoning => record.zone_value(),
    }
}

/// One filter dropdown: hierarchy + selection + cached leaf expansion.
#[derive(Debug, Clone)]
pub struct FilterInstance {
    kind: FilterKind,
    hierarchy: Hierarchy,
    state: SelectionState,
    expanded: ExpandedLeaves,
}

impl FilterInstance {
    /// Build the hierarchy from the dataset and start AllSelected.
    pub fn build(kind: FilterKind, records: &[ParcelRecord], rules: &GroupingRules) -> Self {
        let hierarchy = Hierarchy::build(records, |r| extract(kind, r), rules);
        let state = SelectionState::new();
        let expanded = state.expand_to_leaves(&hierarchy);
        Self {
            kind,
            hierarchy,
            state,
            expanded,
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Current leaf-level selection (empty = match everything).
    pub fn expanded(&self) -> &ExpandedLeaves {
        &self.expanded
    }

    /// Apply one checkbox change. Returns whether the state moved.
    pub fn toggle(&mut self, node_id: &str, checked: bool) -> bool {
        let before = self.state.clone();
        self.state.toggle(&self.hierarchy, node_id, checked);
        if self.state == before {
            return false;
        }
        self.expanded = self.state.expand_to_leaves(&self.hierarchy);
        true
    }

    /// Reset to AllSelected.
    pub fn clear(&mut self) {
        self.state.clear();
        self.expanded = self.state.expand_to_leaves(&self.hierarchy);
    }

    pub fn matches(&self, record: &ParcelRecord) -> bool {
        self.expanded
            .matches_value(extract(self.kind, record).as_deref())
    }

    /// Dropdown button label: the all-default, a single selection's
    /// label, or the selection count.
    pub fn summary(&self) -> String {
        if self.state.is_all() {
            return match self.kind {
                FilterKind::PropertyClass => "All Classes",
                FilterKind::YearBuilt => "All Years",
                FilterKind::Zoning => "All Zones",
            }
            .to_string();
        }

        let count = self.state.selected_count();
        if count == 1 {
            let id = self.state.selected_ids().next().unwrap_or_default();
            // Class labels carry the code prefix; years and zones read
            // fine as bare ids.
            if self.kind == FilterKind::PropertyClass {
                if let Some(node) = self.hierarchy.node(id) {
                    return format!("{} - {}", id, node.label());
                }
            }
            return id.to_string();
        }
        format!("{count} selected")
    }

    /// Render state for the UI layer.
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            filter: self.kind,
            summary: self.summary(),
            all_selected: self.state.is_all(),
            total_count: self.hierarchy.total_count(),
            nodes: self
                .hierarchy
                .roots()
                .map(|root| self.snapshot_node(root))
                .collect(),
        }
    }

    fn snapshot_node(&self, node: NodeRef<'_>) -> SnapshotNode {
        SnapshotNode {
            id: node.id().to_string(),
            label: node.label().to_string(),
            count: node.record_count(),
            checked: self.state.contains(node.id()),
            children: node
                .children()
                .map(|child| self.snapshot_node(child))
                .collect(),
        }
    }
}

/// "Filters changed" notification. Fire-and-forget; consumers drain the
/// channel and re-render from the latest snapshot (most recent wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiltersChanged {
    /// The mutated filter, or `None` for clear-all.
    pub filter: Option<FilterKind>,
    pub generation: u64,
}

/// The three filter instances plus the change channel.
pub struct FilterSet {
    class: FilterInstance,
    year: FilterInstance,
    zone: FilterInstance,
    generation: u64,
    tx: Sender<FiltersChanged>,
    rx: Receiver<FiltersChanged>,
}

impl FilterSet {
    /// Build all three hierarchies from the dataset. Every selection
    /// starts AllSelected. Rebuilding the dataset means building a new
    /// set; selection state does not survive a rebuild.
    pub fn build(records: &[ParcelRecord], config: &GroupingConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            class: FilterInstance::build(FilterKind::PropertyClass, records, &config.class),
            year: FilterInstance::build(FilterKind::YearBuilt, records, &config.year),
            zone: FilterInstance::build(FilterKind::Zoning, records, &config.zone),
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn instance(&self, kind: FilterKind) -> &FilterInstance {
        match kind {
            FilterKind::PropertyClass => &self.class,
            FilterKind::YearBuilt => &self.year,
            FilterKind::Zoning => &self.zone,
        }
    }

    fn instance_mut(&mut self, kind: FilterKind) -> &mut FilterInstance {
        match kind {
            FilterKind::PropertyClass => &mut self.class,
            FilterKind::YearBuilt => &mut self.year,
            FilterKind::Zoning => &mut self.zone,
        }
    }

    /// Monotonic change counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Receiver side of the change channel. One consumer; messages
    /// queue until drained.
    pub fn changes(&self) -> Receiver<FiltersChanged> {
        self.rx.clone()
    }

    /// Apply one checkbox change. No-op toggles (unknown ids,
    /// unchecking "all") emit nothing.
    pub fn toggle(&mut self, kind: FilterKind, node_id: &str, checked: bool) -> bool {
        if !self.instance_mut(kind).toggle(node_id, checked) {
            return false;
        }
        self.generation += 1;
        self.notify(Some(kind));
        true
    }

    /// Reset all three filters to AllSelected.
    pub fn clear_all(&mut self) {
        self.class.clear();
        self.year.clear();
        self.zone.clear();
        self.generation += 1;
        self.notify(None);
    }

    fn notify(&self, filter: Option<FilterKind>) {
        let change = FiltersChanged {
            filter,
            generation: self.generation,
        };
        debug!(?change, "filters changed");
        let _ = self.tx.send(change);
    }

    /// True when the record passes all three filters.
    pub fn matches(&self, record: &ParcelRecord) -> bool {
        self.class.matches(record) && self.year.matches(record) && self.zone.matches(record)
    }

    /// Records passing all three filters, in dataset order.
    pub fn filter<'a>(&self, records: &'a [ParcelRecord]) -> Vec<&'a ParcelRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Active-filter summary line: "All Properties" when nothing is
    /// narrowed, otherwise the per-filter selection counts.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.class.state().is_all() {
            let n = self.class.state().selected_count();
            parts.push(format!("{n} property classes"));
        }
        if !self.zone.state().is_all() {
            let n = self.zone.state().selected_count();
            parts.push(format!("{n} zones"));
        }
        if !self.year.state().is_all() {
            let n = self.year.state().selected_count();
            parts.push(format!("{n} years"));
        }
        if parts.is_empty() {
            "All Properties".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Render state for all three dropdowns.
    pub fn snapshots(&self) -> Vec<FilterSnapshot> {
        FilterKind::ALL
            .iter()
            .map(|kind| self.instance(*kind).snapshot())
            .collect()
    }
}
