//! Selection reconciliation over a filter hierarchy.
//!
//! Exactly two macro-states exist: `{"all"}` (no specific filtering)
//! and a partial set of node ids never containing "all". All mutation
//! goes through [`SelectionState::toggle`]; the state is authoritative
//! and the UI renders from it, never the other way around.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::hierarchy::Hierarchy;
use crate::ALL_ID;

/// Macro-state of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroState {
    /// The `{"all"}` singleton: no specific leaf filtering.
    AllSelected,
    /// One or more specific ids, never "all".
    PartialSelection,
}

/// The set of checked node ids for one filter instance.
///
/// Invariant: either exactly `{"all"}`, or any number of non-"all" ids.
/// Freshly created and cleared states are `{"all"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    /// New state in the AllSelected macro-state.
    pub fn new() -> Self {
        let mut selected = BTreeSet::new();
        selected.insert(ALL_ID.to_string());
        Self { selected }
    }

    pub fn macro_state(&self) -> MacroState {
        if self.is_all() {
            MacroState::AllSelected
        } else {
            MacroState::PartialSelection
        }
    }

    pub fn is_all(&self) -> bool {
        self.selected.contains(ALL_ID)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected ids ("all" counts as zero specific ids).
    pub fn selected_count(&self) -> usize {
        if self.is_all() {
            0
        } else {
            self.selected.len()
        }
    }

    /// Selected ids in sorted order. Empty when AllSelected.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        let all = self.is_all();
        self.selected
            .iter()
            .filter(move |_| !all)
            .map(String::as_str)
    }

    /// Reset to `{"all"}` (the filter-clear action).
    pub fn clear(&mut self) {
        self.selected.clear();
        self.selected.insert(ALL_ID.to_string());
    }

    /// Apply one checkbox change and reconcile the set.
    ///
    /// - Checking "all" collapses the set to `{"all"}`; unchecking it
    ///   directly is a no-op (it only clears as a side effect of
    ///   selecting something else).
    /// - Checking a node selects its whole subtree. Unchecking removes
    ///   the subtree, then walks the ancestor chain root-ward and drops
    ///   every ancestor none of whose children remain selected. The
    ///   walk runs after the subtree mutation settles, so a partially
    ///   checked subtree never collapses an ancestor mid-walk.
    /// - An empty result resets to `{"all"}`.
    /// - Unknown ids are a no-op.
    pub fn toggle(&mut self, hierarchy: &Hierarchy, node_id: &str, checked: bool) {
        if node_id == ALL_ID {
            if checked {
                self.clear();
            }
            return;
        }

        let Some(idx) = hierarchy.idx_of(node_id) else {
            return;
        };

        self.selected.remove(ALL_ID);

        if checked {
            self.selected.insert(node_id.to_string());
            for desc in hierarchy.descendants_of(idx) {
                self.selected.insert(hierarchy.id_at(desc).to_string());
            }
        } else {
            self.selected.remove(node_id);
            for desc in hierarchy.descendants_of(idx) {
                self.selected.remove(hierarchy.id_at(desc));
            }

            // Root-ward ancestor collapse, applied after the subtree
            // mutation above.
            let mut ancestor = hierarchy.parent_of(idx);
            while let Some(parent_idx) = ancestor {
                let any_child_selected = hierarchy
                    .children_of(parent_idx)
                    .iter()
                    .any(|&child| self.selected.contains(hierarchy.id_at(child)));
                if !any_child_selected {
                    self.selected.remove(hierarchy.id_at(parent_idx));
                }
                ancestor = hierarchy.parent_of(parent_idx);
            }
        }

        if self.selected.is_empty() {
            self.clear();
        }
    }

    /// Flatten the selection to leaf ids.
    ///
    /// AllSelected yields the empty set (caller convention: match
    /// everything). Otherwise: every selected childless id, plus all
    /// descendant leaves of every selected group id. Group ids are not
    /// leaves and never appear in the result.
    pub fn expand_to_leaves(&self, hierarchy: &Hierarchy) -> ExpandedLeaves {
        let mut leaves = BTreeSet::new();
        if self.is_all() {
            return ExpandedLeaves { leaves };
        }

        for id in &self.selected {
            let Some(idx) = hierarchy.idx_of(id) else {
                continue;
            };
            if hierarchy.children_of(idx).is_empty() {
                leaves.insert(id.clone());
            } else {
                for desc in hierarchy.descendants_of(idx) {
                    if hierarchy.children_of(desc).is_empty() {
                        leaves.insert(hierarchy.id_at(desc).to_string());
                    }
                }
            }
        }
        ExpandedLeaves { leaves }
    }
}

/// The flattened leaf-level selection handed to the query layer.
///
/// Empty means "no filtering, match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedLeaves {
    leaves: BTreeSet<String>,
}

impl ExpandedLeaves {
    /// True when no leaf filtering applies.
    pub fn is_unfiltered(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.leaves.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.leaves.iter().map(String::as_str)
    }

    /// Membership test for one extracted field value. A record with no
    /// extractable value matches only when the set is unfiltered.
    pub fn matches_value(&self, value: Option<&str>) -> bool {
        if self.leaves.is_empty() {
            return true;
        }
        match value {
            Some(v) => self.leaves.contains(v),
            None => false,
        }
    }

    /// Membership test for a whole record via its field extractor.
    pub fn matches<R, F>(&self, record: &R, extract: F) -> bool
    where
        F: Fn(&R) -> Option<String>,
    {
        if self.leaves.is_empty() {
            return true;
        }
        match extract(record) {
            Some(v) => self.leaves.contains(&v),
            None => false,
        }
    }
}
