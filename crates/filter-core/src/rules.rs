//! Static grouping-rules tables.
//!
//! A rules table is authored once per filter type (YAML in the app's
//! config directory) and never derived from the dataset. It names the
//! groups, their display labels, and which leaf values belong to each.
//! Hierarchy construction intersects the table with the values actually
//! observed in the records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::ALL_ID;

/// Rule-table validation error. Raised at load time, never during
/// toggling.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// The same id appears twice in one table.
    #[error("duplicate node id in grouping rules: {0}")]
    DuplicateId(String),

    /// A rule used the reserved select-all sentinel as its id.
    #[error("reserved id \"all\" used as a rule id")]
    ReservedId,

    /// A rule mixes member lists, ranges, or subgroups.
    #[error("rule {0} must use at most one of members/range/groups")]
    ConflictingMembers(String),

    /// A numeric range with min above max.
    #[error("rule {id}: empty range {min}..={max}")]
    EmptyRange { id: String, min: i32, max: i32 },
}

/// Ordering of root nodes in the built hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootOrder {
    /// Most-populated roots first (class and zoning dropdowns).
    #[default]
    CountDesc,
    /// Authored order (decade buckets, newest first).
    RuleOrder,
}

/// Inclusive numeric range, for bucket rules over integer-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// One authored group (or standalone leaf) in a rules table.
///
/// Exactly one of `members`, `range`, or `groups` may be populated:
///
/// - `members`: explicit leaf values (class subclasses, districts).
/// - `range`: leaves are the observed integer values inside the range,
///   generated newest-first (decade buckets).
/// - `groups`: nested subgroups (zoning category -> subcategory).
///
/// A rule with none of the three is a standalone leaf pinned to the
/// root (primary classes without subclasses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Node id. For value-bearing groups (a class code that is both a
    /// group and a dataset value) this is the dataset value itself.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Explicit leaf members, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// Numeric bucket bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<YearRange>,

    /// Nested subgroups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupRule>,
}

impl GroupRule {
    /// Leaf rule with no members of its own.
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            members: Vec::new(),
            range: None,
            groups: Vec::new(),
        }
    }

    /// Group rule with an explicit member list.
    pub fn with_members(
        id: impl Into<String>,
        label: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        Self {
            members,
            ..Self::leaf(id, label)
        }
    }

    /// Bucket rule over an inclusive integer range.
    pub fn with_range(id: impl Into<String>, label: impl Into<String>, min: i32, max: i32) -> Self {
        Self {
            range: Some(YearRange { min, max }),
            ..Self::leaf(id, label)
        }
    }

    /// Group rule with nested subgroups.
    pub fn with_groups(
        id: impl Into<String>,
        label: impl Into<String>,
        groups: Vec<GroupRule>,
    ) -> Self {
        Self {
            groups,
            ..Self::leaf(id, label)
        }
    }
}

/// One filter type's complete grouping table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingRules {
    /// Root ordering policy.
    #[serde(default)]
    pub root_order: RootOrder,

    /// Label prefix for observed values no rule covers
    /// ("Class" -> "Class 4810"). Without it the value is its own label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_prefix: Option<String>,

    /// Authored groups and standalone leaves.
    #[serde(default)]
    pub groups: Vec<GroupRule>,

    /// Display labels for leaf values referenced by `members` lists and
    /// for uncovered values worth naming.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl GroupingRules {
    /// Check tree-shape invariants: unique ids, no reserved id, one
    /// member kind per rule, non-empty ranges.
    pub fn validate(&self) -> Result<(), RuleError> {
        let mut seen = BTreeSet::new();
        for rule in &self.groups {
            Self::validate_rule(rule, &mut seen)?;
        }
        Ok(())
    }

    fn validate_rule(rule: &GroupRule, seen: &mut BTreeSet<String>) -> Result<(), RuleError> {
        if rule.id == ALL_ID {
            return Err(RuleError::ReservedId);
        }
        if !seen.insert(rule.id.clone()) {
            return Err(RuleError::DuplicateId(rule.id.clone()));
        }

        let kinds = [
            !rule.members.is_empty(),
            rule.range.is_some(),
            !rule.groups.is_empty(),
        ];
        if kinds.iter().filter(|k| **k).count() > 1 {
            return Err(RuleError::ConflictingMembers(rule.id.clone()));
        }

        if let Some(range) = rule.range {
            if range.min > range.max {
                return Err(RuleError::EmptyRange {
                    id: rule.id.clone(),
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for member in &rule.members {
            if member == ALL_ID {
                return Err(RuleError::ReservedId);
            }
            if !seen.insert(member.clone()) {
                return Err(RuleError::DuplicateId(member.clone()));
            }
        }

        for sub in &rule.groups {
            Self::validate_rule(sub, seen)?;
        }
        Ok(())
    }

    /// Display label for a leaf value: the labels table, then the
    /// fallback prefix, then the value itself.
    pub fn leaf_label(&self, value: &str) -> String {
        if let Some(label) = self.labels.get(value) {
            return label.clone();
        }
        match &self.fallback_prefix {
            Some(prefix) => format!("{prefix} {value}"),
            None => value.to_string(),
        }
    }
}
