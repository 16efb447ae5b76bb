//! Hierarchy construction from records + grouping rules.
//!
//! The built tree contains only values observed in the dataset: leaves
//! with zero occurrences are omitted, and a group whose whole subtree is
//! empty is omitted with them. Construction is deterministic for
//! identical records and rules.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::rules::{GroupRule, GroupingRules, RootOrder};

/// Node storage. Indices are stable for the lifetime of one hierarchy
/// and never cross hierarchies.
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    label: String,
    record_count: u64,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// An immutable filter hierarchy with per-node occurrence counts.
///
/// The select-all sentinel is implicit: it is never stored as a node,
/// only understood by [`crate::SelectionState`].
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    entries: Vec<Entry>,
    roots: Vec<usize>,
    by_id: HashMap<String, usize>,
    total_count: u64,
}

/// Borrowed view of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    hierarchy: &'a Hierarchy,
    idx: usize,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        &self.hierarchy.entries[self.idx].id
    }

    pub fn label(&self) -> &'a str {
        &self.hierarchy.entries[self.idx].label
    }

    /// Occurrence count: own records for value-bearing nodes, subtree
    /// sum for pure group nodes. Display/ordering only.
    pub fn record_count(&self) -> u64 {
        self.hierarchy.entries[self.idx].record_count
    }

    pub fn is_leaf(&self) -> bool {
        self.hierarchy.entries[self.idx].children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.hierarchy.entries[self.idx].parent.map(|idx| NodeRef {
            hierarchy: self.hierarchy,
            idx,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let hierarchy = self.hierarchy;
        self.hierarchy.entries[self.idx]
            .children
            .iter()
            .map(move |&idx| NodeRef { hierarchy, idx })
    }
}

/// Intermediate tree used during construction, before arena indexing.
struct Pending {
    id: String,
    label: String,
    record_count: u64,
    children: Vec<Pending>,
}

impl Hierarchy {
    /// Scan `records`, extract the filter field per record, and build
    /// the tree per `rules`. Records yielding `None` are ignored.
    pub fn build<R, F>(records: &[R], extract: F, rules: &GroupingRules) -> Self
    where
        F: Fn(&R) -> Option<String>,
    {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for record in records {
            if let Some(value) = extract(record) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        Self::from_counts(&counts, rules)
    }

    /// Build from pre-counted leaf values.
    pub fn from_counts(counts: &BTreeMap<String, u64>, rules: &GroupingRules) -> Self {
        let mut covered = BTreeSet::new();
        let mut roots: Vec<Pending> = Vec::new();

        for rule in &rules.groups {
            if let Some(node) = build_rule(rule, counts, rules, &mut covered) {
                roots.push(node);
            }
        }

        // Observed values no rule covers become standalone leaves.
        let mut stray: Vec<Pending> = counts
            .iter()
            .filter(|(value, count)| **count > 0 && !covered.contains(*value))
            .map(|(value, count)| Pending {
                id: value.clone(),
                label: rules.leaf_label(value),
                record_count: *count,
                children: Vec::new(),
            })
            .collect();
        stray.sort_by(|a, b| b.record_count.cmp(&a.record_count).then(a.id.cmp(&b.id)));
        roots.append(&mut stray);
        if rules.root_order == RootOrder::CountDesc {
            roots.sort_by(|a, b| b.record_count.cmp(&a.record_count));
        }

        let total_count = counts.values().sum();
        let mut hierarchy = Hierarchy {
            total_count,
            ..Default::default()
        };
        for root in roots {
            hierarchy.intern(root, None);
        }
        hierarchy
    }

    fn intern(&mut self, node: Pending, parent: Option<usize>) -> usize {
        let idx = self.entries.len();
        self.entries.push(Entry {
            id: node.id.clone(),
            label: node.label,
            record_count: node.record_count,
            parent,
            children: Vec::new(),
        });
        self.by_id.insert(node.id, idx);
        if parent.is_none() {
            self.roots.push(idx);
        }
        for child in node.children {
            let child_idx = self.intern(child, Some(idx));
            self.entries[idx].children.push(child_idx);
        }
        idx
    }

    /// Total occurrences across every observed value. Drives the
    /// "All Years (N)" style label.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of nodes in the tree (groups and leaves).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.by_id.get(id).map(|&idx| NodeRef {
            hierarchy: self,
            idx,
        })
    }

    /// Root nodes in display order.
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&idx| NodeRef {
            hierarchy: self,
            idx,
        })
    }

    pub(crate) fn idx_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &str {
        &self.entries[idx].id
    }

    pub(crate) fn parent_of(&self, idx: usize) -> Option<usize> {
        self.entries[idx].parent
    }

    pub(crate) fn children_of(&self, idx: usize) -> &[usize] {
        &self.entries[idx].children
    }

    /// Indices of `idx`'s whole subtree, excluding `idx` itself.
    pub(crate) fn descendants_of(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.entries[idx].children.to_vec();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend_from_slice(&self.entries[next].children);
        }
        out
    }
}

/// Build one rule's subtree. Returns `None` when nothing in the subtree
/// occurs in the dataset.
fn build_rule(
    rule: &GroupRule,
    counts: &BTreeMap<String, u64>,
    rules: &GroupingRules,
    covered: &mut BTreeSet<String>,
) -> Option<Pending> {
    covered.insert(rule.id.clone());
    let own = counts.get(&rule.id).copied().unwrap_or(0);

    let children: Vec<Pending> = if let Some(range) = rule.range {
        // Bucket leaves are the observed in-range values, newest first.
        let mut years: Vec<(i32, &str, u64)> = counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .filter_map(|(value, count)| {
                let year: i32 = value.parse().ok()?;
                range.contains(year).then_some((year, value.as_str(), *count))
            })
            .collect();
        years.sort_by(|a, b| b.0.cmp(&a.0));
        years
            .into_iter()
            .map(|(_, value, count)| {
                covered.insert(value.to_string());
                Pending {
                    id: value.to_string(),
                    label: value.to_string(),
                    record_count: count,
                    children: Vec::new(),
                }
            })
            .collect()
    } else if !rule.members.is_empty() {
        rule.members
            .iter()
            .filter_map(|member| {
                covered.insert(member.clone());
                let count = counts.get(member).copied().unwrap_or(0);
                (count > 0).then(|| Pending {
                    id: member.clone(),
                    label: rules.leaf_label(member),
                    record_count: count,
                    children: Vec::new(),
                })
            })
            .collect()
    } else {
        rule.groups
            .iter()
            .filter_map(|sub| build_rule(sub, counts, rules, covered))
            .collect()
    };

    let subtree: u64 = own + children.iter().map(|c| c.record_count).sum::<u64>();
    if subtree == 0 {
        return None;
    }

    // Value-bearing nodes show their own occurrences; pure groups show
    // the subtree sum.
    let record_count = if own > 0 {
        own
    } else {
        children.iter().map(|c| c.record_count).sum()
    };

    Some(Pending {
        id: rule.id.clone(),
        label: rule.label.clone(),
        record_count,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GroupRule;
    use std::collections::BTreeMap;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(v, c)| (v.to_string(), *c)).collect()
    }

    fn class_rules() -> GroupingRules {
        GroupingRules {
            root_order: RootOrder::CountDesc,
            fallback_prefix: Some("Class".into()),
            groups: vec![
                GroupRule::with_members(
                    "1010",
                    "Residential Single Family",
                    vec!["1012".into(), "101A".into()],
                ),
                GroupRule::leaf("1040", "Multi-Family 2-4 Units"),
            ],
            labels: BTreeMap::from([
                ("1012".to_string(), "Residential Multi-Unit".to_string()),
                ("101A".to_string(), "Residential Accessory".to_string()),
            ]),
        }
    }

    #[test]
    fn builds_parent_with_present_subclasses() {
        let h = Hierarchy::from_counts(
            &counts(&[("1010", 3), ("1012", 2), ("101A", 1)]),
            &class_rules(),
        );

        let root = h.node("1010").unwrap();
        // Own occurrences, not the subtree sum.
        assert_eq!(root.record_count(), 3);
        let children: Vec<_> = root.children().map(|c| c.id().to_string()).collect();
        assert_eq!(children, vec!["1012", "101A"]);
        assert_eq!(h.node("1012").unwrap().record_count(), 2);
        assert_eq!(h.total_count(), 6);
    }

    #[test]
    fn zero_count_leaves_omitted() {
        let h = Hierarchy::from_counts(&counts(&[("1010", 3), ("1012", 2)]), &class_rules());
        assert!(h.contains("1012"));
        assert!(!h.contains("101A"));
        assert!(!h.contains("1040"));
    }

    #[test]
    fn empty_subtree_group_omitted() {
        let h = Hierarchy::from_counts(&counts(&[("1040", 5)]), &class_rules());
        assert!(!h.contains("1010"));
        assert!(h.contains("1040"));
        assert_eq!(h.roots().count(), 1);
    }

    #[test]
    fn roots_sorted_by_count_desc() {
        let h = Hierarchy::from_counts(&counts(&[("1010", 1), ("1040", 7)]), &class_rules());
        let roots: Vec<_> = h.roots().map(|r| r.id().to_string()).collect();
        assert_eq!(roots, vec!["1040", "1010"]);
    }

    #[test]
    fn uncovered_values_become_fallback_leaves() {
        let h = Hierarchy::from_counts(&counts(&[("4810", 2), ("1040", 1)]), &class_rules());
        let stray = h.node("4810").unwrap();
        assert!(stray.is_leaf());
        assert_eq!(stray.label(), "Class 4810");
        // Count-desc ordering interleaves strays with authored roots.
        let roots: Vec<_> = h.roots().map(|r| r.id().to_string()).collect();
        assert_eq!(roots, vec!["4810", "1040"]);
    }

    #[test]
    fn decade_buckets_generate_years_newest_first() {
        let rules = GroupingRules {
            root_order: RootOrder::RuleOrder,
            fallback_prefix: None,
            groups: vec![
                GroupRule::with_range("1960s", "1960s", 1960, 1969),
                GroupRule::with_range("1950s", "1950s", 1950, 1959),
            ],
            labels: BTreeMap::new(),
        };
        let h = Hierarchy::from_counts(&counts(&[("1952", 4), ("1957", 1), ("1961", 2)]), &rules);

        // Authored order, not count order.
        let roots: Vec<_> = h.roots().map(|r| r.id().to_string()).collect();
        assert_eq!(roots, vec!["1960s", "1950s"]);

        let fifties = h.node("1950s").unwrap();
        // Pure group: subtree sum.
        assert_eq!(fifties.record_count(), 5);
        let years: Vec<_> = fifties.children().map(|c| c.id().to_string()).collect();
        assert_eq!(years, vec!["1957", "1952"]);
    }

    #[test]
    fn nested_groups_build_three_levels() {
        let rules = GroupingRules {
            root_order: RootOrder::CountDesc,
            fallback_prefix: None,
            groups: vec![GroupRule::with_groups(
                "residential",
                "Residential",
                vec![GroupRule::with_members(
                    "res-urban",
                    "Urban Residential",
                    vec!["R1".into(), "R2".into()],
                )],
            )],
            labels: BTreeMap::from([("R1".to_string(), "Residential R1".to_string())]),
        };
        let h = Hierarchy::from_counts(&counts(&[("R1", 10), ("R2", 3)]), &rules);

        let category = h.node("residential").unwrap();
        assert_eq!(category.record_count(), 13);
        let sub = h.node("res-urban").unwrap();
        assert_eq!(sub.parent().unwrap().id(), "residential");
        assert_eq!(h.node("R1").unwrap().label(), "Residential R1");
        assert_eq!(h.node("R1").unwrap().parent().unwrap().id(), "res-urban");
    }

    #[test]
    fn build_counts_extracted_fields() {
        let records = vec![Some("1010"), Some("1010"), None, Some("1012")];
        let h = Hierarchy::build(
            &records,
            |r| r.map(|v| v.to_string()),
            &class_rules(),
        );
        assert_eq!(h.node("1010").unwrap().record_count(), 2);
        assert_eq!(h.node("1012").unwrap().record_count(), 1);
        assert_eq!(h.total_count(), 3);
    }
}
