//! Consolidation of entity records before they reach the engine.
//!
//! A merge rule folds several records into one whose display name carries the
//! merge marker (`"Gadgets*"`). [`EntityKey`] strips the marker, so the merged
//! row still joins against the other dataset when the same rule is applied to
//! both Volume and Amount.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::model::{EntityKey, EntityRecord, MERGE_MARKER, accumulate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// Display name of the merged entity, without the marker
    pub name: String,
    /// Names of the records to fold in, matched by normalized key
    pub members: Vec<String>,
}

impl MergeRule {
    pub fn new<S: Into<String>>(name: impl Into<String>, members: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn merged_name(&self) -> String {
        format!("{}{MERGE_MARKER}", self.name.trim())
    }
}

/// Apply `rules` to one dataset.
///
/// The merged record takes the position of its first matching member.
/// Records matched by no rule pass through unchanged. A record matched by
/// several rules goes to the first one. Rules matching nothing produce no row.
pub fn apply_merge_rules(records: &[EntityRecord], rules: &[MergeRule]) -> Vec<EntityRecord> {
    if rules.is_empty() {
        return records.to_vec();
    }

    let mut rule_of: FxHashMap<EntityKey, usize> = FxHashMap::default();
    for (i, rule) in rules.iter().enumerate() {
        for member in &rule.members {
            rule_of.entry(EntityKey::new(member)).or_insert(i);
        }
    }

    let mut output: Vec<EntityRecord> = Vec::with_capacity(records.len());
    let mut slot_of_rule: FxHashMap<usize, usize> = FxHashMap::default();
    let mut merged_members: FxHashSet<EntityKey> = FxHashSet::default();

    for record in records {
        let key = record.key();
        let Some(&rule_index) = rule_of.get(&key) else {
            output.push(record.clone());
            continue;
        };
        merged_members.insert(key);
        match slot_of_rule.get(&rule_index) {
            Some(&slot) => accumulate(&mut output[slot].values, &record.values),
            None => {
                let mut merged = EntityRecord::new(rules[rule_index].merged_name(), Vec::new());
                accumulate(&mut merged.values, &record.values);
                slot_of_rule.insert(rule_index, output.len());
                output.push(merged);
            }
        }
    }

    tracing::debug!(
        rules = rules.len(),
        merged = slot_of_rule.len(),
        members = merged_members.len(),
        "applied merge rules"
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, values: &[f64]) -> EntityRecord {
        EntityRecord::new(name, values.to_vec())
    }

    #[test]
    fn test_members_fold_into_first_position() {
        let records = vec![
            record("Widgets", &[1.0, 2.0]),
            record("Gadget A", &[10.0, 20.0]),
            record("Sprockets", &[5.0, 5.0]),
            record("gadget b ", &[1.0, 1.0]),
        ];
        let rules = vec![MergeRule::new("Gadgets", ["Gadget A", "Gadget B"])];

        let merged = apply_merge_rules(&records, &rules);

        let names: Vec<&str> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Widgets", "Gadgets*", "Sprockets"]);
        assert_eq!(merged[1].values, vec![11.0, 21.0]);
        assert_eq!(merged[1].key(), EntityKey::new("gadgets"));
    }

    #[test]
    fn test_no_rules_is_identity() {
        let records = vec![record("A", &[1.0]), record("B", &[2.0])];
        assert_eq!(apply_merge_rules(&records, &[]), records);
    }

    #[test]
    fn test_rule_without_matches_adds_nothing() {
        let records = vec![record("A", &[1.0])];
        let rules = vec![MergeRule::new("Ghost", ["missing"])];
        assert_eq!(apply_merge_rules(&records, &rules), records);
    }

    #[test]
    fn test_first_rule_wins_for_shared_member() {
        let records = vec![record("X", &[3.0])];
        let rules = vec![
            MergeRule::new("First", ["x"]),
            MergeRule::new("Second", ["x"]),
        ];
        let merged = apply_merge_rules(&records, &rules);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "First*");
    }
}
