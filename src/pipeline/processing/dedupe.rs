//! Duplicate removal over validated leads.
//!
//! Leads are grouped twice, once by `_id` and once by `email`. In every group
//! with more than one member the last occurrence in input order survives; the
//! entry date is only reported, never compared. A lead is dropped when any
//! grouping marks it as a non-survivor, so the output holds no two leads that
//! share either key.

use std::collections::{BTreeSet, HashMap};

use crate::app::ports::{ChangeEvent, EventSink};
use crate::constants::{EMAIL_FIELD, ID_FIELD};
use crate::domain::Lead;

/// A key leads are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupeKey {
    Id,
    Email,
}

impl DedupeKey {
    pub const ALL: [DedupeKey; 2] = [DedupeKey::Id, DedupeKey::Email];

    pub fn field_name(&self) -> &'static str {
        match self {
            DedupeKey::Id => ID_FIELD,
            DedupeKey::Email => EMAIL_FIELD,
        }
    }

    /// The grouping value, or `None` when the lead has no usable key
    fn value_of<'l>(&self, lead: &'l Lead) -> Option<&'l str> {
        let value = match self {
            DedupeKey::Id => lead.id.as_str(),
            DedupeKey::Email => lead.email.as_str(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Leads sharing one key value, identified by input position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: DedupeKey,
    pub value: String,
    /// Ascending input positions
    pub members: Vec<usize>,
    /// Highest position in `members`
    pub survivor: usize,
}

impl DuplicateGroup {
    pub fn removed(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied().filter(move |i| *i != self.survivor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DedupeReport {
    /// Surviving leads in ascending input order
    pub kept: Vec<Lead>,
    /// Input positions of `kept`
    pub kept_indices: Vec<usize>,
    /// Every group with more than one member, `_id` groups first
    pub groups: Vec<DuplicateGroup>,
    pub original_count: usize,
    pub removed: usize,
}

pub struct Deduplicator<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> Deduplicator<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    pub fn run(&self, leads: &[Lead]) -> DedupeReport {
        self.sink.record_info("Starting deduplication process");
        let original_count = leads.len();
        self.sink
            .record_info(&format!("Processing {} records", original_count));

        let mut groups = Vec::new();
        for key in DedupeKey::ALL {
            groups.extend(find_duplicate_groups(leads, key));
        }

        let mut dropped = BTreeSet::new();
        for group in &groups {
            self.log_group(group, &leads[group.survivor]);
            dropped.extend(group.removed());
        }

        let kept_indices: Vec<usize> = (0..original_count)
            .filter(|i| !dropped.contains(i))
            .collect();
        let kept: Vec<Lead> = kept_indices.iter().map(|&i| leads[i].clone()).collect();
        let removed = original_count - kept.len();

        self.sink.record_info(&format!(
            "Deduplication completed: {} -> {} records",
            original_count,
            kept.len()
        ));
        self.sink
            .record_info(&format!("Removed {} duplicate records", removed));

        DedupeReport {
            kept,
            kept_indices,
            groups,
            original_count,
            removed,
        }
    }

    fn log_group(&self, group: &DuplicateGroup, survivor: &Lead) {
        let field = group.key.field_name();
        self.sink.record_info(&format!(
            "Found {} records with duplicate {}: {}",
            group.members.len(),
            field,
            group.value
        ));
        self.sink.record_change(
            &ChangeEvent::new(format!("Kept record with duplicate {}", field))
                .from_value(format!("index {}", group.members[0]))
                .to_value(format!("index {}", group.survivor))
                .context(format!(
                    "kept last occurrence: {}",
                    survivor.entry_date_string()
                )),
        );
    }
}

/// Groups with more than one member for `key`, in order of first appearance
pub fn find_duplicate_groups(leads: &[Lead], key: DedupeKey) -> Vec<DuplicateGroup> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<(&str, Vec<usize>)> = Vec::new();

    for (index, lead) in leads.iter().enumerate() {
        let Some(value) = key.value_of(lead) else {
            continue;
        };
        match positions.get(value) {
            Some(&slot) => buckets[slot].1.push(index),
            None => {
                positions.insert(value, buckets.len());
                buckets.push((value, vec![index]));
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(value, members)| {
            let survivor = *members.last().unwrap_or(&0);
            DuplicateGroup {
                key,
                value: value.to_string(),
                members,
                survivor,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::in_memory_event_sink::InMemoryEventSink;
    use chrono::DateTime;

    fn lead(id: &str, email: &str, entry_date: &str) -> Lead {
        Lead {
            id: id.to_string(),
            email: email.to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            address: "1 Main St".to_string(),
            entry_date: DateTime::parse_from_rfc3339(entry_date).unwrap(),
        }
    }

    fn ids(report: &DedupeReport) -> Vec<&str> {
        report.kept.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_same_id_keeps_last_occurrence() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "a@x.com", "2014-05-07T17:32:20+00:00"),
            lead("1", "b@x.com", "2015-01-01T00:00:00+00:00"),
        ];

        let report = Deduplicator::new(&sink).run(&leads);

        assert_eq!(report.kept, vec![leads[1].clone()]);
        assert_eq!(report.kept_indices, vec![1]);
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn test_survivor_is_positional_not_newest() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "a@x.com", "2020-01-01T00:00:00+00:00"),
            lead("1", "b@x.com", "2010-01-01T00:00:00+00:00"),
        ];

        let report = Deduplicator::new(&sink).run(&leads);

        assert_eq!(report.kept_indices, vec![1]);
        assert!(sink.contains(
            "Kept record with duplicate _id from 'index 0' to 'index 1' (kept last occurrence: 2010-01-01T00:00:00+00:00)"
        ));
    }

    #[test]
    fn test_duplicate_email_with_unique_ids() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "same@x.com", "2014-05-07T17:32:20+00:00"),
            lead("2", "other@x.com", "2014-05-07T17:32:20+00:00"),
            lead("3", "same@x.com", "2014-05-07T17:32:20+00:00"),
        ];

        let report = Deduplicator::new(&sink).run(&leads);

        assert_eq!(ids(&report), vec!["2", "3"]);
        assert!(sink.contains("Found 2 records with duplicate email: same@x.com"));
    }

    #[test]
    fn test_overlapping_groups() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "a@x.com", "2014-05-07T17:32:20+00:00"),
            lead("1", "b@x.com", "2014-05-07T17:32:20+00:00"),
            lead("2", "b@x.com", "2014-05-07T17:32:20+00:00"),
        ];

        let report = Deduplicator::new(&sink).run(&leads);

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].key, DedupeKey::Id);
        assert_eq!(report.groups[0].survivor, 1);
        assert_eq!(report.groups[1].key, DedupeKey::Email);
        assert_eq!(report.groups[1].survivor, 2);
        assert_eq!(report.kept_indices, vec![2]);
        assert_eq!(report.kept.len(), report.original_count - report.removed);
    }

    #[test]
    fn test_groups_contribute_one_survivor_each() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "a@x.com", "2014-05-07T17:32:20+00:00"),
            lead("2", "b@x.com", "2014-05-07T17:32:20+00:00"),
            lead("1", "c@x.com", "2014-05-07T17:32:20+00:00"),
            lead("3", "b@x.com", "2014-05-07T17:32:20+00:00"),
            lead("1", "d@x.com", "2014-05-07T17:32:20+00:00"),
        ];

        let report = Deduplicator::new(&sink).run(&leads);

        for group in &report.groups {
            assert_eq!(Some(&group.survivor), group.members.iter().max());
            let kept_members = group
                .members
                .iter()
                .filter(|i| report.kept_indices.contains(i))
                .count();
            assert!(kept_members <= 1);
        }
        assert_eq!(report.kept_indices, vec![3, 4]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let sink = InMemoryEventSink::new();
        let leads = vec![
            lead("1", "a@x.com", "2014-05-07T17:32:20+00:00"),
            lead("1", "b@x.com", "2014-05-07T17:32:20+00:00"),
            lead("2", "b@x.com", "2014-05-07T17:32:20+00:00"),
            lead("4", "d@x.com", "2014-05-07T17:32:20+00:00"),
            lead("5", "a@x.com", "2014-05-07T17:32:20+00:00"),
        ];

        let first = Deduplicator::new(&sink).run(&leads);
        let second = Deduplicator::new(&sink).run(&first.kept);

        assert_eq!(second.kept, first.kept);
        assert_eq!(second.removed, 0);
        assert!(second.groups.is_empty());
    }

    #[test]
    fn test_empty_keys_are_not_grouped() {
        let leads = vec![
            lead("", "a@x.com", "2014-05-07T17:32:20+00:00"),
            lead("", "b@x.com", "2014-05-07T17:32:20+00:00"),
        ];
        assert!(find_duplicate_groups(&leads, DedupeKey::Id).is_empty());

        let sink = InMemoryEventSink::new();
        let report = Deduplicator::new(&sink).run(&leads);
        assert_eq!(report.kept_indices, vec![0, 1]);
    }

    #[test]
    fn test_empty_and_single_inputs_are_no_ops() {
        let sink = InMemoryEventSink::new();
        let empty = Deduplicator::new(&sink).run(&[]);
        assert!(empty.kept.is_empty());
        assert_eq!(empty.removed, 0);

        let single = vec![lead("1", "a@x.com", "2014-05-07T17:32:20+00:00")];
        let report = Deduplicator::new(&sink).run(&single);
        assert_eq!(report.kept, single);
        assert!(sink.contains("Deduplication completed: 1 -> 1 records"));
        assert!(sink.contains("Removed 0 duplicate records"));
    }
}
