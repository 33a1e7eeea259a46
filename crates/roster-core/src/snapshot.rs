//! Grouped snapshots
//!
//! A [`GroupedSnapshot`] is the immutable output of one grouping pass. It is
//! replaced wholesale on every category or source change and never patched.

use crate::generation::Generation;
use crate::key_path::{resolve_key, GroupKey, KeyPath};
use crate::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordering applied to group keys once grouping finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Lexicographic for name-like paths, first-seen otherwise
    #[default]
    Auto,
    /// Keep keys in the order they were first encountered
    FirstSeen,
    /// Sort keys lexicographically
    Lexicographic,
}

impl SortPolicy {
    /// Whether keys should be sorted for `path`
    #[inline]
    #[must_use]
    pub fn sorts(self, path: &KeyPath) -> bool {
        match self {
            Self::Auto => path.is_name_like(),
            Self::FirstSeen => false,
            Self::Lexicographic => true,
        }
    }
}

/// Immutable mapping of group key to records, in key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedSnapshot {
    generation: Generation,
    groups: IndexMap<GroupKey, Vec<Record>>,
}

impl GroupedSnapshot {
    /// Empty snapshot for `generation`
    #[inline]
    #[must_use]
    pub fn empty(generation: Generation) -> Self {
        Self {
            generation,
            groups: IndexMap::new(),
        }
    }

    /// Generation this snapshot was produced for
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Records of one group
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Group keys in snapshot order
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Groups in snapshot order
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[Record])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of groups
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of records across all groups
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// No groups at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Incremental builder fed one chunk at a time
///
/// Keeps first-seen key order and source order within each key.
#[derive(Debug)]
pub struct GroupAccumulator {
    path: KeyPath,
    groups: IndexMap<GroupKey, Vec<Record>>,
    seen: usize,
}

impl GroupAccumulator {
    /// Start accumulating under `path`
    #[inline]
    #[must_use]
    pub fn new(path: KeyPath) -> Self {
        Self {
            path,
            groups: IndexMap::new(),
            seen: 0,
        }
    }

    /// Append one chunk of records
    pub fn push_chunk(&mut self, chunk: &[Record]) {
        for record in chunk {
            let key = resolve_key(record, &self.path);
            self.groups.entry(key).or_default().push(record.clone());
        }
        self.seen += chunk.len();
    }

    /// Records consumed so far
    #[inline]
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Apply the sort policy and seal the snapshot
    #[must_use]
    pub fn finish(mut self, generation: Generation, sort: SortPolicy) -> GroupedSnapshot {
        if sort.sorts(&self.path) {
            self.groups.sort_keys();
        }
        GroupedSnapshot {
            generation,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn people(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .map(|n| Record::new(json!({"firstname": n})))
            .collect()
    }

    #[test]
    fn accumulates_across_chunks_in_first_seen_order() {
        let records: Vec<Record> = ["FR", "NZ", "FR", "DE", "NZ"]
            .iter()
            .map(|nat| Record::new(json!({"nat": nat})))
            .collect();

        let mut acc = GroupAccumulator::new(KeyPath::parse("nat").unwrap());
        acc.push_chunk(&records[..2]);
        acc.push_chunk(&records[2..]);
        assert_eq!(acc.seen(), 5);

        let snapshot = acc.finish(Generation(1), SortPolicy::Auto);
        let keys: Vec<&str> = snapshot.keys().map(GroupKey::as_str).collect();
        assert_eq!(keys, vec!["FR", "NZ", "DE"]);
        assert_eq!(snapshot.get("NZ").unwrap().len(), 2);
        assert_eq!(snapshot.record_count(), 5);
        assert_eq!(snapshot.generation(), Generation(1));
    }

    #[test]
    fn name_like_auto_sorts_keys() {
        let mut acc = GroupAccumulator::new(KeyPath::parse("firstname").unwrap());
        acc.push_chunk(&people(&["zoe", "Bob", "anna"]));

        let snapshot = acc.finish(Generation(2), SortPolicy::Auto);
        let keys: Vec<&str> = snapshot.keys().map(GroupKey::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "Z"]);
    }

    #[test]
    fn first_seen_overrides_auto_sort() {
        let mut acc = GroupAccumulator::new(KeyPath::parse("firstname").unwrap());
        acc.push_chunk(&people(&["zoe", "Bob"]));

        let snapshot = acc.finish(Generation(3), SortPolicy::FirstSeen);
        let keys: Vec<&str> = snapshot.keys().map(GroupKey::as_str).collect();
        assert_eq!(keys, vec!["Z", "B"]);
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = GroupedSnapshot::empty(Generation(4));
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.record_count(), 0);
        assert!(snapshot.get("A").is_none());
    }
}
