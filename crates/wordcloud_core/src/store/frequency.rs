//! Word frequency tables.
//!
//! # Responsibility
//! - Count tokens globally and per category epoch.
//! - Preserve first-seen order so ties resolve deterministically.
//!
//! # Invariants
//! - Counts only grow within a session.
//! - Every increment lands in the global table and in exactly one category.

use crate::model::frame::CategoryId;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Insertion-ordered word -> count table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

/// Global word -> count table.
pub type FrequencySnapshot = WordCounts;

/// Category -> word -> count tables, ordered by category id.
pub type CategorySnapshot = BTreeMap<CategoryId, WordCounts>;

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `word` and returns its new count.
    pub fn increment(&mut self, word: &str) -> u64 {
        if let Some(&slot) = self.index.get(word) {
            self.entries[slot].1 += 1;
            return self.entries[slot].1;
        }
        self.index.insert(word.to_string(), self.entries.len());
        self.entries.push((word.to_string(), 1));
        1
    }

    pub fn get(&self, word: &str) -> u64 {
        self.index
            .get(word)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// First-seen position of `word`.
    pub fn ordinal(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// `(min, max)` count, or `None` when empty.
    pub fn count_range(&self) -> Option<(u64, u64)> {
        let mut counts = self.entries.iter().map(|(_, count)| *count);
        let first = counts.next()?;
        Some(counts.fold((first, first), |(min, max), count| {
            (min.min(count), max.max(count))
        }))
    }

    /// Entries by count descending; ties keep first-seen order.
    pub fn sorted_entries(&self) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|left, right| right.1.cmp(&left.1));
        sorted
    }
}

impl Serialize for WordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, count) in &self.entries {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Single-writer store for global and per-category counts.
#[derive(Debug, Clone, Default)]
pub struct FrequencyStore {
    global: WordCounts,
    categories: CategorySnapshot,
    processed_messages: u64,
}

impl FrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes that one message id finished processing, counted or not.
    pub fn mark_processed(&mut self) {
        self.processed_messages += 1;
    }

    /// Counts `tokens` into the global table and into `category`.
    ///
    /// Returns `true` when any count changed.
    pub fn record(&mut self, category: CategoryId, tokens: &[String]) -> bool {
        if tokens.is_empty() {
            return false;
        }
        let bucket = self.categories.entry(category).or_default();
        for token in tokens {
            self.global.increment(token);
            bucket.increment(token);
        }
        true
    }

    pub fn global(&self) -> &WordCounts {
        &self.global
    }

    pub fn category(&self, category: CategoryId) -> Option<&WordCounts> {
        self.categories.get(&category)
    }

    pub fn processed_messages(&self) -> u64 {
        self.processed_messages
    }

    /// Detached copy of the global table.
    pub fn frequency_snapshot(&self) -> FrequencySnapshot {
        self.global.clone()
    }

    /// Detached copy of every category table.
    pub fn category_snapshot(&self) -> CategorySnapshot {
        self.categories.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrequencyStore, WordCounts};
    use crate::model::frame::CategoryId;

    #[test]
    fn word_counts_keep_first_seen_order_for_ties() {
        let mut counts = WordCounts::new();
        for word in ["b", "a", "c", "a", "c"] {
            counts.increment(word);
        }
        assert_eq!(
            counts.sorted_entries(),
            vec![
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 1)
            ]
        );
        assert_eq!(counts.count_range(), Some((1, 2)));
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn record_ignores_empty_token_lists() {
        let mut store = FrequencyStore::new();
        assert!(!store.record(CategoryId(0), &[]));
        assert!(store.category(CategoryId(0)).is_none());
    }

    #[test]
    fn snapshots_are_detached_from_later_writes() {
        let mut store = FrequencyStore::new();
        store.record(CategoryId(0), &["cat".to_string()]);
        let snapshot = store.frequency_snapshot();
        store.record(CategoryId(0), &["cat".to_string()]);
        assert_eq!(snapshot.get("cat"), 1);
        assert_eq!(store.global().get("cat"), 2);
    }

    #[test]
    fn serializes_in_first_seen_order() {
        let mut counts = WordCounts::new();
        counts.increment("zeta");
        counts.increment("alpha");
        let json = serde_json::to_string(&counts).expect("serialize counts");
        assert_eq!(json, r#"{"zeta":1,"alpha":1}"#);
    }
}
