//! Message id deduplication.
//!
//! # Responsibility
//! - Suppress re-processing of redelivered messages.
//! - Bound id memory when the host configures a recent-id window.
//!
//! # Invariants
//! - `Unbounded` never forgets an id within the session.
//! - `Recent { capacity }` remembers at most `capacity` ids, evicting the
//!   least recently seen first.
//! - `check_and_mark` has no side effects when the id is already known,
//!   other than refreshing its recency.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Memory policy for processed message ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep every id until the process restarts.
    #[default]
    Unbounded,
    /// Keep only the most recently seen `capacity` ids.
    Recent { capacity: usize },
}

/// Tracks processed message ids.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    policy: DedupPolicy,
    seen: HashSet<String>,
    recency: VecDeque<String>,
}

impl Deduplicator {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            seen: HashSet::new(),
            recency: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Returns whether `id` was already processed.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Marks `id` as processed.
    ///
    /// Returns `true` when the id is new, `false` for a duplicate.
    pub fn check_and_mark(&mut self, id: &str) -> bool {
        match self.policy {
            DedupPolicy::Unbounded => self.seen.insert(id.to_string()),
            DedupPolicy::Recent { capacity } => {
                if self.seen.contains(id) {
                    self.touch(id);
                    return false;
                }
                self.seen.insert(id.to_string());
                self.recency.push_back(id.to_string());
                while self.recency.len() > capacity.max(1) {
                    if let Some(evicted) = self.recency.pop_front() {
                        self.seen.remove(&evicted);
                    }
                }
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn touch(&mut self, id: &str) {
        if let Some(position) = self.recency.iter().position(|value| value == id) {
            if let Some(value) = self.recency.remove(position) {
                self.recency.push_back(value);
            }
        }
    }
}
