//! Incremental frequency aggregation and the command-driven mode machine.
//!
//! # Responsibility
//! - Own the global and per-category word count tables (single writer).
//! - Interpret `/cloud` and `/chart` control commands.
//! - Hand out copy-on-read snapshots to layout and chart code.
//!
//! # Invariants
//! - For every word, the per-category counts sum to the global count.
//! - Snapshots are detached copies; later writes never show through.

pub mod frequency;
pub mod mode;

use crate::model::frame::{CategoryId, VisualizationMode};
use frequency::{CategorySnapshot, FrequencySnapshot};
use serde::Serialize;

/// Point-in-time copy of everything a frame computation reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub global: FrequencySnapshot,
    pub categories: CategorySnapshot,
    pub mode: VisualizationMode,
    pub epoch: CategoryId,
    pub processed_messages: u64,
}

impl AggregateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    /// Categories holding at least one word, in ascending id order.
    pub fn populated_categories(&self) -> Vec<CategoryId> {
        self.categories
            .iter()
            .filter(|(_, counts)| !counts.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }
}
