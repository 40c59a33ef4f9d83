//! Frame computation and stale-result gating.
//!
//! # Responsibility
//! - Turn an aggregate snapshot plus viewport into one drawable frame.
//! - Hand out generation tokens and accept only results for the latest one.
//!
//! # Invariants
//! - `compute_frame` is pure: it reads only its arguments.
//! - Generations increase monotonically and are never reused.
//! - A skipped pass (geometry failure) leaves the previous frame in place.

use crate::chart::build_chart;
use crate::config::CloudConfig;
use crate::layout::{layout_cloud, LayoutError};
use crate::model::frame::{Frame, FrameContent, Generation, Viewport, VisualizationMode};
use crate::store::AggregateSnapshot;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Computes the frame for `snapshot` in its current mode.
///
/// An empty aggregate yields [`FrameContent::Placeholder`].
///
/// # Errors
/// - [`LayoutError`] when cloud geometry is degenerate for `viewport`.
pub fn compute_frame(
    snapshot: &AggregateSnapshot,
    viewport: Viewport,
    config: &CloudConfig,
    generation: Generation,
) -> Result<Frame, LayoutError> {
    let content = if snapshot.is_empty() {
        FrameContent::Placeholder
    } else {
        match snapshot.mode {
            VisualizationMode::Cloud => FrameContent::Cloud {
                labels: layout_cloud(snapshot, viewport, config)?.labels,
            },
            VisualizationMode::Chart => FrameContent::Chart {
                chart: build_chart(&snapshot.global, config.top_k),
            },
        }
    };
    Ok(Frame {
        generation,
        viewport,
        content,
    })
}

/// Shared monotonically increasing generation source.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new generation, superseding every earlier one.
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest() == generation
    }
}

/// Decision taken for one computed result.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Applied,
    /// A newer generation was requested meanwhile; result discarded.
    Stale { latest: Generation },
    /// The pass failed; previous frame kept.
    Skipped(LayoutError),
}

/// Holds the frame currently shown and filters stale results.
#[derive(Debug)]
pub struct FrameGate {
    counter: Arc<GenerationCounter>,
    current: Option<Frame>,
}

impl FrameGate {
    pub fn new(counter: Arc<GenerationCounter>) -> Self {
        Self {
            counter,
            current: None,
        }
    }

    pub fn counter(&self) -> &Arc<GenerationCounter> {
        &self.counter
    }

    /// Starts a new pass.
    pub fn request(&self) -> Generation {
        self.counter.next()
    }

    pub fn current(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Applies a result computed for `generation`.
    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<Frame, LayoutError>,
    ) -> GateDecision {
        let latest = self.counter.latest();
        if generation != latest {
            debug!(
                "event=frame_stale module=frame status=skip generation={} latest={}",
                generation.0, latest.0
            );
            return GateDecision::Stale { latest };
        }
        match result {
            Ok(frame) => {
                self.current = Some(frame);
                GateDecision::Applied
            }
            Err(err) => {
                warn!(
                    "event=layout_skipped module=frame status=skip generation={} reason=\"{}\"",
                    generation.0, err
                );
                GateDecision::Skipped(err)
            }
        }
    }
}
