//! Synchronous engine facade for hosts that drive ingestion and rendering
//! from one thread.
//!
//! # Responsibility
//! - Own session, viewport, and the currently shown frame.
//! - Collect explicit recompute triggers and recompute only when one is
//!   pending.
//!
//! # Invariants
//! - The engine never calls back into the host; it is driven by `ingest`,
//!   `resize` and `render`.

use crate::config::{CloudConfig, ConfigError};
use crate::model::frame::{Frame, Viewport};
use crate::model::message::MessageEvent;
use crate::service::frame::{compute_frame, FrameGate, GenerationCounter};
use crate::service::session::{IngestOutcome, WordCloudSession};
use crate::store::AggregateSnapshot;
use std::sync::Arc;

/// Reason a new frame is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    AggregateChanged,
    ViewportChanged,
}

/// Single-threaded engine.
#[derive(Debug)]
pub struct WordCloudEngine {
    config: CloudConfig,
    session: WordCloudSession,
    viewport: Viewport,
    gate: FrameGate,
    pending: Vec<RecomputeTrigger>,
}

impl WordCloudEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: CloudConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: WordCloudSession::from_config(&config),
            config,
            viewport,
            gate: FrameGate::new(Arc::new(GenerationCounter::new())),
            pending: vec![RecomputeTrigger::ViewportChanged],
        })
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    pub fn session(&self) -> &WordCloudSession {
        &self.session
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.session.snapshot()
    }

    pub fn pending_triggers(&self) -> &[RecomputeTrigger] {
        &self.pending
    }

    pub fn ingest(&mut self, event: &MessageEvent) -> IngestOutcome {
        let outcome = self.session.ingest(event);
        if outcome.needs_recompute() {
            self.push_trigger(RecomputeTrigger::AggregateChanged);
        }
        outcome
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.push_trigger(RecomputeTrigger::ViewportChanged);
        }
    }

    /// Recomputes when a trigger is pending and returns the frame to show.
    ///
    /// Returns `None` only while no pass has ever succeeded.
    pub fn render(&mut self) -> Option<&Frame> {
        if !self.pending.is_empty() {
            self.pending.clear();
            let generation = self.gate.request();
            let result = compute_frame(
                &self.session.snapshot(),
                self.viewport,
                &self.config,
                generation,
            );
            // Skipped passes keep the previous frame; the gate already logged why.
            self.gate.apply(generation, result);
        }
        self.gate.current()
    }

    fn push_trigger(&mut self, trigger: RecomputeTrigger) {
        if !self.pending.contains(&trigger) {
            self.pending.push(trigger);
        }
    }
}
