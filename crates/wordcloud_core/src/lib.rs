//! Chat word-cloud aggregation and layout engine.
//! This crate is the single source of truth for counting and placement
//! invariants; hosts only feed messages and draw the returned frames.

pub mod chart;
pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod text;

pub use chart::{build_chart, Bar, BarGeometry, ChartData};
pub use config::{CloudConfig, ConfigError, RotationSet};
pub use layout::grid::{partition, GridCell, GridShape};
pub use layout::spiral::{layout, LayoutItem, Placement, RegionLayout, SpiralParams};
pub use layout::style::{ColorPalette, FontScale};
pub use layout::{layout_cloud, CloudLayout, LayoutError};
pub use logging::{
    default_log_level, init_logging, logging_status, start_logging, LogSettings, LoggingError,
};
pub use model::frame::{
    CategoryId, Frame, FrameContent, Generation, PlacedLabel, Viewport, VisualizationMode,
};
pub use model::message::{MessageEvent, MessageValidationError};
pub use service::engine::{RecomputeTrigger, WordCloudEngine};
pub use service::frame::{compute_frame, FrameGate, GateDecision, GenerationCounter};
pub use service::pipeline::{spawn_pipeline, PipelineError, PipelineHandle, PipelineInput};
pub use service::session::{IngestOutcome, WordCloudSession};
pub use store::frequency::{CategorySnapshot, FrequencySnapshot, FrequencyStore, WordCounts};
pub use store::mode::{Command, ModeController, ModeTransition};
pub use store::AggregateSnapshot;
pub use text::dedup::{DedupPolicy, Deduplicator};
pub use text::tokenizer::tokenize;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
