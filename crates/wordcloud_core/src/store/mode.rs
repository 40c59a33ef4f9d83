//! In-band command handling for visualization mode and category epochs.
//!
//! # Responsibility
//! - Recognize `/cloud` and `/chart` control messages.
//! - Track the current mode and the epoch new counts are attributed to.
//!
//! # Invariants
//! - Commands match the trimmed text exactly and case-sensitively.
//! - The epoch only grows, and only on `/cloud`.

use crate::model::frame::{CategoryId, VisualizationMode};
use serde::{Deserialize, Serialize};

const CLOUD_COMMAND: &str = "/cloud";
const CHART_COMMAND: &str = "/chart";

/// Control command carried in a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Switch to cloud mode and open a new category epoch.
    Cloud,
    /// Switch to chart mode.
    Chart,
}

impl Command {
    /// Parses a control command from raw message text.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            CLOUD_COMMAND => Some(Self::Cloud),
            CHART_COMMAND => Some(Self::Chart),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cloud => CLOUD_COMMAND,
            Self::Chart => CHART_COMMAND,
        }
    }
}

/// State change produced by one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeTransition {
    pub command: Command,
    pub previous_mode: VisualizationMode,
    pub mode: VisualizationMode,
    pub previous_epoch: CategoryId,
    pub epoch: CategoryId,
}

/// Mode + epoch state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeController {
    mode: VisualizationMode,
    epoch: CategoryId,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    /// Category that receives new counts.
    pub fn epoch(&self) -> CategoryId {
        self.epoch
    }

    pub fn apply(&mut self, command: Command) -> ModeTransition {
        let previous_mode = self.mode;
        let previous_epoch = self.epoch;
        match command {
            Command::Cloud => {
                self.mode = VisualizationMode::Cloud;
                self.epoch = self.epoch.next();
            }
            Command::Chart => {
                self.mode = VisualizationMode::Chart;
            }
        }
        ModeTransition {
            command,
            previous_mode,
            mode: self.mode,
            previous_epoch,
            epoch: self.epoch,
        }
    }
}
