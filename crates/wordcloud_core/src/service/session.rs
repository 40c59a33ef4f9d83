//! Message ingestion use-case.
//!
//! # Responsibility
//! - Validate, deduplicate and tokenize inbound messages.
//! - Route control commands to the mode controller and content to the
//!   frequency store.
//!
//! # Invariants
//! - Processing order per message: validate -> dedup -> command check ->
//!   tokenize -> count.
//! - A message id is marked processed even when it yields no tokens or is a
//!   command, so redelivery never re-applies a command.
//! - Given the same ordered event stream, the resulting snapshot is fully
//!   determined.

use crate::config::CloudConfig;
use crate::model::frame::{CategoryId, VisualizationMode};
use crate::model::message::{MessageEvent, MessageValidationError};
use crate::store::frequency::FrequencyStore;
use crate::store::mode::{Command, ModeController, ModeTransition};
use crate::store::AggregateSnapshot;
use crate::text::dedup::{DedupPolicy, Deduplicator};
use crate::text::tokenizer::tokenize;
use log::{debug, info, warn};

/// What ingestion did with one message.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Tokens were counted into `category`.
    Counted {
        tokens: Vec<String>,
        category: CategoryId,
    },
    /// The message was a control command.
    Command(ModeTransition),
    /// The message produced no tokens.
    Empty,
    /// The id was already processed.
    Duplicate,
    /// The message was malformed and dropped.
    Rejected(MessageValidationError),
}

impl IngestOutcome {
    /// Whether the rendered frame may differ after this message.
    pub fn needs_recompute(&self) -> bool {
        matches!(self, Self::Counted { .. } | Self::Command(_))
    }

    /// Counted tokens; empty for every other outcome.
    pub fn tokens(&self) -> &[String] {
        match self {
            Self::Counted { tokens, .. } => tokens,
            _ => &[],
        }
    }
}

/// Single-writer aggregation state for one session.
#[derive(Debug, Clone, Default)]
pub struct WordCloudSession {
    dedup: Deduplicator,
    store: FrequencyStore,
    controller: ModeController,
}

impl WordCloudSession {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            dedup: Deduplicator::new(policy),
            store: FrequencyStore::new(),
            controller: ModeController::new(),
        }
    }

    pub fn from_config(config: &CloudConfig) -> Self {
        Self::new(config.dedup)
    }

    /// Processes one message to completion.
    pub fn ingest(&mut self, event: &MessageEvent) -> IngestOutcome {
        if let Err(err) = event.validate() {
            warn!(
                "event=message_rejected module=session status=skip reason=\"{}\"",
                err
            );
            return IngestOutcome::Rejected(err);
        }

        if !self.dedup.check_and_mark(&event.id) {
            debug!(
                "event=message_duplicate module=session status=skip message_id={}",
                event.id
            );
            return IngestOutcome::Duplicate;
        }
        self.store.mark_processed();

        if let Some(command) = Command::parse(&event.text) {
            let transition = self.controller.apply(command);
            info!(
                "event=mode_command module=session status=ok command={} mode={:?} epoch={}",
                command.as_str(),
                transition.mode,
                transition.epoch
            );
            return IngestOutcome::Command(transition);
        }

        let tokens = tokenize(&event.text);
        if tokens.is_empty() {
            debug!(
                "event=message_empty module=session status=skip message_id={}",
                event.id
            );
            return IngestOutcome::Empty;
        }

        let category = self.controller.epoch();
        self.store.record(category, &tokens);
        debug!(
            "event=message_counted module=session status=ok message_id={} tokens={} category={}",
            event.id,
            tokens.len(),
            category
        );
        IngestOutcome::Counted { tokens, category }
    }

    pub fn mode(&self) -> VisualizationMode {
        self.controller.mode()
    }

    pub fn epoch(&self) -> CategoryId {
        self.controller.epoch()
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    pub fn dedup(&self) -> &Deduplicator {
        &self.dedup
    }

    /// Detached copy of counts and mode state.
    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            global: self.store.frequency_snapshot(),
            categories: self.store.category_snapshot(),
            mode: self.controller.mode(),
            epoch: self.controller.epoch(),
            processed_messages: self.store.processed_messages(),
        }
    }
}
