//! Shared data model for the aggregation and layout engine.
//!
//! # Responsibility
//! - Define inbound message records and their validation rules.
//! - Define the geometric/visual output shapes handed to a rendering sink.
//!
//! # Invariants
//! - Inbound records are immutable once received.
//! - Output shapes are ephemeral and recomputed on every trigger.

pub mod frame;
pub mod message;
