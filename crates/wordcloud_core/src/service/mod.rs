//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate ingestion, aggregation and frame computation into
//!   host-facing entry points.
//! - Keep hosts decoupled from store/layout internals.

pub mod engine;
pub mod frame;
pub mod pipeline;
pub mod session;
