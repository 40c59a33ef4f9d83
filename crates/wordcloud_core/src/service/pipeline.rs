//! Threaded ingestion/layout pipeline.
//!
//! # Responsibility
//! - Consume host input from one inbound queue on a single aggregation
//!   thread.
//! - Run layout passes on a separate thread so ingestion never waits on
//!   packing.
//! - Publish accepted frames on an outbound queue.
//!
//! # Invariants
//! - Messages are aggregated strictly in arrival order, one at a time.
//! - Every layout job carries a copy of the aggregate, never a live
//!   reference.
//! - The layout thread coalesces queued jobs to the newest one and the gate
//!   discards any result whose generation was superseded.

use crate::config::{CloudConfig, ConfigError};
use crate::model::frame::{Frame, Generation, Viewport};
use crate::model::message::MessageEvent;
use crate::service::frame::{compute_frame, FrameGate, GateDecision, GenerationCounter};
use crate::service::session::WordCloudSession;
use crate::store::AggregateSnapshot;
use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Host input accepted by the pipeline.
#[derive(Debug, Clone)]
pub enum PipelineInput {
    Message(MessageEvent),
    Resize(Viewport),
    Shutdown,
}

#[derive(Debug)]
struct LayoutJob {
    generation: Generation,
    snapshot: AggregateSnapshot,
    viewport: Viewport,
}

/// Handle owning the pipeline threads and queues.
#[derive(Debug)]
pub struct PipelineHandle {
    input: Sender<PipelineInput>,
    frames: Receiver<Frame>,
    aggregator: Option<JoinHandle<AggregateSnapshot>>,
    layout: Option<JoinHandle<()>>,
}

/// Starts the aggregation and layout threads.
///
/// # Errors
/// - [`PipelineError::Config`] when `config` is invalid.
/// - [`PipelineError::Spawn`] when a thread cannot be started.
pub fn spawn_pipeline(
    config: CloudConfig,
    viewport: Viewport,
) -> Result<PipelineHandle, PipelineError> {
    config.validate().map_err(PipelineError::Config)?;

    let (input_tx, input_rx) = unbounded::<PipelineInput>();
    let (job_tx, job_rx) = unbounded::<LayoutJob>();
    let (frame_tx, frame_rx) = unbounded::<Frame>();
    let counter = Arc::new(GenerationCounter::new());

    let layout_config = config.clone();
    let layout_counter = Arc::clone(&counter);
    let layout = thread::Builder::new()
        .name("wordcloud-layout".to_string())
        .spawn(move || run_layout_loop(layout_config, layout_counter, job_rx, frame_tx))
        .map_err(PipelineError::Spawn)?;

    let aggregator = thread::Builder::new()
        .name("wordcloud-aggregate".to_string())
        .spawn(move || run_aggregation_loop(config, viewport, counter, input_rx, job_tx))
        .map_err(PipelineError::Spawn)?;

    info!("event=pipeline_start module=pipeline status=ok");
    Ok(PipelineHandle {
        input: input_tx,
        frames: frame_rx,
        aggregator: Some(aggregator),
        layout: Some(layout),
    })
}

impl PipelineHandle {
    /// Clonable inbound sender for host adapters.
    pub fn sender(&self) -> Sender<PipelineInput> {
        self.input.clone()
    }

    pub fn send(&self, event: MessageEvent) -> Result<(), PipelineError> {
        self.input
            .send(PipelineInput::Message(event))
            .map_err(PipelineError::from)
    }

    pub fn resize(&self, viewport: Viewport) -> Result<(), PipelineError> {
        self.input
            .send(PipelineInput::Resize(viewport))
            .map_err(PipelineError::from)
    }

    /// Accepted frames, oldest first.
    pub fn frames(&self) -> &Receiver<Frame> {
        &self.frames
    }

    /// Stops both threads after queued input is processed.
    ///
    /// Returns the final aggregate.
    pub fn shutdown(mut self) -> Result<AggregateSnapshot, PipelineError> {
        // A closed queue means the aggregator already exited.
        let _ = self.input.send(PipelineInput::Shutdown);
        let aggregator = self.aggregator.take().ok_or(PipelineError::Stopped)?;
        let snapshot = join_worker(aggregator, "aggregate")?;
        if let Some(layout) = self.layout.take() {
            join_worker(layout, "layout")?;
        }
        info!("event=pipeline_stop module=pipeline status=ok");
        Ok(snapshot)
    }
}

fn join_worker<T>(handle: JoinHandle<T>, worker: &'static str) -> Result<T, PipelineError> {
    handle.join().map_err(|_| {
        error!("event=worker_panic module=pipeline status=error worker={worker}");
        PipelineError::Panicked(worker)
    })
}

fn run_aggregation_loop(
    config: CloudConfig,
    mut viewport: Viewport,
    counter: Arc<GenerationCounter>,
    input: Receiver<PipelineInput>,
    jobs: Sender<LayoutJob>,
) -> AggregateSnapshot {
    let mut session = WordCloudSession::from_config(&config);
    let schedule = |session: &WordCloudSession, viewport: Viewport| {
        let job = LayoutJob {
            generation: counter.next(),
            snapshot: session.snapshot(),
            viewport,
        };
        if jobs.send(job).is_err() {
            warn!("event=layout_enqueue module=pipeline status=error reason=layout_thread_gone");
        }
    };

    schedule(&session, viewport);
    while let Ok(message) = input.recv() {
        match message {
            PipelineInput::Message(event) => {
                if session.ingest(&event).needs_recompute() {
                    schedule(&session, viewport);
                }
            }
            PipelineInput::Resize(next) => {
                if next != viewport {
                    viewport = next;
                    schedule(&session, viewport);
                }
            }
            PipelineInput::Shutdown => break,
        }
    }
    session.snapshot()
}

fn run_layout_loop(
    config: CloudConfig,
    counter: Arc<GenerationCounter>,
    jobs: Receiver<LayoutJob>,
    frames: Sender<Frame>,
) {
    let mut gate = FrameGate::new(counter);
    while let Ok(mut job) = jobs.recv() {
        while let Ok(newer) = jobs.try_recv() {
            job = newer;
        }
        if !gate.counter().is_latest(job.generation) {
            debug!(
                "event=layout_superseded module=pipeline status=skip generation={}",
                job.generation.0
            );
            continue;
        }

        let result = compute_frame(&job.snapshot, job.viewport, &config, job.generation);
        if let GateDecision::Applied = gate.apply(job.generation, result) {
            if let Some(frame) = gate.current() {
                if frames.send(frame.clone()).is_err() {
                    break;
                }
            }
        }
    }
}

/// Pipeline control errors.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Spawn(std::io::Error),
    /// The aggregation thread is no longer accepting input.
    Stopped,
    Panicked(&'static str),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid pipeline config: {err}"),
            Self::Spawn(err) => write!(f, "failed to spawn pipeline thread: {err}"),
            Self::Stopped => write!(f, "pipeline is stopped"),
            Self::Panicked(thread) => write!(f, "pipeline {thread} thread panicked"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::Stopped | Self::Panicked(_) => None,
        }
    }
}

impl From<SendError<PipelineInput>> for PipelineError {
    fn from(_: SendError<PipelineInput>) -> Self {
        Self::Stopped
    }
}
