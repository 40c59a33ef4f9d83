//! CLI replay probe.
//!
//! # Responsibility
//! - Replay JSON-lines chat messages from stdin through `wordcloud_core`.
//! - Print the resulting frame as JSON for quick local inspection.
//!
//! Usage: `wordcloud_cli [CONFIG_JSON_PATH] [WIDTHxHEIGHT] < messages.jsonl`
//! Set `WORDCLOUD_LOG_DIR` to an absolute path to enable file logging.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use wordcloud_core::{
    default_log_level, init_logging, CloudConfig, IngestOutcome, MessageEvent, Viewport,
    WordCloudEngine,
};

/// Absolute directory for rolling logs; logging stays off when unset.
const LOG_DIR_ENV: &str = "WORDCLOUD_LOG_DIR";

const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wordcloud_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        init_logging(default_log_level(), &log_dir).map_err(|err| err.to_string())?;
    }

    let mut config = CloudConfig::default();
    let mut viewport = DEFAULT_VIEWPORT;
    for arg in std::env::args().skip(1) {
        match parse_viewport(&arg) {
            Some(parsed) => viewport = parsed,
            None => config = load_config(&arg)?,
        }
    }

    let mut engine = WordCloudEngine::new(config, viewport).map_err(|err| err.to_string())?;
    let mut rejected = 0_usize;
    for (line_no, line) in io::stdin().lock().lines().enumerate() {
        let line = line.map_err(|err| format!("failed to read stdin: {err}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<MessageEvent>(&line) {
            Ok(event) => event,
            Err(err) => {
                eprintln!("line {}: skipped: {err}", line_no + 1);
                rejected += 1;
                continue;
            }
        };
        if let IngestOutcome::Rejected(err) = engine.ingest(&event) {
            eprintln!("line {}: rejected: {err}", line_no + 1);
            rejected += 1;
        }
    }

    let frame = engine
        .render()
        .ok_or_else(|| "no frame could be computed for this viewport".to_string())?;
    let json = serde_json::to_string_pretty(frame).map_err(|err| err.to_string())?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").map_err(|err| err.to_string())?;
    if rejected > 0 {
        eprintln!("{rejected} line(s) skipped");
    }
    Ok(())
}

fn load_config(path: &str) -> Result<CloudConfig, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{path}`: {err}"))?;
    serde_json::from_str::<CloudConfig>(&raw)
        .map_err(|err| format!("invalid config `{path}`: {err}"))
}

fn parse_viewport(value: &str) -> Option<Viewport> {
    let (width, height) = value.split_once('x')?;
    Some(Viewport::new(
        width.trim().parse().ok()?,
        height.trim().parse().ok()?,
    ))
}
