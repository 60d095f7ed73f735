//! yd-logging: append-only NDJSON match events for post-mortems.
//!
//! One JSON object per line; a crashed writer leaves at most one partial
//! trailing line, which readers skip.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log schema version stamped into every event.
pub const LOG_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// A completed roll (all dice resolved and committed).
#[derive(Debug, Clone, Serialize)]
pub struct RollEventV1 {
    pub event: &'static str,
    pub schema: u32,
    pub ts_ms: u64,
    pub match_id: String,
    pub seat: u8,
    pub round: u8,
    pub rolls_used: u8,
    pub dice: [u8; 5],
    /// Simulation ticks the roll needed.
    pub sim_ticks: u32,
}

/// A category committed to a score card.
#[derive(Debug, Clone, Serialize)]
pub struct FillEventV1 {
    pub event: &'static str,
    pub schema: u32,
    pub ts_ms: u64,
    pub match_id: String,
    pub seat: u8,
    pub round: u8,
    pub category: String,
    pub score: i32,
    pub bonus_awarded: bool,
}

/// Terminal transition of a match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOverEventV1 {
    pub event: &'static str,
    pub schema: u32,
    pub ts_ms: u64,
    pub match_id: String,
    /// "win:<seat>", "tie", or "disconnect:<seat>".
    pub result: String,
    pub totals: [i32; 2],
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .write(true)
            .open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
