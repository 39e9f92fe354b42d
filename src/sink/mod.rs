//! Log sink subsystem.
//!
//! # Data Flow
//! ```text
//! ReportPipeline
//!     → LogSink::write_line (one serialized record per invocation)
//!         → stream.rs (stdout / stderr)
//!         → file.rs (append-only file)
//!         → memory.rs (in-process buffer)
//! ```
//!
//! # Design Decisions
//! - A sink writes a whole line or nothing; callers never see partial records
//! - Sinks are shared across concurrent requests behind `Arc<dyn LogSink>`
//! - Write failures are returned, never retried
//! - Stream and file writes are blocking and run on the tokio worker that
//!   handles the request; one short locked write per report is cheap enough
//!   that `spawn_blocking` is not used

pub mod file;
pub mod memory;
pub mod stream;

use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{SinkConfig, SinkKind};

pub use file::FileSink;
pub use memory::MemorySink;
pub use stream::StreamSink;

/// Errors raised while writing a record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink lock poisoned")]
    Poisoned,

    #[error("file sink requires a path")]
    MissingPath,
}

/// Append-only destination for serialized log records.
pub trait LogSink: Send + Sync {
    /// Append one record. `line` carries no trailing newline.
    fn write_line(&self, line: &str) -> Result<(), SinkError>;
}

/// Build the sink selected by configuration.
pub fn from_config(config: &SinkConfig) -> Result<Arc<dyn LogSink>, SinkError> {
    let sink: Arc<dyn LogSink> = match config.kind {
        SinkKind::Stdout => Arc::new(StreamSink::stdout()),
        SinkKind::Stderr => Arc::new(StreamSink::stderr()),
        SinkKind::File => {
            let path = config.path.as_deref().ok_or(SinkError::MissingPath)?;
            Arc::new(FileSink::open(path)?)
        }
    };
    tracing::debug!(kind = ?config.kind, "Log sink ready");
    Ok(sink)
}
