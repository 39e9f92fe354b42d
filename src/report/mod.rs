//! Report ingestion core.
//!
//! # Data Flow
//! ```text
//! RequestEnvelope
//!     → metadata.rs (requestId, sourceIp, headers → RequestMetadata)
//!     → classify.rs (body → Outcome)
//!     → record.rs (RequestMetadata + Outcome → LogRecord)
//!     → pipeline.rs (serialize, write one line to the LogSink)
//!     → response.rs (Outcome → AckResponse)
//! ```
//!
//! # Design Decisions
//! - Each invocation is independent; nothing is shared between requests
//! - Malformed and empty bodies are acknowledged with 200 so browsers do not retry
//! - Any fault is contained at the pipeline boundary and surfaces as one ERROR record plus a 500

pub mod classify;
pub mod envelope;
pub mod metadata;
pub mod pipeline;
pub mod record;
pub mod response;

pub use classify::{classify, Outcome, OutcomeKind};
pub use envelope::{HttpContext, RequestContext, RequestEnvelope};
pub use metadata::{RequestMetadata, UNKNOWN};
pub use pipeline::{PipelineError, ReportPipeline};
pub use record::{ErrorDetail, FailureDetail, Level, LogRecord};
pub use response::AckResponse;
