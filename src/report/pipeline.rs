//! Request-to-log pipeline.
//!
//! # Responsibilities
//! - Run extraction, classification, record building, emission and
//!   response building once per request
//! - Contain every fault at one boundary so each invocation ends in exactly
//!   one record and one response
//! - Keep sink failures away from the response status

use std::string::FromUtf8Error;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::observability::metrics;
use crate::report::classify::{classify, Outcome, OutcomeKind};
use crate::report::envelope::RequestEnvelope;
use crate::report::metadata::RequestMetadata;
use crate::report::record::{FailureDetail, LogRecord};
use crate::report::response::AckResponse;
use crate::sink::LogSink;

/// Faults that turn an invocation into an internal failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("request body is not valid base64")]
    BodyDecode(#[from] base64::DecodeError),

    #[error("request body is not valid UTF-8")]
    BodyEncoding(#[from] FromUtf8Error),

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("failed to serialize log record")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed request event")]
    InvalidEvent(#[source] serde_json::Error),
}

/// The ingestion pipeline. Cheap to share; holds only the sink.
#[derive(Clone)]
pub struct ReportPipeline {
    sink: Arc<dyn LogSink>,
}

impl ReportPipeline {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Process one request.
    pub fn handle(&self, envelope: &RequestEnvelope) -> AckResponse {
        let start = Instant::now();
        let metadata = RequestMetadata::extract(envelope, Utc::now());

        let prepared = Self::prepare(envelope, metadata.clone());
        let response = match prepared {
            Ok((kind, line)) => {
                self.emit(&line);
                AckResponse::for_outcome(kind)
            }
            Err(err) => self.fail(metadata, err),
        };

        metrics::record_report(response.outcome.as_str(), response.status_code, start);
        response
    }

    /// Finish a request whose envelope could not be fully assembled by the
    /// transport, e.g. when the body stream broke.
    pub fn reject(&self, envelope: &RequestEnvelope, err: PipelineError) -> AckResponse {
        let start = Instant::now();
        let metadata = RequestMetadata::extract(envelope, Utc::now());
        let response = self.fail(metadata, err);
        metrics::record_report(response.outcome.as_str(), response.status_code, start);
        response
    }

    /// Process one raw gateway event. An event that is not JSON, or whose
    /// fields have the wrong types, still ends in one record and a 500;
    /// whatever metadata can be read from it is kept.
    pub fn handle_event(&self, raw: &str) -> AckResponse {
        let event: Value = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => return self.reject(&RequestEnvelope::new(), PipelineError::InvalidEvent(e)),
        };
        match RequestEnvelope::deserialize(&event) {
            Ok(envelope) => self.handle(&envelope),
            Err(e) => self.reject(
                &RequestEnvelope::salvage(&event),
                PipelineError::InvalidEvent(e),
            ),
        }
    }

    /// Classify, build and serialize. Nothing is written here, so a
    /// failure leaves the sink untouched for the failure record.
    fn prepare(
        envelope: &RequestEnvelope,
        metadata: RequestMetadata,
    ) -> Result<(OutcomeKind, String), PipelineError> {
        let body = envelope.decoded_body()?;
        let outcome = classify(body.as_deref());
        let kind = outcome.kind();
        let line = LogRecord::build(metadata, outcome).to_line()?;
        Ok((kind, line))
    }

    fn fail(&self, metadata: RequestMetadata, err: PipelineError) -> AckResponse {
        tracing::error!(
            request_id = %metadata.request_id,
            error = %err,
            "Report processing failed"
        );

        let outcome = Outcome::InternalFailure(FailureDetail::from_error(&err));
        let kind = outcome.kind();
        match LogRecord::build(metadata, outcome).to_line() {
            Ok(line) => self.emit(&line),
            Err(e) => tracing::error!(error = %e, "Failed to serialize failure record"),
        }
        AckResponse::for_outcome(kind)
    }

    /// Best effort: a sink failure goes to the diagnostic log and nowhere else.
    fn emit(&self, line: &str) {
        if let Err(err) = self.sink.write_line(line) {
            metrics::record_sink_failure();
            tracing::error!(error = %err, record = %line, "Failed to write log record");
        }
    }
}
