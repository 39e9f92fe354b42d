//! Request body classification.

use serde_json::Value;

use crate::report::record::FailureDetail;

/// How a single request body was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Body absent or whitespace only.
    EmptyBody,
    /// Body parsed as a JSON document.
    ParsedReport(Value),
    /// Body present but not valid JSON. `raw` is the body exactly as received.
    MalformedBody { raw: String, error: String },
    /// Unexpected fault anywhere in the pipeline.
    InternalFailure(FailureDetail),
}

/// Payload-free discriminant of [`Outcome`], used for responses and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    EmptyBody,
    ParsedReport,
    MalformedBody,
    InternalFailure,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::EmptyBody => OutcomeKind::EmptyBody,
            Outcome::ParsedReport(_) => OutcomeKind::ParsedReport,
            Outcome::MalformedBody { .. } => OutcomeKind::MalformedBody,
            Outcome::InternalFailure(_) => OutcomeKind::InternalFailure,
        }
    }
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::EmptyBody => "empty_body",
            OutcomeKind::ParsedReport => "parsed_report",
            OutcomeKind::MalformedBody => "malformed_body",
            OutcomeKind::InternalFailure => "internal_failure",
        }
    }
}

/// Classify a body. Never fails: bad JSON is an outcome, not an error.
pub fn classify(body: Option<&str>) -> Outcome {
    let body = match body {
        Some(b) if !b.trim().is_empty() => b,
        _ => return Outcome::EmptyBody,
    };

    // serde_json stops at 128 levels of nesting, so a hostile body fails
    // here as malformed instead of exhausting the stack.
    match serde_json::from_str::<Value>(body) {
        Ok(report) => Outcome::ParsedReport(report),
        Err(e) => Outcome::MalformedBody {
            raw: body.to_string(),
            error: e.to_string(),
        },
    }
}
