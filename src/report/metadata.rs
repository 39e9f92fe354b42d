//! Caller metadata extraction.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::report::envelope::RequestEnvelope;

/// Placeholder for any metadata field the envelope does not carry.
pub const UNKNOWN: &str = "unknown";

/// Per-request metadata attached to every log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub timestamp: String,
    pub request_id: String,
    pub source_ip: String,
    pub user_agent: String,
    pub content_type: String,
}

impl RequestMetadata {
    /// Build metadata from the envelope. `now` is the invocation start time.
    pub fn extract(envelope: &RequestEnvelope, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            request_id: or_unknown(envelope.request_id()),
            source_ip: or_unknown(envelope.source_ip()),
            user_agent: or_unknown(envelope.header("user-agent")),
            content_type: or_unknown(envelope.header("content-type")),
        }
    }
}

/// Lookup-with-default: absent and empty values both become [`UNKNOWN`].
pub fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
