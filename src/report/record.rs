//! Structured log record construction.

use serde::Serialize;
use serde_json::Value;

use crate::report::classify::Outcome;
use crate::report::metadata::RequestMetadata;

pub const EMPTY_BODY_MESSAGE: &str = "Received empty request body";
pub const MALFORMED_BODY_MESSAGE: &str = "Failed to parse JSON";
pub const INTERNAL_FAILURE_MESSAGE: &str = "Internal error processing request";

/// Severity carried by non-informational records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Warning,
    Error,
}

/// Diagnostic detail for an internal failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub message: String,
    /// Messages of the error's source chain, outermost first.
    pub causes: Vec<String>,
}

impl FailureDetail {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}

/// The `error` field: a parser message for malformed bodies, a detail
/// object for internal failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Parse(String),
    Failure(FailureDetail),
}

/// One record per invocation. Optional fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(flatten)]
    pub metadata: RequestMetadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,
}

impl LogRecord {
    fn bare(metadata: RequestMetadata) -> Self {
        Self {
            metadata,
            level: None,
            message: None,
            report: None,
            error: None,
            raw_body: None,
        }
    }

    /// Merge metadata with the outcome. Consumes the outcome so the parsed
    /// report and raw body move into the record without copying.
    pub fn build(metadata: RequestMetadata, outcome: Outcome) -> Self {
        let record = Self::bare(metadata);
        match outcome {
            Outcome::EmptyBody => Self {
                level: Some(Level::Warning),
                message: Some(EMPTY_BODY_MESSAGE),
                ..record
            },
            Outcome::ParsedReport(report) => Self {
                report: Some(report),
                ..record
            },
            Outcome::MalformedBody { raw, error } => Self {
                level: Some(Level::Error),
                message: Some(MALFORMED_BODY_MESSAGE),
                error: Some(ErrorDetail::Parse(error)),
                raw_body: Some(raw),
                ..record
            },
            Outcome::InternalFailure(detail) => Self {
                level: Some(Level::Error),
                message: Some(INTERNAL_FAILURE_MESSAGE),
                error: Some(ErrorDetail::Failure(detail)),
                ..record
            },
        }
    }

    /// Compact single-line JSON. Non-ASCII text is written as UTF-8 and
    /// control characters are escaped, so nothing is lost and the record
    /// never spans lines.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> RequestMetadata {
        RequestMetadata {
            timestamp: "2024-05-01T12:00:00.000Z".into(),
            request_id: "req-9".into(),
            source_ip: "192.0.2.1".into(),
            user_agent: "Mozilla/5.0".into(),
            content_type: "application/csp-report".into(),
        }
    }

    fn as_json(record: &LogRecord) -> Value {
        serde_json::from_str(&record.to_line().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_body_record() {
        let value = as_json(&LogRecord::build(metadata(), Outcome::EmptyBody));
        assert_eq!(value["level"], "WARNING");
        assert_eq!(value["message"], EMPTY_BODY_MESSAGE);
        assert_eq!(value["requestId"], "req-9");
        assert!(value.get("report").is_none());
        assert!(value.get("error").is_none());
        assert!(value.get("rawBody").is_none());
    }

    #[test]
    fn test_parsed_report_record_has_no_level() {
        let report = json!({"type": "csp-violation", "body": {"blockedURL": "https://evil.example/x.js"}});
        let value = as_json(&LogRecord::build(metadata(), Outcome::ParsedReport(report.clone())));
        assert_eq!(value["report"], report);
        assert!(value.get("level").is_none());
        assert!(value.get("message").is_none());
        assert_eq!(value["sourceIp"], "192.0.2.1");
    }

    #[test]
    fn test_malformed_record() {
        let outcome = Outcome::MalformedBody {
            raw: "{not json".into(),
            error: "key must be a string at line 1 column 2".into(),
        };
        let value = as_json(&LogRecord::build(metadata(), outcome));
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["message"], MALFORMED_BODY_MESSAGE);
        assert_eq!(value["rawBody"], "{not json");
        assert_eq!(value["error"], "key must be a string at line 1 column 2");
    }

    #[test]
    fn test_internal_failure_record() {
        let detail = FailureDetail {
            message: "request body is not valid UTF-8".into(),
            causes: vec!["invalid utf-8 sequence of 1 bytes from index 0".into()],
        };
        let value = as_json(&LogRecord::build(metadata(), Outcome::InternalFailure(detail)));
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["message"], INTERNAL_FAILURE_MESSAGE);
        assert_eq!(value["error"]["message"], "request body is not valid UTF-8");
        assert_eq!(value["error"]["causes"][0], "invalid utf-8 sequence of 1 bytes from index 0");
        assert!(value.get("rawBody").is_none());
    }

    #[test]
    fn test_line_is_single_line_and_lossless() {
        let raw = "emoji 😀🎉 中文 日本語 한국어 مرحبا © ® ™ € £\nline2\ttab\rcr\u{0007}";
        let outcome = Outcome::MalformedBody {
            raw: raw.into(),
            error: "expected value".into(),
        };
        let line = LogRecord::build(metadata(), outcome).to_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert!(line.contains("😀🎉 中文"));

        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["rawBody"], raw);
    }

    #[test]
    fn test_failure_detail_walks_source_chain() {
        let err = crate::report::PipelineError::from(String::from_utf8(vec![0xc3]).unwrap_err());
        let detail = FailureDetail::from_error(&err);
        assert_eq!(detail.message, err.to_string());
        assert_eq!(detail.causes.len(), 1);
    }
}
