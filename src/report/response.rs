//! Acknowledgement responses.
//!
//! Empty and malformed bodies still get 200: the caller is a browser we do
//! not control, and an error status would only trigger retries that cannot
//! succeed.

use serde::Serialize;

use crate::report::classify::OutcomeKind;

pub const EMPTY_BODY_ACK: &str = "Report received (empty body)";
pub const PARSED_REPORT_ACK: &str = "Report received successfully";
pub const MALFORMED_BODY_ACK: &str = "Report received (invalid JSON)";
pub const INTERNAL_FAILURE_ACK: &str = "Internal server error";

/// Terminal response for one invocation, in the function-runtime shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub status_code: u16,
    /// JSON text: `{"message": "..."}`.
    pub body: String,

    #[serde(skip)]
    pub outcome: OutcomeKind,
}

#[derive(Serialize)]
struct AckBody<'a> {
    message: &'a str,
}

impl AckResponse {
    pub fn for_outcome(outcome: OutcomeKind) -> Self {
        let (status_code, message) = match outcome {
            OutcomeKind::EmptyBody => (200, EMPTY_BODY_ACK),
            OutcomeKind::ParsedReport => (200, PARSED_REPORT_ACK),
            OutcomeKind::MalformedBody => (200, MALFORMED_BODY_ACK),
            OutcomeKind::InternalFailure => (500, INTERNAL_FAILURE_ACK),
        };
        Self {
            status_code,
            body: ack_body(message),
            outcome,
        }
    }
}

fn ack_body(message: &str) -> String {
    // A struct with one &str field always serializes.
    serde_json::to_string(&AckBody { message })
        .unwrap_or_else(|_| format!("{{\"message\":\"{}\"}}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn message(response: &AckResponse) -> String {
        let body: Value = serde_json::from_str(&response.body).unwrap();
        body["message"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_status_and_message_per_outcome() {
        let cases = [
            (OutcomeKind::EmptyBody, 200, EMPTY_BODY_ACK),
            (OutcomeKind::ParsedReport, 200, PARSED_REPORT_ACK),
            (OutcomeKind::MalformedBody, 200, MALFORMED_BODY_ACK),
            (OutcomeKind::InternalFailure, 500, INTERNAL_FAILURE_ACK),
        ];
        for (kind, status, text) in cases {
            let response = AckResponse::for_outcome(kind);
            assert_eq!(response.status_code, status, "{:?}", kind);
            assert_eq!(message(&response), text);
            assert_eq!(response.outcome, kind);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(AckResponse::for_outcome(OutcomeKind::EmptyBody)).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"], r#"{"message":"Report received (empty body)"}"#);
        assert!(value.get("outcome").is_none());
    }
}
