//! Special character preservation through the pipeline.
//!
//! Emoji, multi-byte scripts, control characters and symbols must survive
//! parsing and land in the emitted record unchanged.

use std::sync::Arc;

use serde_json::{json, Value};

use csp_report_collector::sink::MemorySink;
use csp_report_collector::{ReportPipeline, RequestEnvelope};

fn gateway_event(body: &str) -> RequestEnvelope {
    let event = json!({
        "requestContext": {
            "requestId": "test-123",
            "http": { "sourceIp": "127.0.0.1" }
        },
        "headers": {
            "user-agent": "Mozilla/5.0",
            "content-type": "application/reports+json"
        },
        "body": body
    });
    serde_json::from_value(event).unwrap()
}

fn run(body: &str) -> (u16, Value) {
    let sink = Arc::new(MemorySink::new());
    let pipeline = ReportPipeline::new(sink.clone());
    let response = pipeline.handle(&gateway_event(body));

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].contains('\n'), "record must stay on one line");
    (response.status_code, serde_json::from_str(&lines[0]).unwrap())
}

fn roundtrip(original: &Value) {
    let text = serde_json::to_string(original).unwrap();
    let (status, record) = run(&text);
    assert_eq!(status, 200);
    assert_eq!(&record["report"], original);
    assert_eq!(serde_json::to_string(&record["report"]).unwrap(), text);
}

#[test]
fn test_emoji_in_report() {
    roundtrip(&json!({
        "type": "csp-violation",
        "url": "https://example.com",
        "body": {
            "documentURL": "https://example.com/page-with-emoji-😀",
            "blockedURL": "https://evil.com/script-🎉.js",
            "effectiveDirective": "script-src"
        }
    }));
}

#[test]
fn test_multibyte_scripts_in_report() {
    roundtrip(&json!({
        "type": "csp-violation",
        "url": "https://example.com/中文/日本語",
        "body": {
            "documentURL": "https://example.com/中文页面",
            "blockedURL": "https://evil.com/スクリプト.js",
            "sample": "console.log(\"你好世界\")",
            "korean": "한국어",
            "arabic": "مرحبا"
        }
    }));
}

#[test]
fn test_control_characters_in_report() {
    let original = json!({
        "type": "csp-violation",
        "body": { "sample": "line1\nline2\ttab\rcarriage\u{0000}\u{001f}" }
    });
    let (_, record) = run(&original.to_string());
    assert_eq!(
        record["report"]["body"]["sample"],
        "line1\nline2\ttab\rcarriage\u{0000}\u{001f}"
    );
}

#[test]
fn test_symbols_in_report() {
    roundtrip(&json!({
        "copyright": "© 2024",
        "registered": "®",
        "trademark": "™",
        "euro": "€",
        "pound": "£"
    }));
}

#[test]
fn test_key_order_preserved() {
    let text = r#"{"zeta":1,"alpha":{"y":"😀","b":[3,2,1]},"mid":null}"#;
    let (_, record) = run(text);
    assert_eq!(serde_json::to_string(&record["report"]).unwrap(), text);
}

#[test]
fn test_malformed_body_with_special_characters_kept_verbatim() {
    let raw = "{\"url\": \"https://example.com/中文/page-😀\", \"sample\": \"a\tb\nc\u{0007}\" © ™";
    let (status, record) = run(raw);
    assert_eq!(status, 200);
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["rawBody"], raw);
}

#[test]
fn test_escaped_unicode_decoded_in_report() {
    let (_, record) = run(r#"{"blockedURL":"https://evil.com/\u00e9\ud83d\ude00"}"#);
    assert_eq!(record["report"]["blockedURL"], "https://evil.com/é😀");
}
