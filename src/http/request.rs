//! Request handling and transformation.
//!
//! # Responsibilities
//! - Name the request ID header shared by the request-id layers
//! - Resolve the client address (peer, or trusted X-Forwarded-For)
//! - Turn an HTTP request into the pipeline's `RequestEnvelope`
//!
//! # Design Decisions
//! - Header names arrive lower-cased from `http`, so envelope lookups hit the
//!   exact key
//! - Header values that are not visible ASCII are kept lossily rather than dropped
//! - Non-UTF-8 bodies are carried as base64 so the pipeline, not the
//!   transport, decides they are a failure

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, HeaderName};

use crate::report::RequestEnvelope;

/// Header carrying the per-request ID, set by `SetRequestIdLayer` when the
/// client does not send one.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Build an envelope (without body) from request parts.
pub fn envelope_from_parts(
    parts: &Parts,
    peer: SocketAddr,
    trust_forwarded_for: bool,
) -> RequestEnvelope {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in parts.headers.iter() {
        headers
            .entry(name.as_str().to_string())
            .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    let mut envelope = RequestEnvelope::new()
        .with_source_ip(client_ip(&parts.headers, peer, trust_forwarded_for));
    if let Some(id) = headers.get(X_REQUEST_ID.as_str()) {
        envelope = envelope.with_request_id(id.clone());
    }
    envelope.headers = Some(headers);
    envelope
}

/// Attach the collected body. UTF-8 text is passed through verbatim.
pub fn with_body_bytes(envelope: RequestEnvelope, bytes: Bytes) -> RequestEnvelope {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => envelope.with_body(text),
        Err(_) => envelope.with_binary_body(&bytes),
    }
}

fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    peer.ip().to_string()
}
