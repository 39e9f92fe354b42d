//! Inbound request envelope.
//!
//! The serde shape follows the API Gateway HTTP API (payload v2) event so a
//! raw function-runtime event deserializes directly. Every field is optional.

use std::borrow::Cow;
use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::report::pipeline::PipelineError;

/// One inbound request, owned for the duration of a single invocation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub request_context: Option<RequestContext>,

    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default)]
    pub body: Option<String>,

    /// Set when `body` carries base64 text rather than the payload itself.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpContext {
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl RequestEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context_mut().request_id = Some(request_id.into());
        self
    }

    pub fn with_source_ip(mut self, source_ip: impl Into<String>) -> Self {
        self.context_mut()
            .http
            .get_or_insert_with(HttpContext::default)
            .source_ip = Some(source_ip.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Attach raw bytes as a base64 body, as the gateway does for binary payloads.
    pub fn with_binary_body(mut self, bytes: &[u8]) -> Self {
        self.body = Some(STANDARD.encode(bytes));
        self.is_base64_encoded = true;
        self
    }

    /// Best-effort envelope from an event that failed to deserialize.
    /// Keeps the string-typed metadata fields and drops the body.
    pub fn salvage(event: &Value) -> Self {
        let context = event.get("requestContext");
        let mut envelope = Self::new();

        if let Some(id) = text_at(context.and_then(|c| c.get("requestId"))) {
            envelope = envelope.with_request_id(id);
        }
        let source_ip = context
            .and_then(|c| c.get("http"))
            .and_then(|h| h.get("sourceIp"));
        if let Some(ip) = text_at(source_ip) {
            envelope = envelope.with_source_ip(ip);
        }
        if let Some(headers) = event.get("headers").and_then(Value::as_object) {
            for (name, value) in headers {
                if let Some(value) = value.as_str() {
                    envelope = envelope.with_header(name.as_str(), value);
                }
            }
        }
        envelope
    }

    fn context_mut(&mut self) -> &mut RequestContext {
        self.request_context.get_or_insert_with(RequestContext::default)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_context.as_ref()?.request_id.as_deref()
    }

    pub fn source_ip(&self) -> Option<&str> {
        self.request_context.as_ref()?.http.as_ref()?.source_ip.as_deref()
    }

    /// Case-insensitive header lookup. An exact lower-case key wins over
    /// other spellings when several are present.
    pub fn header(&self, name: &str) -> Option<&str> {
        let headers = self.headers.as_ref()?;
        let lower = name.to_ascii_lowercase();
        if let Some(value) = headers.get(&lower) {
            return Some(value.as_str());
        }
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body as text, decoding base64 first when flagged.
    ///
    /// Plain bodies are borrowed untouched.
    pub fn decoded_body(&self) -> Result<Option<Cow<'_, str>>, PipelineError> {
        let Some(body) = self.body.as_deref() else {
            return Ok(None);
        };
        if !self.is_base64_encoded {
            return Ok(Some(Cow::Borrowed(body)));
        }
        let bytes = STANDARD.decode(body.trim())?;
        let text = String::from_utf8(bytes)?;
        Ok(Some(Cow::Owned(text)))
    }
}

fn text_at(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}
