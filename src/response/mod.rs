//! GWT-RPC response envelope decoder
//!
//! Responses are `//OK<json>` or `//EX<json>`. The body is decoded with the
//! JSON grammar when possible and kept raw otherwise.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InspectError, Result};
use crate::report::Diagnostic;

pub const OK_SENTINEL: &str = "//OK";
pub const EX_SENTINEL: &str = "//EX";

const RESPONSE_NOTES: &[&str] = &[
    "GWT-RPC responses are typically JSON arrays with type info.",
    "This tool just makes them readable; you still need to interpret semantics.",
];

/// Envelope status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "EX")]
    Ex,
}

impl Status {
    /// Detect the status from the start of already trimmed text
    pub fn from_prefix(text: &str) -> Option<Self> {
        if text.starts_with(OK_SENTINEL) {
            Some(Status::Ok)
        } else if text.starts_with(EX_SENTINEL) {
            Some(Status::Ex)
        } else {
            None
        }
    }

    pub fn sentinel(&self) -> &'static str {
        match self {
            Status::Ok => OK_SENTINEL,
            Status::Ex => EX_SENTINEL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Ex => "EX",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Ex => "exception",
        }
    }
}

/// Sentinel-stripped envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: Status,
    pub body: String,
}

/// Best-effort decoded body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedBody {
    Structured(Value),
    Raw(String),
}

impl DecodedBody {
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            DecodedBody::Structured(value) => Some(value),
            DecodedBody::Raw(_) => None,
        }
    }
}

/// Structured view of a response
#[derive(Debug, Clone, Serialize)]
pub struct ResponseReport {
    pub raw: String,
    pub status: Status,
    pub status_label: &'static str,
    pub raw_body: String,
    pub body: DecodedBody,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    pub notes: Vec<String>,
}

impl ResponseReport {
    pub fn envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope {
            status: self.status,
            body: self.raw_body.clone(),
        }
    }

    pub fn body_decoded(&self) -> bool {
        matches!(self.body, DecodedBody::Structured(_))
    }
}

/// Strip the sentinel from trimmed text
pub fn strip_envelope(text: &str) -> Result<ResponseEnvelope> {
    let raw = text.trim();
    let status = Status::from_prefix(raw).ok_or(InspectError::MissingSentinel)?;
    let body = raw[status.sentinel().len()..].trim_start();

    Ok(ResponseEnvelope {
        status,
        body: body.to_string(),
    })
}

/// Decode a body with the JSON grammar, keeping it raw on failure
pub fn decode_body(body: &str) -> (DecodedBody, Option<Diagnostic>) {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => (DecodedBody::Structured(value), None),
        Err(e) => {
            tracing::warn!("Response body is not valid JSON: {}", e);
            (
                DecodedBody::Raw(body.to_string()),
                Some(Diagnostic::BodyDecodeFailed {
                    message: e.to_string(),
                }),
            )
        }
    }
}

/// Parse a `//OK` / `//EX` response.
///
/// Fails only with [`InspectError::MissingSentinel`]; a body that is not JSON
/// is returned raw with [`Diagnostic::BodyDecodeFailed`].
pub fn parse_response(text: &str) -> Result<ResponseReport> {
    let envelope = strip_envelope(text)?;
    let (body, diagnostic) = decode_body(&envelope.body);

    Ok(ResponseReport {
        raw: text.trim().to_string(),
        status: envelope.status,
        status_label: envelope.status.label(),
        raw_body: envelope.body,
        body,
        diagnostics: diagnostic.into_iter().collect(),
        notes: RESPONSE_NOTES.iter().map(|s| s.to_string()).collect(),
    })
}
