//! Top-level inspection and non-fatal diagnostics

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{classify, FormatVerdict};
use crate::error::Result;
use crate::request::{parse_request, RequestReport};
use crate::response::{parse_response, ResponseReport};

/// Conditions attached to a result without aborting it
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("String table truncated: declared {declared} entries, found {found}")]
    TruncatedStringTable { declared: usize, found: usize },

    #[error("Failed to parse JSON body: {message}")]
    BodyDecodeFailed { message: String },

    #[error("Does not look like a GWT-RPC request or //OK //EX response")]
    UnknownFormat,
}

/// Input that matched neither shape
#[derive(Debug, Clone, Serialize)]
pub struct UnknownReport {
    pub raw: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of inspecting arbitrary text
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inspection {
    Request(RequestReport),
    Response(ResponseReport),
    Unknown(UnknownReport),
}

impl Inspection {
    pub fn verdict(&self) -> FormatVerdict {
        match self {
            Inspection::Request(_) => FormatVerdict::Request,
            Inspection::Response(_) => FormatVerdict::Response,
            Inspection::Unknown(_) => FormatVerdict::Unknown,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Inspection::Request(r) => &r.diagnostics,
            Inspection::Response(r) => &r.diagnostics,
            Inspection::Unknown(r) => &r.diagnostics,
        }
    }
}

/// Classify the text and run the matching parser.
///
/// Only a malformed request header is an error.
pub fn inspect(text: &str) -> Result<Inspection> {
    match classify(text) {
        FormatVerdict::Response => parse_response(text).map(Inspection::Response),
        FormatVerdict::Request => parse_request(text).map(Inspection::Request),
        FormatVerdict::Unknown => Ok(Inspection::Unknown(UnknownReport {
            raw: text.trim().to_string(),
            diagnostics: vec![Diagnostic::UnknownFormat],
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_dispatches_by_verdict() {
        assert_eq!(inspect("//OK[]").unwrap().verdict(), FormatVerdict::Response);
        assert_eq!(inspect("1|0|0|").unwrap().verdict(), FormatVerdict::Request);
        assert_eq!(inspect("nope").unwrap().verdict(), FormatVerdict::Unknown);
    }

    #[test]
    fn test_unknown_carries_condition() {
        let inspection = inspect("  garbage ").unwrap();

        assert_eq!(inspection.diagnostics(), &[Diagnostic::UnknownFormat]);
        let json = serde_json::to_value(&inspection).unwrap();
        assert_eq!(json["kind"], "unknown");
        assert_eq!(json["raw"], "garbage");
        assert_eq!(json["diagnostics"][0]["condition"], "unknown_format");
    }

    #[test]
    fn test_diagnostic_messages() {
        let d = Diagnostic::TruncatedStringTable { declared: 4, found: 1 };
        assert_eq!(d.to_string(), "String table truncated: declared 4 entries, found 1");
    }
}
