//! GWT-RPC request parsing
//!
//! Decomposes a request body, decodes its string table and resolves payload
//! tokens that reference it. Semantic roles (service, method, argument
//! types) are not assigned; tokens are shown by position only.

pub mod decomposer;
pub mod resolver;
pub mod string_table;

pub use decomposer::{decompose, split_fields, DecomposedRequest, RequestHeader};
pub use resolver::{resolve, resolve_token, ResolvedToken};
pub use string_table::{unescape, StringTable, StringTableEntry};

use serde::Serialize;

use crate::error::Result;
use crate::report::Diagnostic;

const REQUEST_NOTES: &[&str] = &[
    "Partial GWT-RPC request parser focused on readability.",
    "Header and string table should be accurate; payload tokens are shown by position only.",
];

/// Structured view of a request body
#[derive(Debug, Clone, Serialize)]
pub struct RequestReport {
    pub raw: String,
    pub header: RequestHeader,
    pub string_table: Vec<StringTableEntry>,
    pub payload: Vec<ResolvedToken>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    pub notes: Vec<String>,
}

impl RequestReport {
    /// Resolved payload values in order
    pub fn resolved_values(&self) -> Vec<&str> {
        self.payload.iter().map(|t| t.value()).collect()
    }

    /// String-table values in order
    pub fn table_values(&self) -> Vec<&str> {
        self.string_table.iter().map(|e| e.value.as_str()).collect()
    }

    pub fn is_truncated(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::TruncatedStringTable { .. }))
    }
}

/// Parse a request body into header, string table and resolved payload.
///
/// Fails only with [`InspectError::MalformedHeader`](crate::InspectError::MalformedHeader).
pub fn parse_request(text: &str) -> Result<RequestReport> {
    let raw = text.trim();
    let DecomposedRequest {
        header,
        string_table,
        payload_tokens,
        diagnostics,
    } = decompose(raw)?;

    let payload = resolve(&payload_tokens, &string_table);

    Ok(RequestReport {
        raw: raw.to_string(),
        header,
        string_table: string_table.indexed(),
        payload,
        diagnostics,
        notes: REQUEST_NOTES.iter().map(|s| s.to_string()).collect(),
    })
}
