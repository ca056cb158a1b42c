//! Format classifier
//!
//! Decides whether raw text looks like a GWT-RPC request, a response, or
//! neither. Never fails; `Unknown` is a regular verdict.

use serde::{Deserialize, Serialize};

use crate::request::string_table::DELIMITER;
use crate::response::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVerdict {
    Request,
    Response,
    Unknown,
}

impl FormatVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVerdict::Request => "request",
            FormatVerdict::Response => "response",
            FormatVerdict::Unknown => "unknown",
        }
    }
}

pub fn classify(text: &str) -> FormatVerdict {
    let text = text.trim();

    let verdict = if Status::from_prefix(text).is_some() {
        FormatVerdict::Response
    } else if let Some((first, _)) = text.split_once(DELIMITER) {
        if first.parse::<u64>().is_ok() {
            FormatVerdict::Request
        } else {
            FormatVerdict::Unknown
        }
    } else {
        FormatVerdict::Unknown
    };

    tracing::debug!("Classified input as {}", verdict.as_str());
    verdict
}
