use thiserror::Error;

/// Conditions that abort a parse. Everything recoverable is a
/// [`Diagnostic`](crate::report::Diagnostic) instead.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Malformed header: {field} field {value:?} is not a non-negative integer")]
    MalformedHeader { field: HeaderField, value: String },

    #[error("Missing response sentinel: expected //OK or //EX")]
    MissingSentinel,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Position of a field within the `version|flags|tableSize` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Version,
    Flags,
    TableSize,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::Version => "version",
            HeaderField::Flags => "flags",
            HeaderField::TableSize => "string table size",
        }
    }
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
