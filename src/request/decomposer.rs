//! Request decomposer
//!
//! Splits a pipe-delimited request body into header, string table and
//! payload tokens:
//!
//! `version|flags|tableSize|entry_1|...|entry_N|token_1|...|token_M|`

use serde::{Deserialize, Serialize};

use super::string_table::{StringTable, DELIMITER, ESCAPE};
use crate::error::{HeaderField, InspectError, Result};
use crate::report::Diagnostic;

/// Number of leading integer fields
pub const HEADER_FIELDS: usize = 3;

/// `version|flags|tableSize`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub version: u64,
    pub flags: u64,
    pub string_table_size: usize,
}

/// Result of decomposing a request body, before token resolution
#[derive(Debug, Clone)]
pub struct DecomposedRequest {
    pub header: RequestHeader,
    pub string_table: StringTable,
    pub payload_tokens: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split a body on unescaped delimiters.
///
/// A backslash marks the next character as escaped, so `\!` never starts a
/// new field and neither does a pipe written directly after a backslash.
/// Fields are returned raw; unescaping is left to the string table codec.
/// The empty field left behind by a trailing delimiter is dropped.
pub fn split_fields(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut escape_pending = false;

    for c in body.chars() {
        if escape_pending {
            current.push(c);
            escape_pending = false;
        } else if c == ESCAPE {
            current.push(c);
            escape_pending = true;
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        fields.push(current);
    }

    fields
}

fn parse_header_field<T: std::str::FromStr>(
    fields: &[String],
    position: usize,
    field: HeaderField,
) -> Result<T> {
    let raw = fields.get(position).map(|s| s.as_str()).unwrap_or_default();
    raw.parse().map_err(|_| InspectError::MalformedHeader {
        field,
        value: raw.to_string(),
    })
}

/// Decompose a trimmed request body.
///
/// Only a bad header aborts. A string table shorter than declared is kept as
/// far as it goes and reported as [`Diagnostic::TruncatedStringTable`].
pub fn decompose(body: &str) -> Result<DecomposedRequest> {
    let fields = split_fields(body);

    let header = RequestHeader {
        version: parse_header_field(&fields, 0, HeaderField::Version)?,
        flags: parse_header_field(&fields, 1, HeaderField::Flags)?,
        string_table_size: parse_header_field(&fields, 2, HeaderField::TableSize)?,
    };
    tracing::debug!(
        "Request header: version={} flags={} table_size={}",
        header.version,
        header.flags,
        header.string_table_size
    );

    let mut rest = fields.into_iter().skip(HEADER_FIELDS);
    let string_table = StringTable::from_raw(rest.by_ref().take(header.string_table_size));
    let payload_tokens: Vec<String> = rest.collect();

    let mut diagnostics = Vec::new();
    if string_table.len() < header.string_table_size {
        tracing::warn!(
            "String table truncated: declared {} entries, found {}",
            header.string_table_size,
            string_table.len()
        );
        diagnostics.push(Diagnostic::TruncatedStringTable {
            declared: header.string_table_size,
            found: string_table.len(),
        });
    }

    Ok(DecomposedRequest {
        header,
        string_table,
        payload_tokens,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_escaped_delimiter() {
        assert_eq!(split_fields(r"A\!B|C"), vec![r"A\!B", "C"]);
    }

    #[test]
    fn test_split_drops_trailing_delimiter() {
        assert_eq!(split_fields("7|0|1|a|1|"), vec!["7", "0", "1", "a", "1"]);
    }

    #[test]
    fn test_split_keeps_interior_empty_fields() {
        assert_eq!(split_fields("a||b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_escaped_backslash_before_delimiter() {
        // `\\` is complete, so the following pipe is a boundary
        assert_eq!(split_fields(r"a\\|b"), vec![r"a\\", "b"]);
    }

    #[test]
    fn test_split_pipe_after_backslash_is_not_boundary() {
        assert_eq!(split_fields(r"a\|b|c"), vec![r"a\|b", "c"]);
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_fields("").is_empty());
    }

    #[test]
    fn test_decompose_basic() {
        let req = decompose("1|0|2|hello|world|1|2|99").unwrap();

        assert_eq!(req.header.version, 1);
        assert_eq!(req.header.flags, 0);
        assert_eq!(req.header.string_table_size, 2);
        assert_eq!(req.string_table.values(), ["hello", "world"]);
        assert_eq!(req.payload_tokens, vec!["1", "2", "99"]);
        assert!(req.diagnostics.is_empty());
    }

    #[test]
    fn test_decompose_unescapes_entries_but_not_tokens() {
        let req = decompose(r"7|0|1|a\!b|x\!y").unwrap();

        assert_eq!(req.string_table.get(1), Some("a|b"));
        assert_eq!(req.payload_tokens, vec![r"x\!y"]);
    }

    #[test]
    fn test_decompose_truncated_table() {
        let req = decompose("7|0|5|a|b").unwrap();

        assert_eq!(req.string_table.len(), 2);
        assert!(req.payload_tokens.is_empty());
        assert_eq!(
            req.diagnostics,
            vec![Diagnostic::TruncatedStringTable { declared: 5, found: 2 }]
        );
    }

    #[test]
    fn test_decompose_huge_declared_size() {
        let req = decompose("7|0|4294967295|a").unwrap();

        assert_eq!(req.string_table.len(), 1);
        assert_eq!(req.diagnostics.len(), 1);
    }

    #[test]
    fn test_decompose_bad_version() {
        let err = decompose("x|0|2|a|b").unwrap_err();
        assert!(matches!(
            err,
            InspectError::MalformedHeader { field: HeaderField::Version, ref value } if value == "x"
        ));
    }

    #[test]
    fn test_decompose_negative_flags() {
        let err = decompose("7|-1|2|a|b").unwrap_err();
        assert!(matches!(
            err,
            InspectError::MalformedHeader { field: HeaderField::Flags, .. }
        ));
    }

    #[test]
    fn test_decompose_missing_table_size() {
        let err = decompose("7|0").unwrap_err();
        assert!(matches!(
            err,
            InspectError::MalformedHeader { field: HeaderField::TableSize, ref value } if value.is_empty()
        ));
    }
}
