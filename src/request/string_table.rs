//! String table codec
//!
//! Unescapes raw string-table entries and exposes 1-indexed lookup, matching
//! the wire convention where token `0` means "no reference".

use serde::{Deserialize, Serialize};

/// Escape introducer inside string-table entries
pub const ESCAPE: char = '\\';

/// Escaped form of the field delimiter (`\!` decodes to `|`)
pub const ESCAPED_DELIMITER: char = '!';

/// Field delimiter of the request body
pub const DELIMITER: char = '|';

/// Decode a single raw entry.
///
/// `\!` becomes `|` and `\\` becomes `\`. Any other escape is kept as both
/// characters, and a lone trailing backslash is kept as is.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(ESCAPED_DELIMITER) => out.push(DELIMITER),
            Some(ESCAPE) => out.push(ESCAPE),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }

    out
}

/// A single decoded entry together with its wire index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTableEntry {
    /// 1-based index as referenced by payload tokens
    pub index: usize,
    pub value: String,
}

/// Ordered, 1-indexed table of decoded strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTable {
    entries: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by unescaping each raw entry in order
    pub fn from_raw<I, S>(raw_entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: raw_entries
                .into_iter()
                .map(|raw| unescape(raw.as_ref()))
                .collect(),
        }
    }

    /// Look up an entry by its 1-based index. Index 0 is never valid.
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.entries
    }

    /// Entries paired with their 1-based indexes
    pub fn indexed(&self) -> Vec<StringTableEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, value)| StringTableEntry {
                index: i + 1,
                value: value.clone(),
            })
            .collect()
    }
}
