//! Token resolver
//!
//! Substitutes integer payload tokens that point into the string table.

use serde::{Deserialize, Serialize};

use super::string_table::StringTable;

/// A payload token after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedToken {
    /// Token kept as written (not an in-range index)
    Literal { token: String },
    /// Token replaced by the string-table entry it references
    Resolved { token: String, index: usize, value: String },
}

impl ResolvedToken {
    /// The displayed value: the table entry for references, the token otherwise
    pub fn value(&self) -> &str {
        match self {
            ResolvedToken::Literal { token } => token,
            ResolvedToken::Resolved { value, .. } => value,
        }
    }

    /// The token exactly as it appeared on the wire
    pub fn token(&self) -> &str {
        match self {
            ResolvedToken::Literal { token } | ResolvedToken::Resolved { token, .. } => token,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            ResolvedToken::Literal { .. } => None,
            ResolvedToken::Resolved { index, .. } => Some(*index),
        }
    }
}

/// Resolve a single token. Never fails: anything that is not an index in
/// `[1, table.len()]` stays literal.
pub fn resolve_token(token: &str, table: &StringTable) -> ResolvedToken {
    let referenced = token
        .parse::<i64>()
        .ok()
        .and_then(|n| usize::try_from(n).ok())
        .and_then(|index| table.get(index).map(|value| (index, value)));

    match referenced {
        Some((index, value)) => ResolvedToken::Resolved {
            token: token.to_string(),
            index,
            value: value.to_string(),
        },
        None => ResolvedToken::Literal {
            token: token.to_string(),
        },
    }
}

/// Resolve every token in order, one output per input
pub fn resolve<S: AsRef<str>>(tokens: &[S], table: &StringTable) -> Vec<ResolvedToken> {
    tokens
        .iter()
        .map(|t| resolve_token(t.as_ref(), table))
        .collect()
}
