use std::fmt;

use thiserror::Error;

use crate::parser::ParserError;
use crate::resolver::ResolverError;

/// Core error type for the runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FluentError {
    /// An entry whose id is already taken was added to a bundle without
    /// overriding enabled.
    #[error("attempted to override an existing {kind}: {id}")]
    Overriding { kind: EntryKind, id: String },
    #[error("parser error: {0}")]
    ParserError(#[from] ParserError),
    #[error("resolver error: {0}")]
    ResolverError(#[from] ResolverError),
}

/// The kind of an entry in a bundle, for conflict reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    Term,
    Function,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Message => f.write_str("message"),
            Self::Term => f.write_str("term"),
            Self::Function => f.write_str("function"),
        }
    }
}
