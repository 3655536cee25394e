use thiserror::Error;

/// Errors discovered while resolving a pattern.
///
/// All of these are reported to the caller's error sink and substituted
/// with a visible placeholder in the output, except [`TooManyPlaceables`]
/// which aborts the whole `format_pattern` call.
///
/// [`TooManyPlaceables`]: Self::TooManyPlaceables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("unknown variable: ${0}")]
    UnknownVariable(String),
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    #[error("unknown term: -{0}")]
    UnknownTerm(String),
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("no value: {0}")]
    NoValue(String),
    #[error("unknown function: {0}()")]
    UnknownFunction(String),
    #[error("no default variant")]
    NoDefault,
    #[error("cyclic reference")]
    Cyclic,
    #[error("too many placeables")]
    TooManyPlaceables,
}
