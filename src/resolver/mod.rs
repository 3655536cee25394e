//! The resolver evaluates patterns against a bundle and a set of caller
//! arguments.
//!
//! Resolution is expressed through two traits. [`WriteValue`] streams the
//! rendering of a node into any [`fmt::Write`] sink; it is how whole
//! patterns are assembled. [`ResolveValue`] produces a [`FluentValue`] and
//! is used wherever the resolver needs a value rather than text: select
//! expression selectors, call arguments, and variant keys.

pub mod errors;
mod expression;
mod pattern;
mod scope;

pub use errors::ResolverError;
pub use scope::Scope;

use std::borrow::Borrow;
use std::fmt;

use crate::memoizer::MemoizerKind;
use crate::resource::FluentResource;
use crate::types::FluentValue;

/// Maximum number of placeables a single `format_pattern` call may resolve,
/// counted across reference expansion. Guards against the quadratic blowup
/// class of attacks.
pub const MAX_PLACEABLES: u8 = 100;

/// Converts an AST node to a [`FluentValue`].
pub(crate) trait ResolveValue {
    fn resolve<'source, 'errors, R, M>(
        &'source self,
        scope: &mut Scope<'source, 'errors, R, M>,
    ) -> FluentValue<'source>
    where
        R: Borrow<FluentResource>,
        M: MemoizerKind;
}

/// Writes the rendering of an AST node.
pub(crate) trait WriteValue {
    fn write<'source, 'errors, W, R, M>(
        &'source self,
        w: &mut W,
        scope: &mut Scope<'source, 'errors, R, M>,
    ) -> fmt::Result
    where
        W: fmt::Write,
        R: Borrow<FluentResource>,
        M: MemoizerKind;

    /// Writes the placeholder naming this node, used between braces when
    /// the node fails to resolve.
    fn write_error<W>(&self, w: &mut W) -> fmt::Result
    where
        W: fmt::Write;
}
