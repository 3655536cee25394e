use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

use crate::ast;
use crate::bundle::FluentBundleBase;
use crate::memoizer::MemoizerKind;
use crate::resolver::{ResolveValue, ResolverError, WriteValue};
use crate::types::{FluentNone, FluentValue};
use crate::{FluentArgs, FluentError, FluentResource};

/// State for a single `format_pattern` call.
pub struct Scope<'scope, 'errors, R, M> {
    /// The bundle the pattern is resolved against.
    pub bundle: &'scope FluentBundleBase<R, M>,
    /// The arguments passed by the developer.
    pub(super) args: Option<&'scope FluentArgs<'scope>>,
    /// The parameter frame of the term reference currently being resolved.
    /// While it is `Some`, variable lookups consult only this frame and
    /// missing variables are not reported.
    pub(super) local_args: Option<FluentArgs<'scope>>,
    /// The running count of resolved placeables. Used to detect the
    /// Billion Laughs and Quadratic Blowup attacks.
    pub(super) placeables: u8,
    /// The patterns currently being resolved, compared by identity.
    travelled: SmallVec<[&'scope ast::Pattern; 2]>,
    /// Errors accumulated during resolving.
    pub errors: Option<&'errors mut Vec<FluentError>>,
    /// Set when the placeable budget is exhausted; makes the resolver bail
    /// and the caller discard partial output.
    pub dirty: bool,
}

impl<'scope, 'errors, R, M: MemoizerKind> Scope<'scope, 'errors, R, M> {
    pub fn new(
        bundle: &'scope FluentBundleBase<R, M>,
        args: Option<&'scope FluentArgs>,
        errors: Option<&'errors mut Vec<FluentError>>,
    ) -> Self {
        Scope {
            bundle,
            args,
            local_args: None,
            placeables: 0,
            travelled: Default::default(),
            errors,
            dirty: false,
        }
    }

    pub fn add_error(&mut self, error: ResolverError) {
        if let Some(errors) = self.errors.as_mut() {
            errors.push(error.into());
        }
    }

    fn is_travelled(&self, pattern: &'scope ast::Pattern) -> bool {
        // Identity, not structural equality: two distinct messages with
        // identical bodies must be independently resolvable.
        self.travelled.iter().any(|p| std::ptr::eq(*p, pattern))
    }

    /// Puts the outermost pattern on the stack lazily, only when it turns
    /// out to contain a placeable. Simple resolutions never touch the
    /// stack.
    pub fn maybe_track<W>(
        &mut self,
        w: &mut W,
        pattern: &'scope ast::Pattern,
        exp: &'scope ast::Expression,
    ) -> fmt::Result
    where
        R: Borrow<FluentResource>,
        W: fmt::Write,
    {
        if self.travelled.is_empty() {
            self.travelled.push(pattern);
        }
        exp.write(w, self)
    }

    /// Writes a referenced pattern, guarding against reference cycles.
    pub fn track<W>(
        &mut self,
        w: &mut W,
        pattern: &'scope ast::Pattern,
        exp: &'scope ast::Expression,
    ) -> fmt::Result
    where
        R: Borrow<FluentResource>,
        W: fmt::Write,
    {
        if self.is_travelled(pattern) {
            self.add_error(ResolverError::Cyclic);
            w.write_char('{')?;
            exp.write_error(w)?;
            w.write_char('}')
        } else {
            self.travelled.push(pattern);
            let result = pattern.write(w, self);
            self.travelled.pop();
            result
        }
    }

    /// Resolves a referenced pattern to a value, guarding against
    /// reference cycles. Failures come back as `FluentValue::None` so that
    /// a broken selector still picks the default variant.
    pub fn track_resolve(
        &mut self,
        pattern: &'scope ast::Pattern,
        exp: &'scope ast::Expression,
    ) -> FluentValue<'scope>
    where
        R: Borrow<FluentResource>,
    {
        if self.is_travelled(pattern) {
            self.add_error(ResolverError::Cyclic);
            return FluentValue::None(error_placeholder(exp));
        }
        self.travelled.push(pattern);
        let mut result = String::new();
        let write_result = pattern.write(&mut result, self);
        self.travelled.pop();
        match write_result {
            Ok(()) => FluentValue::String(result.into()),
            Err(_) => FluentValue::None(error_placeholder(exp)),
        }
    }

    /// Reports `error` and writes the expression's placeholder in braces.
    pub fn write_ref_error<W>(
        &mut self,
        w: &mut W,
        error: ResolverError,
        exp: &ast::Expression,
    ) -> fmt::Result
    where
        W: fmt::Write,
    {
        self.add_error(error);
        w.write_char('{')?;
        exp.write_error(w)?;
        w.write_char('}')
    }

    /// Resolves call arguments into positional values and a named argument
    /// map, in the calling scope.
    pub fn get_arguments(
        &mut self,
        arguments: &'scope [ast::Argument],
    ) -> (Vec<FluentValue<'scope>>, FluentArgs<'scope>)
    where
        R: Borrow<FluentResource>,
    {
        let mut resolved_positional_args = Vec::new();
        let mut resolved_named_args = FluentArgs::new();

        for argument in arguments {
            match argument {
                ast::Argument::Positional(expression) => {
                    resolved_positional_args.push(expression.resolve(self));
                }
                ast::Argument::Named { name, value } => {
                    resolved_named_args.set(name.as_str(), value.resolve(self));
                }
            }
        }

        (resolved_positional_args, resolved_named_args)
    }
}

/// The `FluentNone` naming the expression that failed to resolve.
pub(super) fn error_placeholder(exp: &ast::Expression) -> FluentNone {
    let mut placeholder = String::new();
    exp.write_error(&mut placeholder)
        .expect("Failed to write to a String.");
    FluentNone::new(placeholder)
}
