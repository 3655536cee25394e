use std::borrow::Borrow;
use std::fmt;

use crate::ast;
use crate::builtins;
use crate::entry::GetEntry;
use crate::memoizer::MemoizerKind;
use crate::resolver::scope::error_placeholder;
use crate::resolver::{ResolveValue, ResolverError, Scope, WriteValue};
use crate::resource::FluentResource;
use crate::types::{FluentNumber, FluentNumberOptions, FluentValue};

/// Finds the pattern a message reference points at, or the error to report.
fn message_pattern<'source, R, M>(
    scope: &Scope<'source, '_, R, M>,
    name: &str,
    attribute: Option<&String>,
) -> Result<&'source ast::Pattern, ResolverError>
where
    R: Borrow<FluentResource>,
{
    let bundle = scope.bundle;
    match bundle.get_entry_message(name) {
        Some(entry) => match attribute {
            Some(attr_name) => entry
                .attributes
                .iter()
                .find(|attr| &attr.id == attr_name)
                .map(|attr| &attr.value)
                .ok_or_else(|| {
                    ResolverError::UnknownAttribute(format!("{}.{}", name, attr_name))
                }),
            None => entry
                .value
                .as_ref()
                .ok_or_else(|| ResolverError::NoValue(name.to_owned())),
        },
        None => Err(ResolverError::UnknownMessage(name.to_owned())),
    }
}

/// Finds the pattern a term reference points at, or the error to report.
/// `name` excludes the `-` sigil.
fn term_pattern<'source, R, M>(
    scope: &Scope<'source, '_, R, M>,
    name: &str,
    attribute: Option<&String>,
) -> Result<&'source ast::Pattern, ResolverError>
where
    R: Borrow<FluentResource>,
{
    let bundle = scope.bundle;
    match bundle.get_entry_term(name) {
        Some(entry) => match attribute {
            Some(attr_name) => entry
                .attributes
                .iter()
                .find(|attr| &attr.id == attr_name)
                .map(|attr| &attr.value)
                .ok_or_else(|| {
                    ResolverError::UnknownAttribute(format!("-{}.{}", name, attr_name))
                }),
            None => entry
                .value
                .as_ref()
                .ok_or_else(|| ResolverError::NoValue(format!("-{}", name))),
        },
        None => Err(ResolverError::UnknownTerm(name.to_owned())),
    }
}

impl WriteValue for ast::Expression {
    fn write<'source, 'errors, W, R, M>(
        &'source self,
        w: &mut W,
        scope: &mut Scope<'source, 'errors, R, M>,
    ) -> fmt::Result
    where
        W: fmt::Write,
        R: Borrow<FluentResource>,
        M: MemoizerKind,
    {
        match self {
            Self::StringLiteral(_)
            | Self::NumberLiteral { .. }
            | Self::VariableReference { .. }
            | Self::FunctionCall { .. } => {
                let value = self.resolve(scope);
                value.write(w, scope)
            }

            Self::MessageReference { name, attribute } => {
                match message_pattern(scope, name, attribute.as_ref()) {
                    Ok(pattern) => scope.track(w, pattern, self),
                    Err(err) => scope.write_ref_error(w, err, self),
                }
            }

            Self::TermReference {
                name,
                attribute,
                arguments,
            } => {
                // Arguments are resolved in the calling scope; only then is
                // the parameter frame installed. Positional arguments are
                // not visible to terms.
                let (_, resolved_named_args) = scope.get_arguments(arguments);
                let previous_args = scope.local_args.replace(resolved_named_args);
                let result = match term_pattern(scope, name, attribute.as_ref()) {
                    Ok(pattern) => scope.track(w, pattern, self),
                    Err(err) => scope.write_ref_error(w, err, self),
                };
                scope.local_args = previous_args;
                result
            }

            Self::Select {
                selector,
                variants,
                star,
            } => {
                let selector = selector.resolve(scope);
                match selector {
                    FluentValue::String(_) | FluentValue::Number(_) => {
                        for variant in variants {
                            let key = variant.key.resolve(scope);
                            if key.matches(&selector, scope) {
                                return variant.value.write(w, scope);
                            }
                        }
                    }
                    // A failed selector falls back to the default variant.
                    _ => {}
                }

                match variants.get(*star) {
                    Some(variant) => variant.value.write(w, scope),
                    None => {
                        scope.add_error(ResolverError::NoDefault);
                        Ok(())
                    }
                }
            }
        }
    }

    fn write_error<W>(&self, w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match self {
            Self::VariableReference { name } => w.write_str(name),
            Self::MessageReference {
                name,
                attribute: Some(attribute),
            } => write!(w, "{}.{}", name, attribute),
            Self::MessageReference {
                name,
                attribute: None,
            } => w.write_str(name),
            Self::TermReference {
                name,
                attribute: Some(attribute),
                ..
            } => write!(w, "-{}.{}", name, attribute),
            Self::TermReference {
                name,
                attribute: None,
                ..
            } => write!(w, "-{}", name),
            Self::FunctionCall { name, .. } => write!(w, "{}()", name),
            Self::StringLiteral(_) | Self::NumberLiteral { .. } | Self::Select { .. } => {
                unreachable!("literals and select expressions cannot fail to resolve")
            }
        }
    }
}

impl ResolveValue for ast::Expression {
    fn resolve<'source, 'errors, R, M>(
        &'source self,
        scope: &mut Scope<'source, 'errors, R, M>,
    ) -> FluentValue<'source>
    where
        R: Borrow<FluentResource>,
        M: MemoizerKind,
    {
        match self {
            Self::StringLiteral(value) => value.as_str().into(),

            Self::NumberLiteral { value, precision } => FluentValue::Number(FluentNumber::new(
                *value,
                FluentNumberOptions {
                    minimum_fraction_digits: Some(*precision),
                    ..Default::default()
                },
            )),

            Self::VariableReference { name } => {
                let args = scope.local_args.as_ref().or(scope.args);
                if let Some(arg) = args.and_then(|args| args.get(name)) {
                    arg.clone()
                } else {
                    // Missing parameters inside a term frame stay silent;
                    // the term controls its own defaults through a select.
                    if scope.local_args.is_none() {
                        scope.add_error(ResolverError::UnknownVariable(name.clone()));
                    }
                    FluentValue::None(error_placeholder(self))
                }
            }

            Self::MessageReference { name, attribute } => {
                match message_pattern(scope, name, attribute.as_ref()) {
                    Ok(pattern) => scope.track_resolve(pattern, self),
                    Err(err) => {
                        scope.add_error(err);
                        FluentValue::None(error_placeholder(self))
                    }
                }
            }

            Self::TermReference {
                name,
                attribute,
                arguments,
            } => {
                let (_, resolved_named_args) = scope.get_arguments(arguments);
                let previous_args = scope.local_args.replace(resolved_named_args);
                let value = match term_pattern(scope, name, attribute.as_ref()) {
                    Ok(pattern) => scope.track_resolve(pattern, self),
                    Err(err) => {
                        scope.add_error(err);
                        FluentValue::None(error_placeholder(self))
                    }
                };
                scope.local_args = previous_args;
                value
            }

            Self::FunctionCall { name, arguments } => {
                let (resolved_positional_args, resolved_named_args) =
                    scope.get_arguments(arguments);

                if let Some(func) = scope.bundle.get_entry_function(name) {
                    return func(&resolved_positional_args, &resolved_named_args);
                }

                match name.as_str() {
                    "NUMBER" => builtins::number(&resolved_positional_args, &resolved_named_args),
                    "DATETIME" => {
                        builtins::datetime(&resolved_positional_args, &resolved_named_args)
                    }
                    _ => {
                        scope.add_error(ResolverError::UnknownFunction(name.clone()));
                        FluentValue::None(error_placeholder(self))
                    }
                }
            }

            Self::Select { .. } => {
                let mut result = String::new();
                match self.write(&mut result, scope) {
                    Ok(()) => FluentValue::String(result.into()),
                    Err(_) => FluentValue::None(Default::default()),
                }
            }
        }
    }
}

impl ResolveValue for ast::VariantKey {
    fn resolve<'source, 'errors, R, M>(
        &'source self,
        _scope: &mut Scope<'source, 'errors, R, M>,
    ) -> FluentValue<'source>
    where
        R: Borrow<FluentResource>,
        M: MemoizerKind,
    {
        match self {
            Self::Identifier(name) => name.as_str().into(),
            Self::NumberLiteral { value, precision } => FluentValue::Number(FluentNumber::new(
                *value,
                FluentNumberOptions {
                    minimum_fraction_digits: Some(*precision),
                    ..Default::default()
                },
            )),
        }
    }
}
