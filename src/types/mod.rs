//! Runtime value types produced and consumed during pattern resolution.
//!
//! Values reach the resolver as caller arguments, get produced by literals
//! and functions, and are rendered to strings at the end of resolution. The
//! set is closed: strings, numbers, date-times, and the `None` sentinel that
//! stands in for failed lookups.

mod datetime;
mod number;
mod plural;

pub use datetime::*;
pub use number::*;
use plural::PluralRules;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use intl_pluralrules::{PluralCategory, PluralRuleType};

use crate::memoizer::MemoizerKind;
use crate::resolver::Scope;

/// A sentinel standing in for a value that could not be resolved.
///
/// The placeholder names what failed (`name`, `name.attr`, `NAME()`); the
/// rendering wraps it in braces to keep the failure visible in the output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FluentNone {
    placeholder: Option<String>,
}

impl FluentNone {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
        }
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("???")
    }

    pub fn as_string(&self) -> Cow<'static, str> {
        self.to_string().into()
    }
}

impl fmt::Display for FluentNone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.placeholder())
    }
}

/// The `FluentValue` enum represents values which can be formatted to a
/// string.
///
/// Those values are either passed as arguments to
/// [`format_pattern`](crate::bundle::FluentBundleBase::format_pattern),
/// produced by functions, or generated in the process of pattern
/// resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FluentValue<'source> {
    String(Cow<'source, str>),
    Number(FluentNumber),
    DateTime(FluentDateTime),
    None(FluentNone),
}

impl<'source> FluentValue<'source> {
    /// Parses `v` as a number, falling back to a string value when it is
    /// not one.
    pub fn try_number<S: ToString>(v: S) -> Self {
        let s = v.to_string();
        if let Ok(num) = FluentNumber::from_str(&s) {
            num.into()
        } else {
            s.into()
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None(_))
    }

    /// Decides whether `self`, a variant key, matches the `selector` of a
    /// select expression.
    ///
    /// Strings match by equality. Numbers match by numeric value alone;
    /// formatting options are not compared. A string key matches a number
    /// selector when it names the selector's plural category for the
    /// bundle's locale.
    pub fn matches<R, M: MemoizerKind>(
        &self,
        selector: &FluentValue,
        scope: &Scope<R, M>,
    ) -> bool {
        match (self, selector) {
            (FluentValue::String(a), FluentValue::String(b)) => a == b,
            (FluentValue::Number(a), FluentValue::Number(b)) => a.value == b.value,
            (FluentValue::String(a), FluentValue::Number(b)) => {
                let category = match a.as_ref() {
                    "zero" => PluralCategory::ZERO,
                    "one" => PluralCategory::ONE,
                    "two" => PluralCategory::TWO,
                    "few" => PluralCategory::FEW,
                    "many" => PluralCategory::MANY,
                    "other" => PluralCategory::OTHER,
                    _ => return false,
                };
                scope
                    .bundle
                    .intls
                    .with_try_get_threadsafe::<PluralRules, _, _>(
                        (PluralRuleType::CARDINAL,),
                        |pr| pr.0.select(b.value) == Ok(category),
                    )
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    pub fn write<W, R, M>(&self, w: &mut W, scope: &Scope<R, M>) -> fmt::Result
    where
        W: fmt::Write,
        M: MemoizerKind,
    {
        if let Some(formatter) = &scope.bundle.formatter {
            if let Some(val) = formatter(self, &scope.bundle.intls) {
                return w.write_str(&val);
            }
        }
        match self {
            FluentValue::String(s) => w.write_str(s),
            FluentValue::Number(n) => w.write_str(&n.as_string()),
            FluentValue::DateTime(d) => w.write_str(&d.as_string()),
            FluentValue::None(n) => write!(w, "{}", n),
        }
    }

    pub fn as_string<R, M: MemoizerKind>(&self, scope: &Scope<R, M>) -> Cow<'source, str> {
        if let Some(formatter) = &scope.bundle.formatter {
            if let Some(val) = formatter(self, &scope.bundle.intls) {
                return val.into();
            }
        }
        match self {
            FluentValue::String(s) => s.clone(),
            FluentValue::Number(n) => n.as_string(),
            FluentValue::DateTime(d) => d.as_string(),
            FluentValue::None(n) => n.as_string(),
        }
    }
}

impl<'source> From<String> for FluentValue<'source> {
    fn from(s: String) -> Self {
        FluentValue::String(s.into())
    }
}

impl<'source> From<&'source String> for FluentValue<'source> {
    fn from(s: &'source String) -> Self {
        FluentValue::String(s.as_str().into())
    }
}

impl<'source> From<&'source str> for FluentValue<'source> {
    fn from(s: &'source str) -> Self {
        FluentValue::String(s.into())
    }
}

impl<'source> From<Cow<'source, str>> for FluentValue<'source> {
    fn from(s: Cow<'source, str>) -> Self {
        FluentValue::String(s)
    }
}

impl<'source, T> From<Option<T>> for FluentValue<'source>
where
    T: Into<FluentValue<'source>>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => FluentValue::None(FluentNone::default()),
        }
    }
}
