//! The `NUMBER` and `DATETIME` functions available to every bundle.
//!
//! Both take one positional argument and re-wrap it with the named options
//! merged over the options the value already carries. They are consulted as
//! a fallback after the functions registered on the bundle, so a bundle may
//! shadow either with its own implementation.

use crate::args::FluentArgs;
use crate::types::{FluentDateTime, FluentNone, FluentNumber, FluentValue};

use std::str::FromStr;

/// `NUMBER()`: coerces its argument to a formatted number.
pub fn number<'a>(positional: &[FluentValue<'a>], named: &FluentArgs) -> FluentValue<'a> {
    match positional.first() {
        Some(FluentValue::Number(n)) => {
            let mut n = n.clone();
            n.options.merge(named);
            FluentValue::Number(n)
        }
        Some(FluentValue::String(s)) => match FluentNumber::from_str(s.as_ref()) {
            Ok(mut n) => {
                n.options.merge(named);
                FluentValue::Number(n)
            }
            Err(_) => FluentValue::None(FluentNone::new("NUMBER()")),
        },
        Some(FluentValue::None(n)) => {
            FluentValue::None(FluentNone::new(format!("NUMBER({})", n.placeholder())))
        }
        _ => FluentValue::None(FluentNone::new("NUMBER()")),
    }
}

/// `DATETIME()`: coerces its argument to a formatted date-time. Numbers are
/// read as milliseconds since the Unix epoch.
pub fn datetime<'a>(positional: &[FluentValue<'a>], named: &FluentArgs) -> FluentValue<'a> {
    match positional.first() {
        Some(FluentValue::DateTime(dt)) => {
            let mut dt = dt.clone();
            dt.options.merge(named);
            FluentValue::DateTime(dt)
        }
        Some(FluentValue::Number(n)) => {
            let mut dt = FluentDateTime::new(n.value, Default::default());
            dt.options.merge(named);
            FluentValue::DateTime(dt)
        }
        Some(FluentValue::None(n)) => {
            FluentValue::None(FluentNone::new(format!("DATETIME({})", n.placeholder())))
        }
        _ => FluentValue::None(FluentNone::new("DATETIME()")),
    }
}
