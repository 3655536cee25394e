use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::args::FluentArgs;
use crate::types::FluentValue;

/// Formatting width for the date and time portions of a rendered value,
/// after ECMA-402 `DateTimeFormat` `dateStyle`/`timeStyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FluentDateTimeStyle {
    Full,
    Long,
    Medium,
    Short,
    #[default]
    None,
}

impl From<&str> for FluentDateTimeStyle {
    fn from(input: &str) -> Self {
        match input {
            "full" => Self::Full,
            "long" => Self::Long,
            "medium" => Self::Medium,
            "short" => Self::Short,
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FluentDateTimeOptions {
    pub date_style: FluentDateTimeStyle,
    pub time_style: FluentDateTimeStyle,
}

impl FluentDateTimeOptions {
    pub fn merge(&mut self, opts: &FluentArgs) {
        for (key, value) in opts.iter() {
            match (key, value) {
                ("dateStyle", FluentValue::String(n)) => {
                    self.date_style = n.as_ref().into();
                }
                ("timeStyle", FluentValue::String(n)) => {
                    self.time_style = n.as_ref().into();
                }
                _ => {}
            }
        }
    }
}

/// A date-time value carried as milliseconds since the Unix epoch, with its
/// formatting options.
///
/// Rendering is UTC and ISO-flavored. Matching the output of any particular
/// national formatting library is a non-goal; callers who need
/// locale-faithful dates plug in a formatter through the bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentDateTime {
    pub value: f64,
    pub options: FluentDateTimeOptions,
}

impl FluentDateTime {
    pub const fn new(value: f64, options: FluentDateTimeOptions) -> Self {
        Self { value, options }
    }

    pub fn as_string(&self) -> Cow<'static, str> {
        match DateTime::<Utc>::from_timestamp_millis(self.value as i64) {
            Some(dt) => {
                let date = match self.options.date_style {
                    FluentDateTimeStyle::Full | FluentDateTimeStyle::Long => {
                        Some(dt.format("%A, %Y-%m-%d"))
                    }
                    FluentDateTimeStyle::Medium => Some(dt.format("%Y-%m-%d")),
                    FluentDateTimeStyle::Short => Some(dt.format("%y-%m-%d")),
                    FluentDateTimeStyle::None => None,
                };
                let time = match self.options.time_style {
                    FluentDateTimeStyle::Full | FluentDateTimeStyle::Long => {
                        Some(dt.format("%H:%M:%S %Z"))
                    }
                    FluentDateTimeStyle::Medium => Some(dt.format("%H:%M:%S")),
                    FluentDateTimeStyle::Short => Some(dt.format("%H:%M")),
                    FluentDateTimeStyle::None => None,
                };
                match (date, time) {
                    (Some(date), Some(time)) => format!("{} {}", date, time).into(),
                    (Some(date), None) => date.to_string().into(),
                    (None, Some(time)) => time.to_string().into(),
                    // No styles requested: the date portion alone.
                    (None, None) => dt.format("%Y-%m-%d").to_string().into(),
                }
            }
            None => self.value.to_string().into(),
        }
    }
}

impl<'l> From<FluentDateTime> for FluentValue<'l> {
    fn from(input: FluentDateTime) -> Self {
        FluentValue::DateTime(input)
    }
}

impl From<SystemTime> for FluentDateTime {
    fn from(input: SystemTime) -> Self {
        let millis = match input.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as f64,
            Err(e) => -(e.duration().as_millis() as f64),
        };
        Self::new(millis, Default::default())
    }
}

impl From<SystemTime> for FluentValue<'_> {
    fn from(input: SystemTime) -> Self {
        FluentValue::DateTime(input.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_renders_date_only() {
        // 2011-10-05T14:48:00.000Z
        let dt = FluentDateTime::new(1317826080000.0, Default::default());
        assert_eq!(dt.as_string(), "2011-10-05");
    }

    #[test]
    fn time_style_appends_clock() {
        let mut options = FluentDateTimeOptions::default();
        options.date_style = FluentDateTimeStyle::Medium;
        options.time_style = FluentDateTimeStyle::Short;
        let dt = FluentDateTime::new(1317826080000.0, options);
        assert_eq!(dt.as_string(), "2011-10-05 14:48");
    }
}
