//! A localization runtime for the Fluent syntax.
//!
//! This crate parses Fluent (FTL) resources and formats their message
//! patterns to strings for a target locale, with variable interpolation,
//! message and term references, parameterized terms, select expressions
//! with plural-rule selectors, and callable functions (built-in
//! `NUMBER`/`DATETIME` plus user-provided ones).
//!
//! # Usage
//!
//! The central types are [`FluentBundle`] and [`FluentResource`]. A
//! resource holds the entries parsed from a single FTL source; a bundle
//! indexes the messages and terms of one or more resources for a locale
//! fallback chain and formats their patterns against caller-supplied
//! [`FluentArgs`].
//!
//! ```
//! use ftl_runtime::{FluentArgs, FluentBundle, FluentResource};
//! use unic_langid::langid;
//!
//! let ftl_string = r#"
//! hello-world = Hello, world!
//! intro = Welcome, { $name }.
//! "#;
//! let resource = FluentResource::try_new(ftl_string)
//!     .expect("Failed to parse an FTL string.");
//!
//! let langid_en = langid!("en-US");
//! let mut bundle = FluentBundle::new(vec![langid_en]);
//!
//! bundle.add_resource(resource)
//!     .expect("Failed to add FTL resources to the bundle.");
//!
//! let msg = bundle.get_message("hello-world")
//!     .expect("Message doesn't exist.");
//! let mut errors = vec![];
//! let pattern = msg.value()
//!     .expect("Message has no value.");
//! let value = bundle.format_pattern(pattern, None, &mut errors);
//! assert_eq!(&value, "Hello, world!");
//!
//! let mut args = FluentArgs::new();
//! args.set("name", "John");
//!
//! let msg = bundle.get_message("intro")
//!     .expect("Message doesn't exist.");
//! let mut errors = vec![];
//! let pattern = msg.value()
//!     .expect("Message has no value.");
//! let value = bundle.format_pattern(pattern, Some(&args), &mut errors);
//!
//! // The placeable is wrapped in Unicode directionality isolation marks.
//! assert_eq!(&value, "Welcome, \u{2068}John\u{2069}.");
//! ```
//!
//! # Error reporting
//!
//! Formatting never gives up on the whole message because one piece of it
//! failed. A failed lookup is reported through the `errors` argument and
//! leaves a visible `{placeholder}` in the output, so that the user still
//! sees the rest of the translation. The two hard limits, reference cycles
//! and the per-call placeable budget, are the only things that abort a
//! pattern.

pub mod ast;
mod args;
pub mod builtins;
pub mod bundle;
pub mod concurrent;
mod entry;
mod errors;
pub mod memoizer;
mod message;
pub mod parser;
pub mod resolver;
mod resource;
pub mod types;

pub use args::FluentArgs;
pub use errors::{EntryKind, FluentError};
pub use message::{FluentAttribute, FluentMessage};
pub use parser::ParserError;
pub use resource::FluentResource;
pub use types::FluentValue;

/// A [`FluentBundleBase`](bundle::FluentBundleBase) over the
/// single-threaded [`IntlLangMemoizer`](intl_memoizer::IntlLangMemoizer).
pub type FluentBundle<R = FluentResource> =
    bundle::FluentBundleBase<R, intl_memoizer::IntlLangMemoizer>;
