//! `FluentBundle` is a collection of localization messages in Fluent.
//!
//! It stores a list of messages in a single locale which can reference one
//! another, use the same internationalization formatters, functions,
//! environmental variables and are expected to be used together.

use std::borrow::{Borrow, Cow};
use std::collections::hash_map::Entry as HashEntry;
use std::default::Default;
use std::fmt;

use rustc_hash::FxHashMap;
use unic_langid::LanguageIdentifier;

use crate::args::FluentArgs;
use crate::ast;
use crate::entry::{Entry, FluentFunction, GetEntry};
use crate::errors::{EntryKind, FluentError};
use crate::memoizer::MemoizerKind;
use crate::message::FluentMessage;
use crate::resolver::{Scope, WriteValue};
use crate::resource::FluentResource;
use crate::types::{FluentNone, FluentValue};

/// A collection of localization messages for a single locale, which are
/// meant to be used together in a single view, widget or any other UI
/// abstraction.
///
/// The base struct is generic over the resource holder `R` (anything that
/// borrows as [`FluentResource`]: owned, `&`, `Rc`, `Arc`) and the
/// memoization kind `M`. Most users want the
/// [`FluentBundle`](crate::FluentBundle) alias over the single-threaded
/// memoizer, or [`concurrent::FluentBundle`](crate::concurrent::FluentBundle)
/// for a bundle shared across threads.
///
/// # Example
///
/// ```
/// use ftl_runtime::{FluentArgs, FluentBundle, FluentResource};
/// use unic_langid::langid;
///
/// let ftl_string = "intro = Welcome, { $name }.";
/// let resource = FluentResource::try_new(ftl_string)
///     .expect("Could not parse an FTL string.");
///
/// let langid_en = langid!("en-US");
/// let mut bundle = FluentBundle::new(vec![langid_en]);
/// bundle.add_resource(resource)
///     .expect("Failed to add FTL resources to the bundle.");
///
/// let mut args = FluentArgs::new();
/// args.set("name", "Rustacean");
///
/// let msg = bundle.get_message("intro").expect("Message doesn't exist.");
/// let mut errors = vec![];
/// let pattern = msg.value().expect("Message has no value.");
/// let value = bundle.format_pattern(pattern, Some(&args), &mut errors);
/// assert_eq!(value, "Welcome, \u{2068}Rustacean\u{2069}.");
/// ```
///
/// # `FluentBundle` Life Cycle
///
/// To create a bundle, call [`FluentBundleBase::new`] with a locale list
/// that represents the best possible fallback chain for a given locale.
/// The simplest case is a one-locale list.
///
/// Next, call [`add_resource`](FluentBundleBase::add_resource) one or more
/// times, supplying translations in the FTL syntax.
///
/// From that point on, the bundle is used to look up messages with
/// [`get_message`](FluentBundleBase::get_message) and format their patterns
/// with [`format_pattern`](FluentBundleBase::format_pattern). It is
/// recommended to treat the result as opaque from the perspective of the
/// program and use it only to display localized messages.
pub struct FluentBundleBase<R, M> {
    pub locales: Vec<LanguageIdentifier>,
    pub(crate) resources: Vec<R>,
    pub(crate) entries: FxHashMap<String, Entry>,
    pub(crate) intls: M,
    pub(crate) use_isolating: bool,
    pub(crate) transform: Option<fn(&str) -> Cow<str>>,
    pub(crate) formatter: Option<fn(&FluentValue, &M) -> Option<String>>,
}

impl<R, M: MemoizerKind> FluentBundleBase<R, M> {
    /// Constructs a FluentBundle. The first element in `locales` should be
    /// the language this bundle represents, and will be used to determine
    /// the correct plural rules for this bundle. You can optionally provide
    /// extra languages in the list; they will be used as fallback date and
    /// time formatters if a formatter for the primary language is
    /// unavailable.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle: FluentBundle<FluentResource> = FluentBundle::new(vec![langid_en]);
    /// ```
    pub fn new(locales: Vec<LanguageIdentifier>) -> Self {
        let first_locale = locales.first().cloned().unwrap_or_default();
        Self {
            locales,
            resources: vec![],
            entries: FxHashMap::default(),
            intls: M::new(first_locale),
            use_isolating: true,
            transform: None,
            formatter: None,
        }
    }

    /// Adds a resource to the bundle, returning an empty [`Result<T>`] on
    /// success.
    ///
    /// If any entry in the resource uses the same identifier as an already
    /// existing key in the bundle, the new entry will be ignored and a
    /// `FluentError::Overriding` will be added to the result. The other
    /// entries of the resource are still added.
    ///
    /// The method can take any type that can be borrowed to
    /// [`FluentResource`]:
    ///   - FluentResource
    ///   - &FluentResource
    ///   - Rc<FluentResource>
    ///   - Arc<FluentResource>
    ///
    /// This allows the user to introduce custom resource management and
    /// share resources between instances of `FluentBundle`.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("\nhello = Hi!\ngoodbye = Bye!\n")
    ///     .expect("Could not parse an FTL string.");
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    /// bundle.add_resource(resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    /// assert_eq!(true, bundle.has_message("hello"));
    /// ```
    ///
    /// # Whitespace
    ///
    /// Message ids must have no leading whitespace. Message values that
    /// span multiple lines must have leading whitespace on all but the
    /// first line. These are standard FTL syntax rules that may prove a bit
    /// troublesome in source code formatting. The [`indoc!`] crate can help
    /// with stripping extra indentation if you wish to indent your entire
    /// message.
    ///
    /// [FTL syntax]: https://projectfluent.org/fluent/guide/
    /// [`indoc!`]: https://github.com/dtolnay/indoc
    /// [`Result<T>`]: https://doc.rust-lang.org/std/result/enum.Result.html
    pub fn add_resource(&mut self, r: R) -> Result<(), Vec<FluentError>>
    where
        R: Borrow<FluentResource>,
    {
        let mut errors = vec![];

        let res = r.borrow();
        let res_pos = self.resources.len();

        for entry_pos in 0..res.len() {
            let entry = match res.get_entry(entry_pos) {
                Some(entry) => entry,
                None => continue,
            };

            let (bundle_entry, kind) = if entry.is_term() {
                (Entry::Term([res_pos, entry_pos]), EntryKind::Term)
            } else {
                (Entry::Message([res_pos, entry_pos]), EntryKind::Message)
            };

            match self.entries.entry(entry.id.clone()) {
                HashEntry::Vacant(empty) => {
                    empty.insert(bundle_entry);
                }
                HashEntry::Occupied(_) => {
                    errors.push(FluentError::Overriding {
                        kind,
                        id: entry.id.clone(),
                    });
                }
            }
        }
        self.resources.push(r);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Adds a resource to the bundle, overriding conflicting entries.
    ///
    /// If any entry in the resource uses the same identifier as an already
    /// existing key in the bundle, the entry will override the previous
    /// one.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("hello = Hi!")
    ///     .expect("Could not parse an FTL string.");
    /// let resource2 = FluentResource::try_new("hello = Another Hi!")
    ///     .expect("Could not parse an FTL string.");
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    /// bundle.add_resource(resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    ///
    /// bundle.add_resource_overriding(resource2);
    ///
    /// let mut errors = vec![];
    /// let msg = bundle.get_message("hello")
    ///     .expect("Failed to retrieve the message");
    /// let value = msg.value().expect("Failed to retrieve the value of the message");
    /// assert_eq!(bundle.format_pattern(value, None, &mut errors), "Another Hi!");
    /// ```
    pub fn add_resource_overriding(&mut self, r: R)
    where
        R: Borrow<FluentResource>,
    {
        let res = r.borrow();
        let res_pos = self.resources.len();

        for entry_pos in 0..res.len() {
            let entry = match res.get_entry(entry_pos) {
                Some(entry) => entry,
                None => continue,
            };

            let bundle_entry = if entry.is_term() {
                Entry::Term([res_pos, entry_pos])
            } else {
                Entry::Message([res_pos, entry_pos])
            };

            self.entries.insert(entry.id.clone(), bundle_entry);
        }
        self.resources.push(r);
    }

    /// When formatting patterns, `FluentBundle` inserts Unicode
    /// Directionality Isolation Marks to indicate that the direction of a
    /// placeable may differ from the surrounding message.
    ///
    /// This is important for cases such as when a right-to-left user name
    /// is presented in the left-to-right message.
    ///
    /// In some cases, such as testing, the user may want to disable the
    /// isolating.
    pub fn set_use_isolating(&mut self, value: bool) {
        self.use_isolating = value;
    }

    /// This method allows to specify a function that will be called on all
    /// textual fragments of the pattern during formatting.
    ///
    /// This is primarily used for pseudolocalization.
    pub fn set_transform(&mut self, func: Option<fn(&str) -> Cow<str>>) {
        self.transform = func;
    }

    /// This method allows to specify a function that will be called before
    /// any [`FluentValue`] is formatted, allowing overrides.
    ///
    /// It's particularly useful for plugging in a locale-faithful external
    /// formatter for [`FluentValue::Number`] and [`FluentValue::DateTime`].
    pub fn set_formatter(&mut self, func: Option<fn(&FluentValue, &M) -> Option<String>>) {
        self.formatter = func;
    }

    /// Returns true if this bundle contains a message with the given id.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("hello = Hi!")
    ///     .expect("Failed to parse an FTL string.");
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    /// bundle.add_resource(&resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    /// assert_eq!(true, bundle.has_message("hello"));
    /// ```
    pub fn has_message(&self, id: &str) -> bool
    where
        R: Borrow<FluentResource>,
    {
        self.get_entry_message(id).is_some()
    }

    /// Retrieves a [`FluentMessage`] from a bundle.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("hello-world = Hello World!")
    ///     .expect("Failed to parse an FTL string.");
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    ///
    /// bundle.add_resource(&resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    ///
    /// let msg = bundle.get_message("hello-world");
    /// assert_eq!(msg.is_some(), true);
    /// ```
    pub fn get_message(&self, id: &str) -> Option<FluentMessage>
    where
        R: Borrow<FluentResource>,
    {
        self.get_entry_message(id).map(FluentMessage::new)
    }

    /// Writes a formatted pattern which comes from a [`FluentMessage`] into
    /// any [`fmt::Write`] sink.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("hello-world = Hello World!")
    ///     .expect("Failed to parse an FTL string.");
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    ///
    /// bundle.add_resource(&resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    ///
    /// let msg = bundle.get_message("hello-world")
    ///     .expect("Failed to retrieve a FluentMessage.");
    ///
    /// let pattern = msg.value()
    ///     .expect("Missing Value.");
    /// let mut errors = vec![];
    ///
    /// let mut s = String::new();
    /// bundle.write_pattern(&mut s, pattern, None, &mut errors)
    ///     .expect("Failed to write.");
    ///
    /// assert_eq!(s, "Hello World!");
    /// ```
    pub fn write_pattern<'bundle, W>(
        &'bundle self,
        w: &mut W,
        pattern: &'bundle ast::Pattern,
        args: Option<&'bundle FluentArgs>,
        errors: &mut Vec<FluentError>,
    ) -> fmt::Result
    where
        R: Borrow<FluentResource>,
        W: fmt::Write,
    {
        let mut scope = Scope::new(self, args, Some(errors));
        pattern.write(w, &mut scope)
    }

    /// Formats a pattern which comes from a [`FluentMessage`].
    ///
    /// Non-fatal resolution failures are appended to `errors` and leave a
    /// visible `{placeholder}` in the output. Exceeding the placeable
    /// budget is fatal: the partial output is discarded and the rendering
    /// of the `None` value is returned instead.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new("hello-world = Hello World!")
    ///     .expect("Failed to parse an FTL string.");
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    ///
    /// bundle.add_resource(&resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    ///
    /// let msg = bundle.get_message("hello-world")
    ///     .expect("Failed to retrieve a FluentMessage.");
    ///
    /// let pattern = msg.value()
    ///     .expect("Missing Value.");
    /// let mut errors = vec![];
    ///
    /// let result = bundle.format_pattern(pattern, None, &mut errors);
    ///
    /// assert_eq!(result, "Hello World!");
    /// ```
    pub fn format_pattern<'bundle>(
        &'bundle self,
        pattern: &'bundle ast::Pattern,
        args: Option<&'bundle FluentArgs>,
        errors: &mut Vec<FluentError>,
    ) -> Cow<'bundle, str>
    where
        R: Borrow<FluentResource>,
    {
        match pattern {
            ast::Pattern::Simple(value) => match self.transform {
                Some(transform) => transform(value),
                None => value.as_str().into(),
            },
            ast::Pattern::Complex(_) => {
                let mut scope = Scope::new(self, args, Some(errors));
                let mut result = String::new();
                if pattern.write(&mut result, &mut scope).is_err() || scope.dirty {
                    return FluentNone::default().as_string();
                }
                result.into()
            }
        }
    }

    /// Makes the provided rust function available to messages with the
    /// name `id`. See the [FTL syntax guide] to learn how these are used
    /// in messages.
    ///
    /// FTL functions accept both positional and named args. The rust
    /// function you provide therefore has two parameters: a slice of
    /// values for the positional args, and a [`FluentArgs`] for named
    /// args.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::{FluentBundle, FluentResource, FluentValue};
    /// use unic_langid::langid;
    ///
    /// let resource = FluentResource::try_new(r#"length = { STRLEN("12345") }"#)
    ///     .expect("Could not parse an FTL string.");
    /// let langid_en = langid!("en-US");
    /// let mut bundle = FluentBundle::new(vec![langid_en]);
    /// bundle.add_resource(&resource)
    ///     .expect("Failed to add FTL resources to the bundle.");
    ///
    /// // Register a fn that maps from string to string length
    /// bundle.add_function("STRLEN", |positional, _named| match positional {
    ///     [FluentValue::String(str)] => str.len().into(),
    ///     _ => FluentValue::None(Default::default()),
    /// }).expect("Failed to add a function to the bundle.");
    ///
    /// let msg = bundle.get_message("length").expect("Message doesn't exist.");
    /// let mut errors = vec![];
    /// let pattern = msg.value().expect("Message has no value.");
    /// let value = bundle.format_pattern(pattern, None, &mut errors);
    /// assert_eq!(&value, "5");
    /// ```
    ///
    /// [FTL syntax guide]: https://projectfluent.org/fluent/guide/functions.html
    pub fn add_function<F>(&mut self, id: &str, func: F) -> Result<(), FluentError>
    where
        F: for<'a> Fn(&[FluentValue<'a>], &FluentArgs) -> FluentValue<'a> + Sync + Send + 'static,
    {
        match self.entries.entry(id.to_owned()) {
            HashEntry::Vacant(entry) => {
                entry.insert(Entry::Function(Box::new(func) as FluentFunction));
                Ok(())
            }
            HashEntry::Occupied(_) => Err(FluentError::Overriding {
                kind: EntryKind::Function,
                id: id.to_owned(),
            }),
        }
    }
}

impl<R, M: MemoizerKind> Default for FluentBundleBase<R, M> {
    fn default() -> Self {
        Self::new(vec![LanguageIdentifier::default()])
    }
}
