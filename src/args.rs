use std::borrow::Cow;

use crate::types::FluentValue;

/// A map of arguments passed from the caller to the resolver, and between
/// the resolver and a parameterized term.
///
/// The storage is a vector sorted by key, which keeps lookups cheap for the
/// handful of arguments a message realistically takes.
///
/// # Example
///
/// ```
/// use ftl_runtime::{FluentArgs, FluentBundle, FluentResource};
/// use unic_langid::langid;
///
/// let mut args = FluentArgs::new();
/// args.set("user", "John");
/// args.set("emailCount", 5);
///
/// let resource = FluentResource::try_new(r#"welcome = Hello, { $user }. You have { $emailCount } messages."#)
///     .expect("Failed to parse an FTL string.");
///
/// let mut bundle = FluentBundle::new(vec![langid!("en")]);
/// bundle.set_use_isolating(false);
/// bundle.add_resource(resource)
///     .expect("Failed to add FTL resources to the bundle.");
///
/// let msg = bundle.get_message("welcome").expect("Message doesn't exist.");
/// let mut errors = vec![];
/// let value = bundle.format_pattern(msg.value().unwrap(), Some(&args), &mut errors);
/// assert_eq!(value, "Hello, John. You have 5 messages.");
/// ```
#[derive(Debug, Default)]
pub struct FluentArgs<'args>(Vec<(Cow<'args, str>, FluentValue<'args>)>);

impl<'args> FluentArgs<'args> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn get(&self, key: &str) -> Option<&FluentValue<'args>> {
        match self.0.binary_search_by_key(&key, |(k, _)| k.as_ref()) {
            Ok(idx) => Some(&self.0[idx].1),
            Err(_) => None,
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Cow<'args, str>>,
        V: Into<FluentValue<'args>>,
    {
        let key = key.into();
        match self.0.binary_search_by_key(&key.as_ref(), |(k, _)| k.as_ref()) {
            Ok(idx) => self.0[idx] = (key, value.into()),
            Err(idx) => self.0.insert(idx, (key, value.into())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FluentValue)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

impl<'args, K, V> FromIterator<(K, V)> for FluentArgs<'args>
where
    K: Into<Cow<'args, str>>,
    V: Into<FluentValue<'args>>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = iter.into_iter();
        let mut args = Self::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            args.set(k, v);
        }
        args
    }
}

impl<'args> IntoIterator for FluentArgs<'args> {
    type Item = (Cow<'args, str>, FluentValue<'args>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
