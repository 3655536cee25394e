//! `Entry` is the bundle-side index record for messages, terms and
//! functions.

use std::borrow::Borrow;

use crate::args::FluentArgs;
use crate::ast;
use crate::bundle::FluentBundleBase;
use crate::resource::FluentResource;
use crate::types::FluentValue;

pub type FluentFunction =
    Box<dyn for<'a> Fn(&[FluentValue<'a>], &FluentArgs) -> FluentValue<'a> + Send + Sync>;

/// Messages and terms are stored as `[resource index, entry index]`
/// positions into the bundle's resource list; functions are owned directly.
pub enum Entry {
    Message([usize; 2]),
    Term([usize; 2]),
    Function(FluentFunction),
}

pub trait GetEntry {
    /// Looks up a message by its id.
    fn get_entry_message(&self, id: &str) -> Option<&ast::Entry>;

    /// Looks up a term. `id` excludes the `-` sigil.
    fn get_entry_term(&self, id: &str) -> Option<&ast::Entry>;

    fn get_entry_function(&self, id: &str) -> Option<&FluentFunction>;
}

impl<R: Borrow<FluentResource>, M> GetEntry for FluentBundleBase<R, M> {
    fn get_entry_message(&self, id: &str) -> Option<&ast::Entry> {
        self.entries.get(id).and_then(|entry| match *entry {
            Entry::Message(pos) => {
                let res = self.resources.get(pos[0])?.borrow();
                res.get_entry(pos[1])
            }
            _ => None,
        })
    }

    fn get_entry_term(&self, id: &str) -> Option<&ast::Entry> {
        let key = format!("-{}", id);
        self.entries.get(&key).and_then(|entry| match *entry {
            Entry::Term(pos) => {
                let res = self.resources.get(pos[0])?.borrow();
                res.get_entry(pos[1])
            }
            _ => None,
        })
    }

    fn get_entry_function(&self, id: &str) -> Option<&FluentFunction> {
        self.entries.get(id).and_then(|entry| match entry {
            Entry::Function(function) => Some(function),
            _ => None,
        })
    }
}
