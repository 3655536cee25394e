use crate::ast;
use crate::parser::{self, ParserError};

/// A resource containing a list of localization messages.
///
/// [`FluentResource`] wraps the list of entries parsed from a Fluent source
/// string. Resources are added to a bundle, which indexes their messages and
/// terms by id.
///
/// # Example
///
/// ```
/// use ftl_runtime::FluentResource;
///
/// let resource = FluentResource::try_new("hello = Hi!")
///     .expect("Failed to parse an FTL string.");
/// assert_eq!(resource.entries().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FluentResource {
    entries: Vec<ast::Entry>,
}

impl FluentResource {
    /// Parses `source` and constructs a new [`FluentResource`].
    ///
    /// Entries that fail to parse are skipped. When that happens the
    /// partially populated resource is returned together with one
    /// [`ParserError`] per skipped entry.
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::FluentResource;
    ///
    /// let (resource, errors) = FluentResource::try_new("key = Value\nbroken = {")
    ///     .unwrap_err();
    /// assert_eq!(resource.entries().count(), 1);
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn try_new(source: &str) -> Result<Self, (Self, Vec<ParserError>)> {
        let (entries, errors) = parser::parse(source);
        let resource = Self { entries };
        if errors.is_empty() {
            Ok(resource)
        } else {
            Err((resource, errors))
        }
    }

    /// Returns an iterator over the entries of the resource, in source
    /// order.
    pub fn entries(&self) -> impl Iterator<Item = &ast::Entry> {
        self.entries.iter()
    }

    pub(crate) fn get_entry(&self, pos: usize) -> Option<&ast::Entry> {
        self.entries.get(pos)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
