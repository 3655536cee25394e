use crate::ast;

/// A read-only view of a message entry retrieved from a bundle.
///
/// The view borrows the patterns owned by the bundle's resources; they are
/// passed back to
/// [`format_pattern`](crate::bundle::FluentBundleBase::format_pattern) for
/// formatting.
#[derive(Debug)]
pub struct FluentMessage<'m> {
    value: Option<&'m ast::Pattern>,
    attributes: Vec<FluentAttribute<'m>>,
}

impl<'m> FluentMessage<'m> {
    pub(crate) fn new(entry: &'m ast::Entry) -> Self {
        Self {
            value: entry.value.as_ref(),
            attributes: entry.attributes.iter().map(FluentAttribute::new).collect(),
        }
    }

    pub fn value(&self) -> Option<&'m ast::Pattern> {
        self.value
    }

    pub fn attributes(&self) -> impl Iterator<Item = &FluentAttribute<'m>> {
        self.attributes.iter()
    }

    pub fn get_attribute(&self, key: &str) -> Option<&FluentAttribute<'m>> {
        self.attributes.iter().find(|attr| attr.id == key)
    }
}

/// A single attribute of a [`FluentMessage`].
#[derive(Debug)]
pub struct FluentAttribute<'m> {
    id: &'m str,
    value: &'m ast::Pattern,
}

impl<'m> FluentAttribute<'m> {
    fn new(attr: &'m ast::Attribute) -> Self {
        Self {
            id: &attr.id,
            value: &attr.value,
        }
    }

    pub fn id(&self) -> &'m str {
        self.id
    }

    pub fn value(&self) -> &'m ast::Pattern {
        self.value
    }
}
