use std::borrow::Borrow;
use std::fmt;

use crate::ast;
use crate::memoizer::MemoizerKind;
use crate::resolver::{ResolverError, Scope, WriteValue, MAX_PLACEABLES};
use crate::resource::FluentResource;

/// Unicode bidi isolation characters.
const FSI: char = '\u{2068}';
const PDI: char = '\u{2069}';

impl WriteValue for ast::Pattern {
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
            Self::Simple(value) => match scope.bundle.transform {
                Some(transform) => w.write_str(&transform(value)),
                None => w.write_str(value),
            },
            Self::Complex(elements) => {
                let use_isolating = scope.bundle.use_isolating && elements.len() > 1;

                for element in elements {
                    if scope.dirty {
                        return Ok(());
                    }

                    match element {
                        ast::PatternElement::Text(value) => match scope.bundle.transform {
                            Some(transform) => w.write_str(&transform(value))?,
                            None => w.write_str(value)?,
                        },
                        ast::PatternElement::Placeable(expression) => {
                            scope.placeables += 1;
                            if scope.placeables > MAX_PLACEABLES {
                                scope.dirty = true;
                                scope.add_error(ResolverError::TooManyPlaceables);
                                return Ok(());
                            }

                            if use_isolating {
                                w.write_char(FSI)?;
                            }
                            scope.maybe_track(w, self, expression)?;
                            if use_isolating {
                                w.write_char(PDI)?;
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn write_error<W>(&self, _w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        unreachable!("patterns are never rendered as error placeholders")
    }
}
