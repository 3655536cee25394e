//! A cursor-driven parser for the Fluent runtime syntax.
//!
//! The parser scans the source for message-start lines and parses each entry
//! into the runtime AST. Anything between entries that does not parse is
//! skipped: the scan resumes at the next line that looks like a message
//! start, and the failure is reported through the returned error list.
//!
//! All scanning is forward-only. Every `consume_*` helper either consumes its
//! whole token or leaves the cursor untouched, which is the only lookahead
//! the grammar needs.

use thiserror::Error;

use crate::ast;

/// Per-pattern limit on placeables, to prevent quadratic blowup through
/// reference expansion.
pub const MAX_PLACEABLES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("expected message value or attributes")]
    ExpectedMessageField,
    #[error("expected attribute value")]
    ExpectedAttributeValue,
    #[error("expected variant value")]
    ExpectedVariantValue,
    #[error("expected variant key")]
    ExpectedVariantKey,
    #[error("expected at least one variant")]
    MissingVariants,
    #[error("expected \"*\" default variant")]
    MissingDefaultVariant,
    #[error("only one variant can be marked as default")]
    MultipleDefaultVariants,
    #[error("expected token: \"{0}\"")]
    ExpectedToken(char),
    #[error("invalid expression")]
    InvalidExpression,
    #[error("function names must be all upper-case")]
    ForbiddenCallee,
    #[error("too many placeables")]
    TooManyPlaceables,
    #[error("unbalanced closing brace")]
    UnbalancedClosingBrace,
    #[error("unclosed placeable")]
    UnclosedPlaceable,
    #[error("unclosed argument list")]
    UnclosedArgumentList,
    #[error("unclosed string literal")]
    UnclosedStringLiteral,
    #[error("unknown escape sequence")]
    UnknownEscapeSequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at offset {pos}: {kind}")]
pub struct ParserError {
    pub pos: usize,
    pub kind: ErrorKind,
}

type Result<T> = std::result::Result<T, ParserError>;

/// Parses a complete resource, returning every entry that parsed cleanly and
/// one error per entry that did not.
pub fn parse(source: &str) -> (Vec<ast::Entry>, Vec<ParserError>) {
    let mut parser = Parser::new(source);
    let mut entries = vec![];
    let mut errors = vec![];

    while let Some(id) = parser.next_entry_start() {
        let after_header = parser.ptr;
        match parser.parse_message(id) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                errors.push(err);
                // The failed entry is junk. Resume scanning right after its
                // `id =` header so that its body lines are still searched
                // for the next entry start.
                parser.ptr = after_header;
            }
        }
    }

    (entries, errors)
}

/// A run of blank source recorded while parsing a multi-line pattern. The
/// value has CR LF pairs normalized to LF and spaces preceding a line break
/// folded into it; `length` measures the trailing space run, which is the
/// indent of the line that follows.
struct Indent {
    value: String,
    length: usize,
}

/// Pattern elements before indent lowering.
enum RawElement {
    Text(String),
    Indent(Indent),
    Placeable(ast::Expression),
}

struct Parser<'s> {
    source: &'s str,
    length: usize,
    ptr: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            length: source.len(),
            ptr: 0,
        }
    }

    fn error(&self, kind: ErrorKind) -> ParserError {
        ParserError {
            pos: self.ptr,
            kind,
        }
    }

    // --- cursor primitives -------------------------------------------------

    fn get_current_byte(&self) -> Option<&u8> {
        self.source.as_bytes().get(self.ptr)
    }

    fn is_current_byte(&self, b: u8) -> bool {
        self.get_current_byte() == Some(&b)
    }

    fn take_byte_if(&mut self, b: u8) -> bool {
        if self.is_current_byte(b) {
            self.ptr += 1;
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        while self.is_current_byte(b' ') {
            self.ptr += 1;
        }
    }

    fn skip_blank(&mut self) {
        while let Some(b) = self.get_current_byte() {
            if b.is_ascii_whitespace() {
                self.ptr += 1;
            } else {
                break;
            }
        }
    }

    // --- tokens ------------------------------------------------------------
    //
    // Tokens swallow the blank around their delimiter. The `consume_*`
    // variants restore the cursor on a miss; the `expect_*` variants error.

    fn expect_brace_open(&mut self) -> Result<()> {
        if self.take_byte_if(b'{') {
            self.skip_blank();
            Ok(())
        } else {
            Err(self.error(ErrorKind::ExpectedToken('{')))
        }
    }

    fn consume_brace_close(&mut self) -> bool {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b'}') {
            true
        } else {
            self.ptr = start;
            false
        }
    }

    fn expect_brace_close(&mut self) -> Result<()> {
        if self.consume_brace_close() {
            Ok(())
        } else {
            Err(self.error(ErrorKind::ExpectedToken('}')))
        }
    }

    fn expect_bracket_open(&mut self) -> Result<()> {
        if self.take_byte_if(b'[') {
            self.skip_blank();
            Ok(())
        } else {
            Err(self.error(ErrorKind::ExpectedToken('[')))
        }
    }

    fn expect_bracket_close(&mut self) -> Result<()> {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b']') {
            self.skip_spaces();
            Ok(())
        } else {
            self.ptr = start;
            Err(self.error(ErrorKind::ExpectedToken(']')))
        }
    }

    fn consume_arrow(&mut self) -> bool {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b'-') && self.take_byte_if(b'>') {
            self.skip_blank();
            true
        } else {
            self.ptr = start;
            false
        }
    }

    fn consume_paren_open(&mut self) -> bool {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b'(') {
            self.skip_blank();
            true
        } else {
            self.ptr = start;
            false
        }
    }

    fn consume_colon(&mut self) -> bool {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b':') {
            self.skip_blank();
            true
        } else {
            self.ptr = start;
            false
        }
    }

    fn consume_comma(&mut self) -> bool {
        let start = self.ptr;
        self.skip_blank();
        if self.take_byte_if(b',') {
            self.skip_blank();
            true
        } else {
            self.ptr = start;
            false
        }
    }

    // --- scanners ----------------------------------------------------------

    /// A run of literal text on the current line: `[^{}\n\r]+`.
    fn text_run(&mut self) -> Option<&'s str> {
        let source = self.source;
        let start = self.ptr;
        while let Some(b) = self.get_current_byte() {
            match b {
                b'{' | b'}' | b'\n' | b'\r' => break,
                _ => self.ptr += 1,
            }
        }
        if self.ptr > start {
            Some(&source[start..self.ptr])
        } else {
            None
        }
    }

    /// `[a-zA-Z][a-zA-Z0-9_-]*`.
    fn identifier(&mut self) -> Option<&'s str> {
        let source = self.source;
        let start = self.ptr;
        match self.get_current_byte() {
            Some(b) if b.is_ascii_alphabetic() => self.ptr += 1,
            _ => return None,
        }
        while let Some(b) = self.get_current_byte() {
            if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-' {
                self.ptr += 1;
            } else {
                break;
            }
        }
        Some(&source[start..self.ptr])
    }

    /// `([$-])?identifier(.identifier)?` with three captures.
    fn reference(&mut self) -> Option<(Option<u8>, &'s str, Option<&'s str>)> {
        let start = self.ptr;
        let sigil = match self.get_current_byte() {
            Some(b @ (b'$' | b'-')) => {
                let b = *b;
                self.ptr += 1;
                Some(b)
            }
            _ => None,
        };
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.ptr = start;
                return None;
            }
        };
        let attr = if self.is_current_byte(b'.') {
            let dot = self.ptr;
            self.ptr += 1;
            match self.identifier() {
                Some(attr) => Some(attr),
                None => {
                    self.ptr = dot;
                    None
                }
            }
        } else {
            None
        };
        Some((sigil, name, attr))
    }

    /// `-?[0-9]+(.[0-9]+)?`; the second field is the count of fraction
    /// digits as written.
    fn number_literal(&mut self) -> Option<(f64, usize)> {
        let start = self.ptr;
        self.take_byte_if(b'-');
        let int_start = self.ptr;
        while matches!(self.get_current_byte(), Some(b) if b.is_ascii_digit()) {
            self.ptr += 1;
        }
        if self.ptr == int_start {
            self.ptr = start;
            return None;
        }
        let mut precision = 0;
        if self.is_current_byte(b'.') {
            let dot = self.ptr;
            self.ptr += 1;
            let frac_start = self.ptr;
            while matches!(self.get_current_byte(), Some(b) if b.is_ascii_digit()) {
                self.ptr += 1;
            }
            if self.ptr == frac_start {
                self.ptr = dot;
            } else {
                precision = self.ptr - frac_start;
            }
        }
        match self.source[start..self.ptr].parse() {
            Ok(value) => Some((value, precision)),
            Err(_) => {
                self.ptr = start;
                None
            }
        }
    }

    /// `.name *= *` at the cursor, returning the attribute name.
    fn attribute_start(&mut self) -> Option<String> {
        let start = self.ptr;
        if !self.take_byte_if(b'.') {
            return None;
        }
        if let Some(id) = self.identifier() {
            let id = id.to_owned();
            self.skip_spaces();
            if self.take_byte_if(b'=') {
                self.skip_spaces();
                return Some(id);
            }
        }
        self.ptr = start;
        None
    }

    /// Advances to the next `identifier *= *` line and consumes the header,
    /// returning the entry id (terms keep their `-`). Lines that are not
    /// entry starts are skipped.
    fn next_entry_start(&mut self) -> Option<String> {
        let bytes = self.source.as_bytes();
        loop {
            if self.ptr >= self.length {
                return None;
            }
            let at_line_start = self.ptr == 0 || bytes[self.ptr - 1] == b'\n';
            if at_line_start {
                if let Some(id) = self.entry_header() {
                    return Some(id);
                }
            }
            match bytes[self.ptr..].iter().position(|&b| b == b'\n') {
                Some(offset) => self.ptr += offset + 1,
                None => {
                    self.ptr = self.length;
                    return None;
                }
            }
        }
    }

    fn entry_header(&mut self) -> Option<String> {
        let start = self.ptr;
        self.take_byte_if(b'-');
        if self.identifier().is_some() {
            let id_end = self.ptr;
            self.skip_spaces();
            if self.take_byte_if(b'=') {
                self.skip_spaces();
                return Some(self.source[start..id_end].to_owned());
            }
        }
        self.ptr = start;
        None
    }

    // --- entries -----------------------------------------------------------

    fn parse_message(&mut self, id: String) -> Result<ast::Entry> {
        let value = self.parse_pattern()?;
        let attributes = self.parse_attributes()?;

        if value.is_none() && attributes.is_empty() {
            return Err(self.error(ErrorKind::ExpectedMessageField));
        }

        Ok(ast::Entry {
            id,
            value,
            attributes,
        })
    }

    fn parse_attributes(&mut self) -> Result<Vec<ast::Attribute>> {
        let mut attributes = vec![];
        while let Some(id) = self.attribute_start() {
            let value = match self.parse_pattern()? {
                Some(value) => value,
                None => return Err(self.error(ErrorKind::ExpectedAttributeValue)),
            };
            attributes.push(ast::Attribute { id, value });
        }
        Ok(attributes)
    }

    // --- patterns ----------------------------------------------------------

    fn parse_pattern(&mut self) -> Result<Option<ast::Pattern>> {
        let first = self.text_run().map(str::to_owned);

        // A placeable on the first line makes the pattern complex right
        // away. A stray closing brace takes the same path and fails inside
        // the element loop.
        if matches!(self.get_current_byte(), Some(b'{') | Some(b'}')) {
            let seed = first.into_iter().map(RawElement::Text).collect();
            return self.parse_pattern_elements(seed, usize::MAX).map(Some);
        }

        if let Some(mut indent) = self.parse_indent() {
            let common = indent.length;
            return match first {
                Some(first) => {
                    let seed = vec![RawElement::Text(first), RawElement::Indent(indent)];
                    self.parse_pattern_elements(seed, common).map(Some)
                }
                None => {
                    // A block pattern; the newlines before the first line of
                    // content are not part of the value.
                    indent.value = indent.value.trim_start_matches('\n').to_owned();
                    let seed = vec![RawElement::Indent(indent)];
                    self.parse_pattern_elements(seed, common).map(Some)
                }
            };
        }

        if let Some(first) = first {
            return Ok(Some(ast::Pattern::Simple(
                first.trim_end_matches(' ').to_owned(),
            )));
        }

        Ok(None)
    }

    fn parse_pattern_elements(
        &mut self,
        seed: Vec<RawElement>,
        mut common_indent: usize,
    ) -> Result<ast::Pattern> {
        let mut elements = seed;
        let mut placeable_count = 0;

        loop {
            if let Some(text) = self.text_run() {
                elements.push(RawElement::Text(text.to_owned()));
                continue;
            }

            match self.get_current_byte() {
                Some(b'{') => {
                    placeable_count += 1;
                    if placeable_count > MAX_PLACEABLES {
                        return Err(self.error(ErrorKind::TooManyPlaceables));
                    }
                    let expression = self.parse_placeable()?;
                    elements.push(RawElement::Placeable(expression));
                    continue;
                }
                Some(b'}') => return Err(self.error(ErrorKind::UnbalancedClosingBrace)),
                _ => {}
            }

            match self.parse_indent() {
                Some(indent) => {
                    common_indent = common_indent.min(indent.length);
                    elements.push(RawElement::Indent(indent));
                }
                None => break,
            }
        }

        if let Some(RawElement::Text(last)) = elements.last_mut() {
            let trimmed = last.trim_end_matches(' ').len();
            last.truncate(trimmed);
        }

        let mut baked = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                RawElement::Text(text) => {
                    if !text.is_empty() {
                        baked.push(ast::PatternElement::Text(text));
                    }
                }
                RawElement::Indent(indent) => {
                    // Dedent by the common indent; lines indented deeper
                    // keep their excess spaces.
                    let keep = indent.value.len() - common_indent.min(indent.value.len());
                    if keep > 0 {
                        baked.push(ast::PatternElement::Text(indent.value[..keep].to_owned()));
                    }
                }
                RawElement::Placeable(expression) => {
                    baked.push(ast::PatternElement::Placeable(expression));
                }
            }
        }

        Ok(ast::Pattern::Complex(baked))
    }

    /// Consumes the blank run at the cursor and decides whether the pattern
    /// continues on the next line.
    fn parse_indent(&mut self) -> Option<Indent> {
        let start = self.ptr;
        self.skip_blank();
        match self.get_current_byte() {
            // Attributes, variant keys, defaults and closing braces end the
            // pattern regardless of indentation.
            Some(b'.') | Some(b'[') | Some(b'*') | Some(b'}') | None => return None,
            // A block placeable continues the pattern regardless of
            // indentation.
            Some(b'{') => return Some(self.make_indent(start)),
            _ => {}
        }
        if self.ptr > start && self.source.as_bytes()[self.ptr - 1] == b' ' {
            Some(self.make_indent(start))
        } else {
            None
        }
    }

    fn make_indent(&self, start: usize) -> Indent {
        let blank = &self.source[start..self.ptr];
        let bytes = blank.as_bytes();

        // Collapse every space run that ends in a line break, CR LF
        // included, into a bare LF.
        let mut value = String::with_capacity(blank.len());
        let mut i = 0;
        while i < bytes.len() {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b' ' {
                j += 1;
            }
            match bytes.get(j) {
                Some(b'\n') => {
                    value.push('\n');
                    i = j + 1;
                }
                Some(b'\r') if bytes.get(j + 1) == Some(&b'\n') => {
                    value.push('\n');
                    i = j + 2;
                }
                _ => {
                    value.push(bytes[i] as char);
                    i += 1;
                }
            }
        }

        let length = blank.len() - blank.trim_end_matches(' ').len();
        Indent { value, length }
    }

    // --- expressions -------------------------------------------------------

    fn parse_placeable(&mut self) -> Result<ast::Expression> {
        self.expect_brace_open()?;

        let selector = self.parse_inline_expression()?;
        if self.consume_brace_close() {
            return Ok(selector);
        }

        if self.consume_arrow() {
            let (variants, star) = self.parse_variants()?;
            self.expect_brace_close()?;
            return Ok(ast::Expression::Select {
                selector: Box::new(selector),
                variants,
                star,
            });
        }

        Err(self.error(ErrorKind::UnclosedPlaceable))
    }

    fn parse_inline_expression(&mut self) -> Result<ast::Expression> {
        if self.is_current_byte(b'{') {
            // A placeable may nest another placeable.
            return self.parse_placeable();
        }

        if let Some((sigil, name, attr)) = self.reference() {
            let name = name.to_owned();
            let attribute = attr.map(str::to_owned);

            if sigil == Some(b'$') {
                return Ok(ast::Expression::VariableReference { name });
            }

            if self.consume_paren_open() {
                let arguments = self.parse_arguments()?;
                if sigil == Some(b'-') {
                    return Ok(ast::Expression::TermReference {
                        name,
                        attribute,
                        arguments,
                    });
                }
                if is_function_name(&name) {
                    return Ok(ast::Expression::FunctionCall { name, arguments });
                }
                return Err(self.error(ErrorKind::ForbiddenCallee));
            }

            if sigil == Some(b'-') {
                return Ok(ast::Expression::TermReference {
                    name,
                    attribute,
                    arguments: vec![],
                });
            }

            return Ok(ast::Expression::MessageReference { name, attribute });
        }

        self.parse_literal()
    }

    fn parse_arguments(&mut self) -> Result<Vec<ast::Argument>> {
        let mut arguments = vec![];
        loop {
            match self.get_current_byte() {
                Some(b')') => {
                    self.ptr += 1;
                    return Ok(arguments);
                }
                None => return Err(self.error(ErrorKind::UnclosedArgumentList)),
                _ => {}
            }
            arguments.push(self.parse_argument()?);
            self.consume_comma();
        }
    }

    fn parse_argument(&mut self) -> Result<ast::Argument> {
        let expression = self.parse_inline_expression()?;
        match expression {
            // A bare reference followed by a colon is a named argument.
            ast::Expression::MessageReference {
                ref name,
                attribute: None,
            } if self.consume_colon() => Ok(ast::Argument::Named {
                name: name.clone(),
                value: self.parse_literal()?,
            }),
            _ => Ok(ast::Argument::Positional(expression)),
        }
    }

    fn parse_variants(&mut self) -> Result<(Vec<ast::Variant>, usize)> {
        let mut variants: Vec<ast::Variant> = vec![];
        let mut star = None;

        loop {
            let bytes = self.source.as_bytes();
            let bracket = if self.is_current_byte(b'*') {
                bytes.get(self.ptr + 1)
            } else {
                self.get_current_byte()
            };
            if bracket != Some(&b'[') {
                break;
            }

            if self.take_byte_if(b'*') {
                if star.is_some() {
                    return Err(self.error(ErrorKind::MultipleDefaultVariants));
                }
                star = Some(variants.len());
            }

            let key = self.parse_variant_key()?;
            let value = match self.parse_pattern()? {
                Some(value) => value,
                None => return Err(self.error(ErrorKind::ExpectedVariantValue)),
            };
            variants.push(ast::Variant { key, value });
        }

        if variants.is_empty() {
            return Err(self.error(ErrorKind::MissingVariants));
        }
        match star {
            Some(star) => Ok((variants, star)),
            None => Err(self.error(ErrorKind::MissingDefaultVariant)),
        }
    }

    fn parse_variant_key(&mut self) -> Result<ast::VariantKey> {
        self.expect_bracket_open()?;
        let key = if let Some((value, precision)) = self.number_literal() {
            ast::VariantKey::NumberLiteral { value, precision }
        } else {
            match self.identifier() {
                Some(name) => ast::VariantKey::Identifier(name.to_owned()),
                None => return Err(self.error(ErrorKind::ExpectedVariantKey)),
            }
        };
        self.expect_bracket_close()?;
        Ok(key)
    }

    fn parse_literal(&mut self) -> Result<ast::Expression> {
        if let Some((value, precision)) = self.number_literal() {
            return Ok(ast::Expression::NumberLiteral { value, precision });
        }
        if self.is_current_byte(b'"') {
            return self.string_literal().map(ast::Expression::StringLiteral);
        }
        Err(self.error(ErrorKind::InvalidExpression))
    }

    fn string_literal(&mut self) -> Result<String> {
        // Caller has checked the opening quote.
        self.ptr += 1;

        let source = self.source;
        let mut value = String::new();
        loop {
            let start = self.ptr;
            while let Some(b) = self.get_current_byte() {
                match b {
                    b'\\' | b'"' | b'\n' | b'\r' => break,
                    _ => self.ptr += 1,
                }
            }
            value.push_str(&source[start..self.ptr]);

            match self.get_current_byte() {
                Some(b'\\') => value.push(self.escape_sequence()?),
                Some(b'"') => {
                    self.ptr += 1;
                    return Ok(value);
                }
                _ => return Err(self.error(ErrorKind::UnclosedStringLiteral)),
            }
        }
    }

    fn escape_sequence(&mut self) -> Result<char> {
        match self.source.as_bytes().get(self.ptr + 1) {
            Some(b'\\') => {
                self.ptr += 2;
                Ok('\\')
            }
            Some(b'"') => {
                self.ptr += 2;
                Ok('"')
            }
            Some(u @ (b'u' | b'U')) => {
                let len = if *u == b'u' { 4 } else { 6 };
                let start = self.ptr + 2;
                let hex = self
                    .source
                    .get(start..start + len)
                    .filter(|s| s.bytes().all(|b| b.is_ascii_hexdigit()));
                match hex {
                    Some(hex) => {
                        self.ptr = start + len;
                        // Lone surrogates and out-of-range code points
                        // become the replacement character.
                        Ok(u32::from_str_radix(hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or(char::REPLACEMENT_CHARACTER))
                    }
                    None => Err(self.error(ErrorKind::UnknownEscapeSequence)),
                }
            }
            _ => Err(self.error(ErrorKind::UnknownEscapeSequence)),
        }
    }
}

fn is_function_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_uppercase() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}
