//! JSON parser: a byte buffer in, an owned node tree out.
//!
//! Recursive descent over the JSON grammar, one function per construct,
//! with a byte cursor rather than an iterator so error offsets are exact.
//!
//! # Key design decisions
//!
//! - **Depth budget**: every container entry checks the nesting ceiling and
//!   fails with [`ParseError::DepthLimit`] instead of riding the call stack
//!   into an overflow. The ceiling is per-call via [`ParseOptions`].
//! - **No partial trees**: a container that fails mid-parse destroys the
//!   children it has accumulated before the error propagates, so the
//!   document never retains half a tree from a failed parse.
//! - **Lexeme-preserving numbers**: the value is the correctly-rounded
//!   double, and the source lexeme is kept as the node's cached rendering,
//!   so printing a parsed document reproduces its number literals
//!   byte-for-byte.
//! - **Strict vs lenient consumption**: strict mode rejects trailing bytes;
//!   lenient mode reports how far the parser read and leaves the rest to
//!   the caller.

use crate::arena::Document;
use crate::error::ParseError;
use crate::types::NodeId;

/// Default nesting ceiling, deep enough for any sane document and shallow
/// enough that the recursion stays well inside a default stack.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Tuning knobs for a single parse call.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// When true, anything after the document other than whitespace is a
    /// [`ParseError::TrailingData`] error.
    pub require_all_consumed: bool,
    /// Containers nested deeper than this fail with
    /// [`ParseError::DepthLimit`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            require_all_consumed: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A successful parse: the new tree plus how far the parser read.
#[derive(Debug, Clone, Copy)]
pub struct Parsed {
    /// Root of the freshly built tree, detached and owned by the caller.
    pub root: NodeId,
    /// Offset of the first byte the parser did not consume. Trailing
    /// whitespace is consumed, so in strict mode this is the buffer length.
    pub consumed: usize,
}

impl Document {
    /// Parse a complete JSON document. The whole buffer, minus trailing
    /// whitespace and an optional leading UTF-8 BOM, must be consumed.
    pub fn parse(&mut self, input: &[u8]) -> Result<NodeId, ParseError> {
        self.parse_with_options(input, &ParseOptions::default())
            .map(|parsed| parsed.root)
    }

    /// Parse with explicit options. In lenient mode
    /// (`require_all_consumed: false`) trailing data is not an error and
    /// [`Parsed::consumed`] tells the caller where the document ended.
    pub fn parse_with_options(
        &mut self,
        input: &[u8],
        options: &ParseOptions,
    ) -> Result<Parsed, ParseError> {
        let mut parser = Parser {
            doc: self,
            input,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth,
        };
        parser.skip_bom();
        parser.skip_whitespace();
        let root = parser.parse_value()?;
        parser.skip_whitespace();
        if options.require_all_consumed && !parser.at_end() {
            let offset = parser.pos;
            parser.doc.destroy(root);
            return Err(ParseError::TrailingData { offset });
        }
        Ok(Parsed {
            root,
            consumed: parser.pos,
        })
    }
}

struct Parser<'a, 'd> {
    doc: &'d mut Document,
    input: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser<'_, '_> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_bom(&mut self) {
        if self.input.starts_with(BOM) {
            self.pos += BOM.len();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
    }

    /// Check the nesting budget before descending into a container.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::DepthLimit {
                offset: self.pos,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect_literal(
        &mut self,
        literal: &'static [u8],
        expected: &'static str,
    ) -> Result<(), ParseError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(ParseError::Syntax {
                offset: self.pos,
                expected,
            })
        }
    }

    fn parse_value(&mut self) -> Result<NodeId, ParseError> {
        match self.peek() {
            Some(b'n') => {
                self.expect_literal(b"null", "'null'")?;
                Ok(self.doc.create_null())
            }
            Some(b't') => {
                self.expect_literal(b"true", "'true'")?;
                Ok(self.doc.create_bool(true))
            }
            Some(b'f') => {
                self.expect_literal(b"false", "'false'")?;
                Ok(self.doc.create_bool(false))
            }
            Some(b'"') => {
                let text = self.parse_string_body()?;
                Ok(self.doc.create_string(&text))
            }
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(_) => Err(ParseError::Syntax {
                offset: self.pos,
                expected: "a JSON value",
            }),
            None => Err(ParseError::UnexpectedEnd { offset: self.pos }),
        }
    }

    /// Strict JSON number grammar. The scanned lexeme both produces the
    /// value and becomes the node's cached rendering. Grammar-valid
    /// literals whose magnitude overflows parse to infinity without error;
    /// the printer is the layer that refuses non-finite values.
    fn parse_number(&mut self) -> Result<NodeId, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.bump();
        }
        match self.peek() {
            Some(b'0') => self.bump(),
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.bump();
                }
            }
            _ => return Err(ParseError::InvalidNumber { offset: start }),
        }
        if self.peek() == Some(b'.') {
            self.bump();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        let lexeme = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| ParseError::InvalidNumber { offset: start })?;
        let value: f64 = lexeme
            .parse()
            .map_err(|_| ParseError::InvalidNumber { offset: start })?;
        let id = self.doc.create_number(value);
        self.doc.set_number_text(id, lexeme.to_owned());
        Ok(id)
    }

    /// Parse a quoted string starting at the opening quote, processing the
    /// standard escape set. Unescaped control characters and invalid UTF-8
    /// are rejected, never replaced.
    fn parse_string_body(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.bump(); // opening quote
        let mut out: Vec<u8> = Vec::new();
        loop {
            let byte = self
                .peek()
                .ok_or(ParseError::UnexpectedEnd { offset: self.pos })?;
            match byte {
                b'"' => {
                    self.bump();
                    break;
                }
                b'\\' => {
                    self.bump();
                    self.parse_escape(&mut out)?;
                }
                0x00..=0x1F => {
                    return Err(ParseError::Syntax {
                        offset: self.pos,
                        expected: "an escaped control character",
                    });
                }
                _ => {
                    out.push(byte);
                    self.bump();
                }
            }
        }
        String::from_utf8(out).map_err(|_| ParseError::InvalidUtf8 { offset: open })
    }

    /// One escape sequence, cursor positioned just past the backslash.
    fn parse_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let escape_offset = self.pos - 1;
        let byte = self
            .peek()
            .ok_or(ParseError::UnexpectedEnd { offset: self.pos })?;
        self.bump();
        match byte {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                let ch = self.parse_unicode_escape(escape_offset)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            _ => return Err(ParseError::InvalidEscape { offset: escape_offset }),
        }
        Ok(())
    }

    /// `\uXXXX`, including surrogate pairs. A lone or mispaired surrogate
    /// is an error.
    fn parse_unicode_escape(&mut self, escape_offset: usize) -> Result<char, ParseError> {
        let high = self.parse_hex4(escape_offset)?;
        let code_point = if (0xD800..=0xDBFF).contains(&high) {
            if self.peek() != Some(b'\\') {
                return Err(ParseError::InvalidEscape { offset: escape_offset });
            }
            self.bump();
            if self.peek() != Some(b'u') {
                return Err(ParseError::InvalidEscape { offset: escape_offset });
            }
            self.bump();
            let low = self.parse_hex4(escape_offset)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(ParseError::InvalidEscape { offset: escape_offset });
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else if (0xDC00..=0xDFFF).contains(&high) {
            return Err(ParseError::InvalidEscape { offset: escape_offset });
        } else {
            high
        };
        char::from_u32(code_point).ok_or(ParseError::InvalidEscape { offset: escape_offset })
    }

    fn parse_hex4(&mut self, escape_offset: usize) -> Result<u32, ParseError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self
                .peek()
                .ok_or(ParseError::UnexpectedEnd { offset: self.pos })?;
            let digit = (byte as char)
                .to_digit(16)
                .ok_or(ParseError::InvalidEscape { offset: escape_offset })?;
            value = value * 16 + digit;
            self.bump();
        }
        Ok(value)
    }

    fn parse_array(&mut self) -> Result<NodeId, ParseError> {
        self.enter()?;
        self.bump(); // '['
        let array = self.doc.create_array();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.bump();
            self.leave();
            return Ok(array);
        }
        loop {
            let item = match self.parse_value() {
                Ok(item) => item,
                Err(error) => {
                    self.doc.destroy(array);
                    return Err(error);
                }
            };
            self.doc.attach(array, None, item);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.doc.destroy(array);
                    return Err(ParseError::Syntax {
                        offset: self.pos,
                        expected: "',' or ']' after array element",
                    });
                }
                None => {
                    let offset = self.pos;
                    self.doc.destroy(array);
                    return Err(ParseError::UnexpectedEnd { offset });
                }
            }
        }
        self.leave();
        Ok(array)
    }

    fn parse_object(&mut self) -> Result<NodeId, ParseError> {
        self.enter()?;
        self.bump(); // '{'
        let object = self.doc.create_object();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.bump();
            self.leave();
            return Ok(object);
        }
        loop {
            if let Err(error) = self.parse_member(object) {
                self.doc.destroy(object);
                return Err(error);
            }
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.doc.destroy(object);
                    return Err(ParseError::Syntax {
                        offset: self.pos,
                        expected: "',' or '}' after object member",
                    });
                }
                None => {
                    let offset = self.pos;
                    self.doc.destroy(object);
                    return Err(ParseError::UnexpectedEnd { offset });
                }
            }
        }
        self.leave();
        Ok(object)
    }

    /// One `"key": value` member, attached to `object` on success.
    /// Duplicate keys are kept in arrival order.
    fn parse_member(&mut self, object: NodeId) -> Result<(), ParseError> {
        match self.peek() {
            Some(b'"') => {}
            Some(_) => {
                return Err(ParseError::Syntax {
                    offset: self.pos,
                    expected: "an object key string",
                });
            }
            None => return Err(ParseError::UnexpectedEnd { offset: self.pos }),
        }
        let key = self.parse_string_body()?;
        self.skip_whitespace();
        match self.peek() {
            Some(b':') => self.bump(),
            Some(_) => {
                return Err(ParseError::Syntax {
                    offset: self.pos,
                    expected: "':' after object key",
                });
            }
            None => return Err(ParseError::UnexpectedEnd { offset: self.pos }),
        }
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.doc.attach(object, Some(key), value);
        Ok(())
    }
}

/// Strip insignificant whitespace and comments from a JSON buffer in place.
///
/// Removes `//` line comments and `/* */` block comments along with all
/// whitespace outside string literals, then truncates the buffer to the new
/// length. Quoted strings are copied verbatim with escape tracking, so
/// nothing lexically inside a string is ever altered. The pass is purely
/// textual: it neither validates nor needs a well-formed document.
pub fn minify(buf: &mut Vec<u8>) {
    let mut read = 0;
    let mut write = 0;
    let len = buf.len();
    while read < len {
        match buf[read] {
            b' ' | b'\t' | b'\n' | b'\r' => read += 1,
            b'/' if buf.get(read + 1) == Some(&b'/') => {
                while read < len && buf[read] != b'\n' {
                    read += 1;
                }
            }
            b'/' if buf.get(read + 1) == Some(&b'*') => {
                read += 2;
                while read + 1 < len && !(buf[read] == b'*' && buf[read + 1] == b'/') {
                    read += 1;
                }
                read = (read + 2).min(len);
            }
            b'"' => {
                buf[write] = b'"';
                write += 1;
                read += 1;
                while read < len {
                    let byte = buf[read];
                    buf[write] = byte;
                    write += 1;
                    read += 1;
                    if byte == b'\\' {
                        if read < len {
                            buf[write] = buf[read];
                            write += 1;
                            read += 1;
                        }
                    } else if byte == b'"' {
                        break;
                    }
                }
            }
            byte => {
                buf[write] = byte;
                write += 1;
                read += 1;
            }
        }
    }
    buf.truncate(write);
}
