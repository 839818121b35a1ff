//! Serialization: a node tree in, JSON text out.
//!
//! One tree walker drives three public entry points through a small sink
//! trait: a growable string (always succeeds), a growable string pre-sized
//! to a caller hint, and a caller-owned fixed buffer that reports overflow
//! instead of ever writing past its capacity.
//!
//! # Key design decisions
//!
//! - **Cache-first numbers**: a number node's cached rendering (the parse
//!   lexeme or the last set value) is emitted verbatim, so parse-then-print
//!   reproduces literals byte-for-byte. Without a cache the value is
//!   rendered with the shortest round-trip form; non-finite values have no
//!   JSON rendering and fail the print rather than being coerced.
//! - **UTF-8 passthrough**: quote, backslash, and control characters are
//!   escaped; everything above ASCII is emitted as-is. This is the
//!   printer's one engine-compatibility decision, and it follows the
//!   modern convention of the surrounding ecosystem.
//! - **Raw passthrough**: raw nodes print verbatim, no escaping and no
//!   re-validation, so pre-rendered fragments splice in without a
//!   parse-and-reprint cost.

use crate::arena::Document;
use crate::types::{Kind, NodeId};

/// Where printed text goes. `write_str` reports whether the write fit, and
/// a `false` aborts the walk immediately.
trait PrintTarget {
    fn write_str(&mut self, s: &str) -> bool;
}

impl PrintTarget for String {
    fn write_str(&mut self, s: &str) -> bool {
        self.push_str(s);
        true
    }
}

/// Fixed-capacity sink over a caller-owned buffer. Refuses any write that
/// would run past the end, leaving earlier content intact.
struct BoundedBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl PrintTarget for BoundedBuf<'_> {
    fn write_str(&mut self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let Some(end) = self.len.checked_add(bytes.len()) else {
            return false;
        };
        if end > self.buf.len() {
            return false;
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        true
    }
}

impl Document {
    /// Print a tree into a fresh string. `formatted` selects 2-space
    /// indentation with a space after each colon; otherwise the minimal
    /// representation is emitted. `None` if the handle is stale or the
    /// tree contains a number with no JSON rendering.
    pub fn print(&self, root: NodeId, formatted: bool) -> Option<String> {
        let mut out = String::new();
        if self.print_value(root, 0, formatted, &mut out) {
            Some(out)
        } else {
            None
        }
    }

    /// Like [`print`](Document::print), but the output buffer starts at
    /// `capacity_hint` bytes and grows as needed. A good hint makes the
    /// print allocation-free after the first reserve; a bad one costs
    /// nothing but the usual growth.
    pub fn print_buffered(
        &self,
        root: NodeId,
        capacity_hint: usize,
        formatted: bool,
    ) -> Option<String> {
        let mut out = String::with_capacity(capacity_hint);
        if self.print_value(root, 0, formatted, &mut out) {
            Some(out)
        } else {
            None
        }
    }

    /// Print into a caller-owned buffer, never writing past its end.
    /// Returns the number of bytes written, or `None` if the output did
    /// not fit (or the tree is unprintable); on failure the buffer's
    /// contents are unspecified but always in bounds.
    pub fn print_into(&self, root: NodeId, buffer: &mut [u8], formatted: bool) -> Option<usize> {
        let mut out = BoundedBuf { buf: buffer, len: 0 };
        if self.print_value(root, 0, formatted, &mut out) {
            Some(out.len)
        } else {
            None
        }
    }

    fn print_value<T: PrintTarget>(
        &self,
        id: NodeId,
        depth: usize,
        formatted: bool,
        out: &mut T,
    ) -> bool {
        let resolved = match self.resolve(id) {
            Some(resolved) => resolved,
            None => return false,
        };
        let node = match self.node(resolved) {
            Some(node) => node,
            None => return false,
        };
        match node.kind {
            Kind::Null => out.write_str("null"),
            Kind::False => out.write_str("false"),
            Kind::True => out.write_str("true"),
            Kind::Number => {
                if let Some(text) = node.number_text.as_deref() {
                    return out.write_str(text);
                }
                match render_number(node.number) {
                    Some(text) => out.write_str(&text),
                    None => false,
                }
            }
            Kind::String => write_escaped(node.text.as_deref().unwrap_or(""), out),
            Kind::Raw => match node.text.as_deref() {
                Some(text) => out.write_str(text),
                None => false,
            },
            Kind::Array => {
                if node.children.is_empty() {
                    return out.write_str("[]");
                }
                if !out.write_str("[") {
                    return false;
                }
                for (i, &child) in node.children.iter().enumerate() {
                    if i > 0 && !out.write_str(",") {
                        return false;
                    }
                    if formatted && !(out.write_str("\n") && write_indent(depth + 1, out)) {
                        return false;
                    }
                    if !self.print_value(child, depth + 1, formatted, out) {
                        return false;
                    }
                }
                if formatted && !(out.write_str("\n") && write_indent(depth, out)) {
                    return false;
                }
                out.write_str("]")
            }
            Kind::Object => {
                if node.children.is_empty() {
                    return out.write_str("{}");
                }
                if !out.write_str("{") {
                    return false;
                }
                for (i, &child) in node.children.iter().enumerate() {
                    if i > 0 && !out.write_str(",") {
                        return false;
                    }
                    if formatted && !(out.write_str("\n") && write_indent(depth + 1, out)) {
                        return false;
                    }
                    let key = self
                        .node(child)
                        .and_then(|member| member.key.as_deref())
                        .unwrap_or("");
                    if !write_escaped(key, out) {
                        return false;
                    }
                    if !out.write_str(if formatted { ": " } else { ":" }) {
                        return false;
                    }
                    if !self.print_value(child, depth + 1, formatted, out) {
                        return false;
                    }
                }
                if formatted && !(out.write_str("\n") && write_indent(depth, out)) {
                    return false;
                }
                out.write_str("}")
            }
        }
    }
}

fn write_indent<T: PrintTarget>(depth: usize, out: &mut T) -> bool {
    for _ in 0..depth {
        if !out.write_str("  ") {
            return false;
        }
    }
    true
}

/// Emit a string value with its surrounding quotes. Runs of plain
/// characters are written in one call; only quote, backslash, and control
/// characters are escaped.
fn write_escaped<T: PrintTarget>(text: &str, out: &mut T) -> bool {
    if !out.write_str("\"") {
        return false;
    }
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        let replacement: Option<&str> = match ch {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\u{08}' => Some("\\b"),
            '\u{0C}' => Some("\\f"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            _ if (ch as u32) < 0x20 => None,
            _ => continue,
        };
        if !out.write_str(&text[start..i]) {
            return false;
        }
        let written = match replacement {
            Some(fixed) => out.write_str(fixed),
            None => out.write_str(&format!("\\u{:04x}", ch as u32)),
        };
        if !written {
            return false;
        }
        start = i + ch.len_utf8();
    }
    out.write_str(&text[start..]) && out.write_str("\"")
}

/// The shortest decimal rendering that parses back to the same bits.
/// Integral doubles come out without a trailing `.0`, and `-0.0` keeps its
/// sign as `-0`. Non-finite values have no JSON form and yield `None`.
pub(crate) fn render_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    Some(format!("{value}"))
}
