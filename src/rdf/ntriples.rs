//! N-Triples lexical codec.
//!
//! Parses IRIs, literals, nodes and whole triple lines from their N-Triples
//! form, and converts lexical values to and from the escaped ASCII form used
//! inside N-Triples literals.
//!
//! Every [`ParseError`] carries a character offset into the string that was
//! originally handed to the public function, even when the failure happened
//! in a nested parse (for instance the datatype IRI of a typed literal).
//!
//! # Example
//!
//! ```
//! use mptsql::rdf::ntriples::{escape, parse_literal, unescape};
//! use mptsql::rdf::Node;
//!
//! let node = parse_literal("\"caf\\u00E9\"@fr").unwrap();
//! assert_eq!(node, Node::language("café", "fr").unwrap());
//!
//! assert_eq!(escape("tab\there"), "tab\\there");
//! assert_eq!(unescape("tab\\there").unwrap(), "tab\there");
//! ```

use std::fmt::Write as _;

use super::{IriRef, LanguageTag, Node, Triple};

/// The kind of lexical violation found while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    ExpectedOpenAngle,
    ExpectedCloseAngle,
    ExpectedAbsoluteUri,
    ExpectedQuote,
    ExpectedCaret,
    ExpectedAtCaretOrEof,
    ExpectedQuoteOrAngle,
    ExpectedSpaceOrTab,
    ExpectedDot,
    ExpectedLanguageTag,
    NonAsciiChar,
    UnescapedBackslash,
    IncompleteEscape,
    IllegalEscape,
}

impl ParseErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedOpenAngle => "Expected '<'",
            ParseErrorKind::ExpectedCloseAngle => "Expected '>'",
            ParseErrorKind::ExpectedAbsoluteUri => "Expected absolute URI",
            ParseErrorKind::ExpectedQuote => "Expected '\"'",
            ParseErrorKind::ExpectedCaret => "Expected '^'",
            ParseErrorKind::ExpectedAtCaretOrEof => "Expected '@', '^', or EOF",
            ParseErrorKind::ExpectedQuoteOrAngle => "Expected '\"' or '<'",
            ParseErrorKind::ExpectedSpaceOrTab => "Expected ' ' or TAB",
            ParseErrorKind::ExpectedDot => "Expected '.'",
            ParseErrorKind::ExpectedLanguageTag => "Expected language tag",
            ParseErrorKind::NonAsciiChar => "Non-ASCII character",
            ParseErrorKind::UnescapedBackslash => "Unescaped backslash",
            ParseErrorKind::IncompleteEscape => "Incomplete Unicode escape sequence",
            ParseErrorKind::IllegalEscape => "Illegal Unicode escape sequence",
        }
    }
}

/// A lexical error with the character offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{} at offset {offset}", kind.message())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Shift the offset of an error raised on a substring starting at `base`,
    /// keeping it on a character of an input of `len` characters.
    fn rebase(self, base: usize, len: usize) -> Self {
        Self {
            kind: self.kind,
            offset: clamp(self.offset + base, len),
        }
    }
}

/// Keep an offset on the last character of the input when it ran past the end.
fn clamp(offset: usize, len: usize) -> usize {
    offset.min(len.saturating_sub(1))
}

// =============================================================================
// Nodes
// =============================================================================

/// Parse a triple line: `subject SP predicate SP object SP '.'`.
///
/// Subject and predicate must be IRIs. Runs of spaces and tabs are accepted
/// between the terms and before the terminating dot.
pub fn parse_triple(line: &str) -> Result<Triple, ParseError> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();

    let mut end = len;
    while end > 0 && is_space_or_tab(chars[end - 1]) {
        end -= 1;
    }
    if end == 0 || chars[end - 1] != '.' {
        return Err(ParseError::new(ParseErrorKind::ExpectedDot, clamp(end, len)));
    }
    let dot = end - 1;
    let mut body_end = dot;
    while body_end > 0 && is_space_or_tab(chars[body_end - 1]) {
        body_end -= 1;
    }
    if body_end == dot {
        return Err(ParseError::new(ParseErrorKind::ExpectedSpaceOrTab, dot));
    }

    let subject_end = first_space_or_tab(&chars, 0, body_end)
        .ok_or_else(|| ParseError::new(ParseErrorKind::ExpectedSpaceOrTab, clamp(body_end, len)))?;
    let subject = parse_iri(&collect(&chars, 0, subject_end)).map_err(|e| e.rebase(0, len))?;

    let predicate_start = skip_space_or_tab(&chars, subject_end, body_end);
    let predicate_end = first_space_or_tab(&chars, predicate_start, body_end)
        .ok_or_else(|| ParseError::new(ParseErrorKind::ExpectedSpaceOrTab, clamp(body_end, len)))?;
    let predicate = parse_iri(&collect(&chars, predicate_start, predicate_end))
        .map_err(|e| e.rebase(predicate_start, len))?;

    let object_start = skip_space_or_tab(&chars, predicate_end, body_end);
    let object = parse_node(&collect(&chars, object_start, body_end))
        .map_err(|e| e.rebase(object_start, len))?;

    Ok(Triple::new(subject, predicate, object))
}

/// Parse an IRI or a literal, dispatching on the first character.
pub fn parse_node(s: &str) -> Result<Node, ParseError> {
    match s.chars().next() {
        Some('"') => parse_literal(s),
        Some('<') => parse_iri(s).map(Node::Iri),
        _ => Err(ParseError::new(ParseErrorKind::ExpectedQuoteOrAngle, 0)),
    }
}

/// Parse a literal: `'"' escaped '"' ( '@' lang | '^^' iri )?`.
pub fn parse_literal(s: &str) -> Result<Node, ParseError> {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    if chars.first() != Some(&'"') {
        return Err(ParseError::new(ParseErrorKind::ExpectedQuote, 0));
    }

    let mut escaped = String::new();
    let mut i = 1;
    loop {
        match chars.get(i) {
            None => return Err(ParseError::new(ParseErrorKind::ExpectedQuote, clamp(i, len))),
            Some('"') => break,
            Some('\\') => {
                escaped.push('\\');
                i += 1;
                match chars.get(i) {
                    Some(&c) => escaped.push(c),
                    None => {
                        return Err(ParseError::new(ParseErrorKind::ExpectedQuote, clamp(i, len)))
                    }
                }
            }
            Some(&c) => escaped.push(c),
        }
        i += 1;
    }

    // `escaped` is a verbatim copy of chars[1..i]
    let lexical = unescape(&escaped).map_err(|e| e.rebase(1, len))?;

    let tail = i + 1;
    match chars.get(tail) {
        None => Ok(Node::PlainLiteral(lexical)),
        Some('@') => {
            let tag = collect(&chars, tail + 1, len);
            let language = LanguageTag::new(tag)
                .map_err(|_| ParseError::new(ParseErrorKind::ExpectedLanguageTag, tail))?;
            Ok(Node::LanguageLiteral { lexical, language })
        }
        Some('^') => {
            if chars.get(tail + 1) != Some(&'^') {
                return Err(ParseError::new(ParseErrorKind::ExpectedCaret, clamp(tail + 1, len)));
            }
            let datatype =
                parse_iri(&collect(&chars, tail + 2, len)).map_err(|e| e.rebase(tail + 2, len))?;
            Ok(Node::TypedLiteral { lexical, datatype })
        }
        Some(_) => Err(ParseError::new(ParseErrorKind::ExpectedAtCaretOrEof, tail)),
    }
}

/// Parse an IRI reference: `'<' absolute-uri '>'`.
pub fn parse_iri(s: &str) -> Result<IriRef, ParseError> {
    if !s.starts_with('<') {
        return Err(ParseError::new(ParseErrorKind::ExpectedOpenAngle, 0));
    }
    let len = s.chars().count();
    if len < 2 || !s.ends_with('>') {
        return Err(ParseError::new(ParseErrorKind::ExpectedCloseAngle, len - 1));
    }

    IriRef::new(&s[1..s.len() - 1])
        .map_err(|_| ParseError::new(ParseErrorKind::ExpectedAbsoluteUri, 1))
}

// =============================================================================
// Escaping
// =============================================================================

/// Unescape an N-Triples-escaped string.
///
/// - Every input character must be 7-bit ASCII.
/// - `\t`, `\r`, `\n`, `\"` and `\\` are restored.
/// - `\uXXXX` and `\UXXXXXXXX` are validated and decoded. A high surrogate
///   escape followed by a low surrogate escape decodes to one code point.
///
/// Error offsets point at the offending backslash. Input without any
/// backslash is returned unchanged.
pub fn unescape(s: &str) -> Result<String, ParseError> {
    if let Some(pos) = s.chars().position(|c| !c.is_ascii()) {
        return Err(ParseError::new(ParseErrorKind::NonAsciiChar, pos));
    }

    // ASCII from here on: byte offsets are character offsets
    if !s.contains('\\') {
        return Ok(s.to_string());
    }

    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b as char);
            i += 1;
            continue;
        }

        let Some(&next) = bytes.get(i + 1) else {
            return Err(ParseError::new(ParseErrorKind::UnescapedBackslash, i));
        };
        match next {
            b't' => out.push('\t'),
            b'r' => out.push('\r'),
            b'n' => out.push('\n'),
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'u' | b'U' => {
                let (c, consumed) = decode_unicode_escape(s, i)?;
                out.push(c);
                i += consumed;
                continue;
            }
            _ => return Err(ParseError::new(ParseErrorKind::UnescapedBackslash, i)),
        }
        i += 2;
    }

    Ok(out)
}

/// Decode the `\u`/`\U` escape starting at `at`, returning the character and
/// the number of input bytes consumed.
fn decode_unicode_escape(s: &str, at: usize) -> Result<(char, usize), ParseError> {
    let code = read_hex_escape(s, at)?;

    if (0xD800..=0xDBFF).contains(&code) {
        let low_at = at + 6;
        if s.as_bytes().get(low_at..low_at + 2) == Some(b"\\u".as_slice()) {
            let low = read_hex_escape(s, low_at)?;
            if (0xDC00..=0xDFFF).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                if let Some(c) = char::from_u32(combined) {
                    return Ok((c, 12));
                }
            }
        }
        return Err(ParseError::new(ParseErrorKind::IllegalEscape, at));
    }

    let width = escape_width(s, at);
    char::from_u32(code)
        .map(|c| (c, width + 2))
        .ok_or_else(|| ParseError::new(ParseErrorKind::IllegalEscape, at))
}

fn escape_width(s: &str, at: usize) -> usize {
    if s.as_bytes().get(at + 1) == Some(&b'U') {
        8
    } else {
        4
    }
}

fn read_hex_escape(s: &str, at: usize) -> Result<u32, ParseError> {
    let width = escape_width(s, at);
    let start = at + 2;
    let digits = s
        .get(start..start + width)
        .ok_or_else(|| ParseError::new(ParseErrorKind::IncompleteEscape, at))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::new(ParseErrorKind::IllegalEscape, at));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ParseError::new(ParseErrorKind::IllegalEscape, at))
}

/// Escape a string to N-Triples literal form. The result is pure ASCII.
///
/// - `\\`, `"`, LF, CR and TAB use their short backslash forms.
/// - U+0000..U+0008, U+000B, U+000C, U+000E..U+001F and U+007F..U+FFFF use
///   `\uXXXX`.
/// - U+10000..U+10FFFF use `\UXXXXXXXX`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);

    for c in s.chars() {
        let code = c as u32;
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if code <= 0x08
                || code == 0x0B
                || code == 0x0C
                || (0x0E..=0x1F).contains(&code)
                || (0x7F..=0xFFFF).contains(&code) =>
            {
                let _ = write!(out, "\\u{:04X}", code);
            }
            _ if code >= 0x10000 => {
                let _ = write!(out, "\\U{:08X}", code);
            }
            _ => out.push(c),
        }
    }

    out
}

// =============================================================================
// Helpers
// =============================================================================

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn first_space_or_tab(chars: &[char], from: usize, to: usize) -> Option<usize> {
    (from..to).find(|&i| is_space_or_tab(chars[i]))
}

fn skip_space_or_tab(chars: &[char], from: usize, to: usize) -> usize {
    (from..to).find(|&i| !is_space_or_tab(chars[i])).unwrap_or(to)
}

fn collect(chars: &[char], from: usize, to: usize) -> String {
    chars[from.min(to)..to].iter().collect()
}
