//! N-Triples codec tests: escaping, literal and triple parsing, error offsets.

use mptsql::rdf::ntriples::{escape, parse_iri, parse_literal, parse_node, parse_triple, unescape};
use mptsql::rdf::{IriRef, Node, ParseError, ParseErrorKind};
use proptest::prelude::*;

fn kind_and_offset<T: std::fmt::Debug>(result: Result<T, ParseError>) -> (ParseErrorKind, usize) {
    let err = result.unwrap_err();
    (err.kind, err.offset)
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn test_unescape_basic() {
    assert_eq!(unescape("a\\tb\\n\\u0041").unwrap(), "a\tb\nA");
    assert_eq!(unescape(r#"\"quoted\" \\ \r"#).unwrap(), "\"quoted\" \\ \r");
}

#[test]
fn test_unescape_without_backslash_is_identity() {
    assert_eq!(unescape("plain text").unwrap(), "plain text");
    assert_eq!(unescape("").unwrap(), "");
}

#[test]
fn test_escape_control_and_supplementary() {
    assert_eq!(
        escape("A\u{0001}\u{007F}\u{1F600}"),
        "A\\u0001\\u007F\\U0001F600"
    );
    assert_eq!(escape("tab\there"), "tab\\there");
    assert_eq!(escape("caf\u{e9}"), "caf\\u00E9");
}

#[test]
fn test_escape_round_trip() {
    let samples = [
        "",
        "ascii only",
        "quote \" and backslash \\",
        "line\nbreak\r\ttab",
        "\u{0000}\u{000B}\u{000C}\u{001F}",
        "caf\u{e9} \u{4e2d}\u{6587}",
        "emoji \u{1F600} and \u{10FFFF}",
    ];
    for s in samples {
        let escaped = escape(s);
        assert!(escaped.chars().all(|c| (c as u32) <= 0x7E), "{:?}", escaped);
        assert_eq!(unescape(&escaped).unwrap(), s);
    }
}

proptest! {
    #[test]
    fn test_escape_round_trip_any_string(s in any::<String>()) {
        let escaped = escape(&s);
        prop_assert_eq!(unescape(&escaped), Ok(s));
    }

    #[test]
    fn test_escape_output_is_printable_ascii(s in any::<String>()) {
        let escaped = escape(&s);
        prop_assert!(escaped.chars().all(|c| (c as u32) <= 0x7E), "{:?}", escaped);
    }

    #[test]
    fn test_non_ascii_rejected_at_first_position(s in any::<String>()) {
        let first_non_ascii = s.chars().position(|c| (c as u32) > 0x7F);
        match (unescape(&s), first_non_ascii) {
            (Err(err), Some(pos)) => {
                prop_assert_eq!(err.kind, ParseErrorKind::NonAsciiChar);
                prop_assert_eq!(err.offset, pos);
            }
            (Err(err), None) => {
                prop_assert_ne!(err.kind, ParseErrorKind::NonAsciiChar);
            }
            (Ok(_), pos) => {
                prop_assert_eq!(pos, None);
            }
        }
    }
}

#[test]
fn test_unescape_surrogate_pair() {
    assert_eq!(unescape("\\uD83D\\uDE00").unwrap(), "\u{1F600}");
    assert_eq!(
        kind_and_offset(unescape("x\\uD83D")),
        (ParseErrorKind::IllegalEscape, 1)
    );
}

#[test]
fn test_unescape_errors() {
    assert_eq!(
        kind_and_offset(unescape("caf\u{e9}")),
        (ParseErrorKind::NonAsciiChar, 3)
    );
    assert_eq!(
        kind_and_offset(unescape("ab\\x")),
        (ParseErrorKind::UnescapedBackslash, 2)
    );
    assert_eq!(
        kind_and_offset(unescape("\\u00")),
        (ParseErrorKind::IncompleteEscape, 0)
    );
    assert_eq!(
        kind_and_offset(unescape("\\u00G1")),
        (ParseErrorKind::IllegalEscape, 0)
    );
    assert_eq!(
        kind_and_offset(unescape("\\U00110000")),
        (ParseErrorKind::IllegalEscape, 0)
    );
}

// ============================================================================
// Literals and IRIs
// ============================================================================

#[test]
fn test_parse_typed_literal() {
    let node = parse_literal("\"3.14\"^^<http://www.w3.org/2001/XMLSchema#double>").unwrap();
    assert_eq!(
        node,
        Node::typed(
            "3.14",
            IriRef::new("http://www.w3.org/2001/XMLSchema#double").unwrap()
        )
    );
}

#[test]
fn test_parse_language_and_plain_literals() {
    assert_eq!(
        parse_literal("\"chat\"@fr").unwrap(),
        Node::language("chat", "fr").unwrap()
    );
    assert_eq!(
        parse_literal("\"say \\\"hi\\\"\"").unwrap(),
        Node::plain("say \"hi\"")
    );
}

#[test]
fn test_literal_error_offsets_are_rebased() {
    // `\q` inside the quotes: the backslash is character 3 of the literal
    assert_eq!(
        kind_and_offset(parse_literal("\"ab\\qc\"")),
        (ParseErrorKind::UnescapedBackslash, 3)
    );
    // relative datatype IRI: offset points just past the '<'
    assert_eq!(
        kind_and_offset(parse_literal("\"x\"^^<rel>")),
        (ParseErrorKind::ExpectedAbsoluteUri, 6)
    );
    assert_eq!(
        kind_and_offset(parse_literal("\"chat\"@")),
        (ParseErrorKind::ExpectedLanguageTag, 6)
    );
    assert_eq!(
        kind_and_offset(parse_literal("\"x\"^<http://ex/t>")),
        (ParseErrorKind::ExpectedCaret, 4)
    );
    assert_eq!(
        kind_and_offset(parse_literal("\"x\"!")),
        (ParseErrorKind::ExpectedAtCaretOrEof, 3)
    );
}

#[test]
fn test_parse_iri() {
    assert_eq!(
        parse_iri("<http://example.org/a>").unwrap(),
        IriRef::new("http://example.org/a").unwrap()
    );
    assert_eq!(
        kind_and_offset(parse_iri("http://example.org/a")),
        (ParseErrorKind::ExpectedOpenAngle, 0)
    );
    assert_eq!(
        kind_and_offset(parse_iri("<http://example.org/a")),
        (ParseErrorKind::ExpectedCloseAngle, 20)
    );
}

#[test]
fn test_parse_node_dispatch() {
    assert!(matches!(parse_node("<http://ex/a>"), Ok(Node::Iri(_))));
    assert!(matches!(parse_node("\"a\""), Ok(Node::PlainLiteral(_))));
    assert_eq!(
        kind_and_offset(parse_node("_:b0")),
        (ParseErrorKind::ExpectedQuoteOrAngle, 0)
    );
}

// ============================================================================
// Triples
// ============================================================================

#[test]
fn test_parse_triple_canonical_form() {
    let line = "<http://ex/s> <http://ex/p> \"o\"@en .";
    let triple = parse_triple(line).unwrap();
    assert_eq!(triple.object, Node::language("o", "en").unwrap());
    assert_eq!(triple.to_string(), line);
}

#[test]
fn test_parse_triple_with_tabs() {
    let triple = parse_triple("<http://ex/s>\t<http://ex/p>\t<http://ex/o>\t.").unwrap();
    assert_eq!(
        triple.to_string(),
        "<http://ex/s> <http://ex/p> <http://ex/o> ."
    );
}

#[test]
fn test_parse_triple_errors() {
    let (kind, _) = kind_and_offset(parse_triple("<http://ex/s> <http://ex/p> <http://ex/o>"));
    assert_eq!(kind, ParseErrorKind::ExpectedDot);

    let (kind, _) = kind_and_offset(parse_triple("<http://ex/s> <http://ex/p> <http://ex/o>."));
    assert_eq!(kind, ParseErrorKind::ExpectedSpaceOrTab);

    // error in the object is reported against the whole line
    assert_eq!(
        kind_and_offset(parse_triple("<http://ex/s> <http://ex/p> \"a\\qb\" .")),
        (ParseErrorKind::UnescapedBackslash, 30)
    );
}
