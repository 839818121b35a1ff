use jdom_core::{minify, Document, KeyMatch, ParseError, ParseOptions, DEFAULT_MAX_DEPTH};

// ============================================================================
// Values
// ============================================================================

#[test]
fn parses_scalars() {
    let mut doc = Document::new();
    let null = doc_parse(&mut doc, b"null");
    assert!(doc.is_null(null));
    let yes = doc_parse(&mut doc, b"true");
    assert!(doc.is_true(yes));
    let no = doc_parse(&mut doc, b"false");
    assert!(doc.is_false(no));

    let number = doc_parse(&mut doc, b"-12.75");
    assert_eq!(doc.number_value(number), Some(-12.75));

    let string = doc_parse(&mut doc, br#""hello""#);
    assert_eq!(doc.string_value(string), Some("hello"));
}

fn doc_parse(doc: &mut Document, input: &[u8]) -> jdom_core::NodeId {
    doc.parse(input)
        .unwrap_or_else(|error| panic!("parse failed for {input:?}: {error}"))
}

#[test]
fn parses_nested_structure_in_order() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, br#"{"a":[1,{"b":null}],"c":{"d":[true,false]}}"#);
    assert!(doc.is_object(root));
    assert_eq!(doc.array_size(root), Some(2));

    let a = doc.get(root, "a", KeyMatch::Exact).unwrap();
    assert!(doc.is_array(a));
    assert_eq!(doc.array_size(a), Some(2));

    let inner = doc.item(a, 1).unwrap();
    assert!(doc.has(inner, "b", KeyMatch::Exact));

    // members keep their arrival order
    assert_eq!(doc.key(doc.children(root)[0]), Some("a"));
    assert_eq!(doc.key(doc.children(root)[1]), Some("c"));
}

#[test]
fn keeps_duplicate_keys_and_finds_the_first() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, br#"{"k":1,"k":2}"#);
    assert_eq!(doc.array_size(root), Some(2));
    let first = doc.get(root, "k", KeyMatch::Exact).unwrap();
    assert_eq!(doc.number_value(first), Some(1.0));
}

#[test]
fn skips_a_leading_utf8_bom() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, b"\xEF\xBB\xBF{\"a\":1}");
    assert!(doc.is_object(root));
}

// ============================================================================
// Strings & escapes
// ============================================================================

#[test]
fn processes_the_standard_escape_set() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, br#""\" \\ \/ \b \f \n \r \t""#);
    assert_eq!(
        doc.string_value(root),
        Some("\" \\ / \u{8} \u{c} \n \r \t")
    );
}

#[test]
fn decodes_unicode_escapes_and_surrogate_pairs() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, br#""caf\u00e9 \ud83d\ude00""#);
    assert_eq!(doc.string_value(root), Some("café 😀"));
}

#[test]
fn passes_utf8_content_through_unescaped() {
    let mut doc = Document::new();
    let input = "\"caf\u{e9} \u{4f60}\u{597d}\"";
    let root = doc_parse(&mut doc, input.as_bytes());
    assert_eq!(doc.string_value(root), Some("café 你好"));
}

#[test]
fn rejects_malformed_escapes() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(br#""\x""#),
        Err(ParseError::InvalidEscape { offset: 1 })
    ));
    // lone high surrogate
    assert!(matches!(
        doc.parse(br#""\ud800""#),
        Err(ParseError::InvalidEscape { .. })
    ));
    // lone low surrogate
    assert!(matches!(
        doc.parse(br#""\udc00""#),
        Err(ParseError::InvalidEscape { .. })
    ));
    // high surrogate followed by a non-surrogate escape
    assert!(matches!(
        doc.parse(br#""\ud83dA""#),
        Err(ParseError::InvalidEscape { .. })
    ));
}

#[test]
fn rejects_unescaped_control_characters() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b"\"a\x01b\""),
        Err(ParseError::Syntax { offset: 2, .. })
    ));
}

#[test]
fn rejects_invalid_utf8_in_strings() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b"\"\xFF\""),
        Err(ParseError::InvalidUtf8 { offset: 0 })
    ));
}

#[test]
fn rejects_an_unterminated_string() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b"\"abc"),
        Err(ParseError::UnexpectedEnd { .. })
    ));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn parses_doubles_with_correct_rounding() {
    let mut doc = Document::new();
    let tenth = doc_parse(&mut doc, b"0.1");
    assert_eq!(doc.number_value(tenth), Some(0.1));

    let exp = doc_parse(&mut doc, b"1e300");
    assert_eq!(doc.number_value(exp), Some(1e300));

    // beyond 2^53 the nearest representable double wins, silently
    let big = doc_parse(&mut doc, b"9007199254740993");
    assert_eq!(doc.number_value(big), Some(9007199254740992.0));
}

#[test]
fn overflowing_literals_saturate_without_error() {
    let mut doc = Document::new();
    let root = doc_parse(&mut doc, b"1e999");
    assert!(doc.number_value(root).unwrap().is_infinite());
    // a saturated number has no JSON rendering any more
    assert_eq!(doc.print(root, false), None);
}

#[test]
fn rejects_number_grammar_violations() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b"1."),
        Err(ParseError::InvalidNumber { offset: 0 })
    ));
    assert!(matches!(
        doc.parse(b"1e"),
        Err(ParseError::InvalidNumber { offset: 0 })
    ));
    assert!(matches!(
        doc.parse(b"-"),
        Err(ParseError::InvalidNumber { offset: 0 })
    ));
    assert!(matches!(doc.parse(b".5"), Err(ParseError::Syntax { .. })));
    assert!(matches!(doc.parse(b"+1"), Err(ParseError::Syntax { .. })));
    // a leading zero ends the integer part, so the rest is trailing data
    assert!(matches!(
        doc.parse(b"01"),
        Err(ParseError::TrailingData { offset: 1 })
    ));
}

// ============================================================================
// Errors, offsets, cleanup
// ============================================================================

#[test]
fn reports_the_offset_of_the_failure() {
    let mut doc = Document::new();
    let error = doc.parse(br#"{"a":x}"#).unwrap_err();
    assert!(matches!(error, ParseError::Syntax { offset: 5, .. }));
    assert_eq!(error.offset(), 5);

    let error = doc.parse(br#"{"a" 1}"#).unwrap_err();
    assert_eq!(error.offset(), 5);
}

#[test]
fn empty_or_blank_input_is_an_error() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b""),
        Err(ParseError::UnexpectedEnd { offset: 0 })
    ));
    assert!(matches!(
        doc.parse(b"   "),
        Err(ParseError::UnexpectedEnd { offset: 3 })
    ));
}

#[test]
fn a_failed_parse_leaves_no_partial_tree() {
    let mut doc = Document::new();
    assert!(doc.parse(br#"{"a":[1,2,}"#).is_err());
    assert_eq!(doc.node_count(), 0);

    assert!(doc.parse(br#"[{"k":1},{"k":]"#).is_err());
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn strict_mode_rejects_trailing_data() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.parse(b"{} extra"),
        Err(ParseError::TrailingData { offset: 3 })
    ));
    // trailing whitespace alone is fine
    assert!(doc.parse(b"{}  \n").is_ok());
}

#[test]
fn lenient_mode_reports_the_consumed_offset() {
    let mut doc = Document::new();
    let options = ParseOptions {
        require_all_consumed: false,
        max_depth: DEFAULT_MAX_DEPTH,
    };
    let parsed = doc.parse_with_options(b"42 tail", &options).unwrap();
    assert_eq!(doc.number_value(parsed.root), Some(42.0));
    assert_eq!(parsed.consumed, 3);
}

// ============================================================================
// Depth limiting
// ============================================================================

fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut input = Vec::with_capacity(depth * 2 + 1);
    input.extend(std::iter::repeat_n(b'[', depth));
    input.push(b'1');
    input.extend(std::iter::repeat_n(b']', depth));
    input
}

#[test]
fn nesting_at_the_ceiling_succeeds_and_beyond_fails() {
    let mut doc = Document::new();
    let options = ParseOptions {
        require_all_consumed: true,
        max_depth: 10,
    };

    assert!(doc.parse_with_options(&nested_arrays(10), &options).is_ok());

    let error = doc
        .parse_with_options(&nested_arrays(11), &options)
        .unwrap_err();
    assert!(matches!(error, ParseError::DepthLimit { limit: 10, .. }));
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn deeply_nested_input_fails_cleanly_at_the_default_ceiling() {
    let mut doc = Document::new();
    let error = doc.parse(&nested_arrays(DEFAULT_MAX_DEPTH + 1)).unwrap_err();
    assert!(matches!(error, ParseError::DepthLimit { .. }));
}

// ============================================================================
// Minify
// ============================================================================

fn minified(input: &[u8]) -> Vec<u8> {
    let mut buf = input.to_vec();
    minify(&mut buf);
    buf
}

#[test]
fn minify_strips_whitespace_outside_strings() {
    assert_eq!(
        minified(b"{ \"a\" : [ 1 , 2 ] }"),
        b"{\"a\":[1,2]}".to_vec()
    );
}

#[test]
fn minify_preserves_string_interiors() {
    assert_eq!(
        minified(br#"{"a b":" c  d "}"#),
        br#"{"a b":" c  d "}"#.to_vec()
    );
}

#[test]
fn minify_tracks_escapes_inside_strings() {
    assert_eq!(
        minified(br#"{"a":"x \" y"}"#),
        br#"{"a":"x \" y"}"#.to_vec()
    );
}

#[test]
fn minify_strips_line_and_block_comments() {
    assert_eq!(
        minified(b"// header\n{\"a\": /* inline */ 1}\n"),
        b"{\"a\":1}".to_vec()
    );
    // a comment marker inside a string is content, not a comment
    assert_eq!(
        minified(br#"{"url":"http://example.com"}"#),
        br#"{"url":"http://example.com"}"#.to_vec()
    );
}

#[test]
fn minify_then_parse_matches_the_original() {
    let text = br#"{ "nums" : [ 1 , 2.5 , 3 ] , "s" : "a b" } "#;
    let mut doc = Document::new();
    let original = doc.parse(text).unwrap();

    let mut buf = text.to_vec();
    minify(&mut buf);
    let mini = doc.parse(&buf).unwrap();

    assert!(doc.compare(original, mini, true));
    assert_eq!(
        doc.print(mini, false).unwrap(),
        r#"{"nums":[1,2.5,3],"s":"a b"}"#
    );
}
