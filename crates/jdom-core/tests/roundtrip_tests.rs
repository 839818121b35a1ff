use jdom_core::{Document, KeyMatch, Ownership};

/// Assert that print → parse reproduces a structurally equal tree in both
/// print modes, and that an independent JSON reader agrees with the output.
fn assert_roundtrip(json: &str) {
    let mut doc = Document::new();
    let original = doc.parse(json.as_bytes()).expect("parse failed");
    for formatted in [false, true] {
        let printed = doc.print(original, formatted).expect("print failed");
        let reparsed = doc.parse(printed.as_bytes()).expect("reparse failed");
        assert!(
            doc.compare(original, reparsed, true),
            "roundtrip mismatch (formatted={formatted}):\n  input:   {json}\n  printed: {printed}"
        );
        let ours: serde_json::Value =
            serde_json::from_str(&printed).expect("printed output is not valid JSON");
        let theirs: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(
            ours, theirs,
            "independent reader disagrees (formatted={formatted}):\n  input:   {json}\n  printed: {printed}"
        );
    }
}

// ============================================================================
// Parsed-tree roundtrips
// ============================================================================

#[test]
fn roundtrip_scalars() {
    assert_roundtrip("null");
    assert_roundtrip("true");
    assert_roundtrip("false");
    assert_roundtrip("42");
    assert_roundtrip("-7.25");
    assert_roundtrip(r#""hello""#);
    assert_roundtrip(r#""""#);
}

#[test]
fn roundtrip_containers() {
    assert_roundtrip("[]");
    assert_roundtrip("{}");
    assert_roundtrip("[1,2,3]");
    assert_roundtrip(r#"{"a":1,"b":"two","c":[true,null],"d":{"e":{}}}"#);
    assert_roundtrip(r#"[[[1],[2]],{"deep":{"deeper":[{}]}}]"#);
}

#[test]
fn roundtrip_strings_with_escapes() {
    assert_roundtrip(r#""line1\nline2\ttabbed""#);
    assert_roundtrip(r#""say \"hi\" to \\ everyone""#);
    assert_roundtrip(r#""café 😀""#);
}

// ============================================================================
// Builder-built roundtrips
// ============================================================================

#[test]
fn built_tree_roundtrips_in_both_modes() {
    let mut doc = Document::new();
    let root = doc.create_object();
    doc.add_number(root, "count", 3.0).unwrap();
    doc.add_string(root, "name", "alpha").unwrap();
    let tags = doc.add_array(root, "tags").unwrap();
    let tag = doc.create_string("x");
    assert!(doc.append(tags, tag));
    let nested = doc.add_object(root, "nested").unwrap();
    doc.add_bool(nested, "flag", false).unwrap();
    doc.add_null(nested, "none").unwrap();

    for formatted in [false, true] {
        let printed = doc.print(root, formatted).unwrap();
        let reparsed = doc.parse(printed.as_bytes()).unwrap();
        assert!(
            doc.compare(root, reparsed, true),
            "formatted={formatted}: {printed}"
        );
    }
}

#[test]
fn detach_then_reinsert_reproduces_the_print() {
    let mut doc = Document::new();
    let root = doc.parse(br#"[1,"two",{"k":3},[4]]"#).unwrap();
    let before = doc.print(root, false).unwrap();
    for index in 0..4 {
        let node = doc.detach_from_array(root, index).unwrap();
        assert!(doc.insert(root, index, node));
        assert_eq!(doc.print(root, false).unwrap(), before, "index {index}");
    }
}

// ============================================================================
// Duplicate fidelity
// ============================================================================

#[test]
fn duplicate_is_deep_and_independent() {
    let mut doc = Document::new();
    let root = doc.parse(br#"{"num":123,"str":"hello"}"#).unwrap();

    let copy = doc.duplicate(root, true).unwrap();
    assert!(doc.compare(root, copy, true));

    let num = doc.get(copy, "num", KeyMatch::Exact).unwrap();
    doc.set_number(num, 456.0);
    assert!(!doc.compare(root, copy, true));

    assert_eq!(
        doc.print(root, false).unwrap(),
        r#"{"num":123,"str":"hello"}"#
    );
    assert_eq!(
        doc.print(copy, false).unwrap(),
        r#"{"num":456,"str":"hello"}"#
    );
}

#[test]
fn shallow_duplicate_of_a_container_is_empty() {
    let mut doc = Document::new();
    let root = doc.parse(b"[1,2,3]").unwrap();
    let copy = doc.duplicate(root, false).unwrap();
    assert!(doc.is_array(copy));
    assert_eq!(doc.array_size(copy), Some(0));
    assert_eq!(doc.parent(copy), None);
}

#[test]
fn duplicate_of_a_member_drops_the_member_name() {
    let mut doc = Document::new();
    let root = doc.parse(br#"{"k":[1]}"#).unwrap();
    let member = doc.get(root, "k", KeyMatch::Exact).unwrap();
    let copy = doc.duplicate(member, true).unwrap();
    assert_eq!(doc.key(copy), None);
    assert_eq!(doc.parent(copy), None);
    assert_eq!(doc.print(copy, false).unwrap(), "[1]");
}

#[test]
fn duplicate_of_an_alias_owns_its_copy() {
    let mut doc = Document::new();
    let owner = doc.create_array();
    let item = doc.create_string("v");
    assert!(doc.append(owner, item));
    let alias = doc.create_array_reference(owner).unwrap();

    let copy = doc.duplicate(alias, true).unwrap();
    assert_eq!(doc.ownership(copy), Some(Ownership::Owned));
    assert!(doc.compare(copy, owner, true));

    // the copy outlives the source owner
    assert!(doc.destroy(alias));
    assert!(doc.destroy(owner));
    assert_eq!(doc.print(copy, false).unwrap(), r#"["v"]"#);
}

// ============================================================================
// Numeric fidelity
// ============================================================================

#[test]
fn numeric_roundtrip_is_bit_exact() {
    let values = [
        0.1,
        -0.0,
        1e300,
        9007199254740993.0,
        2.2250738585072014e-308,
        1.7976931348623157e308,
        -123.456,
        1.0 / 3.0,
    ];
    let mut doc = Document::new();
    for &value in &values {
        let number = doc.create_number(value);
        let printed = doc.print(number, false).unwrap();
        let reparsed = doc.parse(printed.as_bytes()).unwrap();
        let got = doc.number_value(reparsed).unwrap();
        assert_eq!(
            got.to_bits(),
            value.to_bits(),
            "value {value:?} printed as {printed}"
        );
    }
}

#[test]
fn values_json_cannot_express_are_rejected_not_coerced() {
    let mut doc = Document::new();
    let nan = doc.create_number(f64::NAN);
    assert_eq!(doc.print(nan, false), None);
    let negative_infinity = doc.create_number(f64::NEG_INFINITY);
    assert_eq!(doc.print(negative_infinity, false), None);
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn parse_duplicate_mutate_print_scenario() {
    let mut doc = Document::new();
    let original = doc.parse(br#"{"num":123,"str":"hello"}"#).unwrap();

    let duplicate = doc.duplicate(original, true).unwrap();
    assert!(doc.compare(original, duplicate, true));

    let num = doc.get(duplicate, "num", KeyMatch::Exact).unwrap();
    assert_eq!(doc.set_number(num, 456.0), Some("456"));
    assert!(!doc.compare(original, duplicate, true));

    assert_eq!(
        doc.print(original, false).unwrap(),
        r#"{"num":123,"str":"hello"}"#
    );
    assert_eq!(
        doc.print(duplicate, false).unwrap(),
        r#"{"num":456,"str":"hello"}"#
    );
}
