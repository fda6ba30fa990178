//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used by body decode diagnostics.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.
//! Notes: Uses source include to exercise internal helper logic without widening API surface.

#[path = "../src/json/parse.rs"]
mod parse;

use parse::ParseFailureCategory;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct Body {
    name: String,
}

#[test]
fn category_mapping_separates_malformed_from_mistyped() {
    let syntax_err = parse::from_slice::<Value>(br#"{"a":}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&syntax_err),
        ParseFailureCategory::Syntax
    );

    let eof_err = parse::from_slice::<Value>(br#"{"a":"#).unwrap_err();
    assert_eq!(parse::categorize_error(&eof_err), ParseFailureCategory::Eof);

    let data_err = parse::from_slice::<Body>(br#"{"name":1}"#).unwrap_err();
    assert_eq!(parse::categorize_error(&data_err), ParseFailureCategory::Data);

    let unknown_err = parse::from_slice::<Body>(br#"{"name":"a","extra":true}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&unknown_err),
        ParseFailureCategory::Data
    );
}

#[test]
fn only_data_failures_count_as_well_formed() {
    assert!(ParseFailureCategory::Syntax.is_malformed());
    assert!(ParseFailureCategory::Eof.is_malformed());
    assert!(ParseFailureCategory::Io.is_malformed());
    assert!(!ParseFailureCategory::Data.is_malformed());
}

#[test]
fn empty_input_is_eof() {
    let err = parse::from_slice::<Value>(b"").unwrap_err();
    assert_eq!(parse::categorize_error(&err), ParseFailureCategory::Eof);
}

#[test]
fn hint_contains_category_and_context() {
    let err = parse::from_slice::<Value>(b"{\n  \"a\": nope }").unwrap_err();
    let hint = parse::hint_for_error(&err, "test.context");
    assert!(hint.contains("parse category: syntax"));
    assert!(hint.contains("context: test.context"));
    assert!(hint.contains("at line 2"));
}
