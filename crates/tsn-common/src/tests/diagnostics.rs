use super::*;
use crate::span::Span;

#[test]
fn from_code_substitutes_arguments() {
    let d = Diagnostic::from_code(
        "main.ts",
        Span::new(0, 4),
        diagnostic_codes::GENERIC_ARITY_MISMATCH,
        &["Box", "1", "2"],
    );
    assert_eq!(d.code, 2314);
    assert_eq!(
        d.message_text,
        "Generic type 'Box' requires 1 type argument(s) but got 2."
    );
    assert!(d.is_fatal());
}

#[test]
fn display_code_uses_tsn_prefix() {
    let d = Diagnostic::error("m.ts", Span::at(0), "boom", 5110);
    assert_eq!(d.display_code(), "TSN5110");
}

#[test]
fn spec_fixed_codes_are_present() {
    // These two numbers are contractual and must never move.
    assert_eq!(diagnostic_codes::INTEGER_WIDTH_MISMATCH, 5110);
    assert_eq!(diagnostic_codes::UNSUPPORTED_LITERAL_TYPE, 7414);
    assert!(get_message_template(5110).is_some());
    assert!(get_message_template(7414).is_some());
}

#[test]
fn warnings_are_not_fatal() {
    let d = Diagnostic::from_code(
        "m.ts",
        Span::at(0),
        diagnostic_codes::UNSUPPORTED_CONSTRUCT,
        &["with"],
    );
    assert!(!d.is_fatal());
}

#[test]
fn table_is_sorted_and_unique() {
    let codes: Vec<u32> = data::DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(codes, sorted);
}
