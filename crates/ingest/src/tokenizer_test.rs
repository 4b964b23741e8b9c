//! Tests for the field iterator

use crate::tokenizer::{DEFAULT_QUOTE, DEFAULT_SEPARATOR, FieldIter};

fn tokens(data: &[u8], separator: u8) -> Vec<&[u8]> {
    FieldIter::new(data, separator, DEFAULT_QUOTE).collect()
}

#[test]
fn test_simple_fields() {
    assert_eq!(
        tokens(b"data;data2;data3", DEFAULT_SEPARATOR),
        vec![b"data".as_ref(), b"data2", b"data3"]
    );
}

#[test]
fn test_quoted_field_not_split() {
    // space-separated record with a quoted value containing the separator
    assert_eq!(
        tokens(b"A B \"C D\" E", b' '),
        vec![b"A".as_ref(), b"B", b"\"C D\"", b"E"]
    );
}

#[test]
fn test_quoted_field_keeps_quotes() {
    let fields = tokens(b"\"C D\"", b' ');
    assert_eq!(fields, vec![b"\"C D\"".as_ref()]);
}

#[test]
fn test_unterminated_quote_runs_to_end() {
    assert_eq!(tokens(b"A \"B C", b' '), vec![b"A".as_ref(), b"\"B C"]);
}

#[test]
fn test_empty_input_yields_nothing() {
    let mut iter = FieldIter::new(b"", DEFAULT_SEPARATOR, DEFAULT_QUOTE);
    assert!(!iter.has_next());
    assert_eq!(iter.next(), None);
}

#[test]
fn test_lone_separator_yields_one_empty_token() {
    assert_eq!(tokens(b";", DEFAULT_SEPARATOR), vec![b"".as_ref()]);
}

#[test]
fn test_consecutive_separators_yield_empty_tokens() {
    assert_eq!(
        tokens(b"a;;b;", DEFAULT_SEPARATOR),
        vec![b"a".as_ref(), b"", b"b"]
    );
}

#[test]
fn test_trailing_separator_is_consumed() {
    // a complete frame ends with its separator; no phantom empty token
    assert_eq!(tokens(b"data;", DEFAULT_SEPARATOR), vec![b"data".as_ref()]);
}

#[test]
fn test_no_trailing_separator() {
    assert_eq!(
        tokens(b"a;b", DEFAULT_SEPARATOR),
        vec![b"a".as_ref(), b"b"]
    );
}

#[test]
fn test_single_pass_cursor() {
    let mut iter = FieldIter::new(b"a;b;c;", DEFAULT_SEPARATOR, DEFAULT_QUOTE);
    assert!(iter.has_next());
    assert_eq!(iter.next(), Some(b"a".as_ref()));
    assert_eq!(iter.next(), Some(b"b".as_ref()));
    assert!(iter.has_next());
    assert_eq!(iter.next(), Some(b"c".as_ref()));
    assert!(!iter.has_next());
    assert_eq!(iter.next(), None);
    // exhausted for good
    assert_eq!(iter.next(), None);
}

#[test]
fn test_quote_inside_quoted_field_terminates_early() {
    // quotes are not escapable; the inner quote closes the field
    let fields = tokens(b"\"a\"\"b\"", b' ');
    assert_eq!(fields, vec![b"\"a\"".as_ref(), b"\"b\""]);
}
