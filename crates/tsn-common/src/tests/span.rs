use super::*;

#[test]
fn new_and_len() {
    let s = Span::new(3, 9);
    assert_eq!(s.len(), 6);
    assert!(!s.is_empty());
    assert!(s.contains(3));
    assert!(s.contains(8));
    assert!(!s.contains(9));
}

#[test]
fn empty_at() {
    let s = Span::at(5);
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
    assert!(!s.contains(5));
}

#[test]
fn merge_covers_both() {
    let a = Span::new(2, 4);
    let b = Span::new(7, 11);
    assert_eq!(a.merge(b), Span::new(2, 11));
    assert_eq!(b.merge(a), Span::new(2, 11));
}

#[test]
fn synthetic_roundtrip() {
    let s = Span::synthetic();
    assert!(s.is_synthetic());
    assert!(!Span::new(0, 1).is_synthetic());
}

#[test]
fn display_format() {
    assert_eq!(Span::new(1, 4).to_string(), "1..4");
}
