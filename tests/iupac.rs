extern crate pamvar;

use pamvar::iupac::{is_literal, matches, matches_pattern};

#[test]
fn test_basic_nucleotides() {
    // first
    assert!(matches(b'A', b'A'));
    assert!(!matches(b'A', b'C'));
    assert!(!matches(b'A', b'G'));
    assert!(!matches(b'A', b'T'));
    // last
    assert!(!matches(b'T', b'A'));
    assert!(!matches(b'T', b'C'));
    assert!(!matches(b'T', b'G'));
    assert!(matches(b'T', b'T'));
}

#[test]
fn test_case_insensitive() {
    assert!(matches(b'a', b'A'));
    assert!(matches(b'G', b'g'));
    assert!(matches(b'n', b't'));
    assert!(matches(b'r', b'a'));
}

#[test]
fn test_degenerate_query() {
    assert!(matches(b'R', b'A'));
    assert!(matches(b'R', b'G'));
    assert!(!matches(b'R', b'C'));
    assert!(!matches(b'R', b'T'));
    assert!(matches(b'M', b'C'));
    assert!(!matches(b'M', b'G'));
    assert!(matches(b'N', b'A'));
    assert!(matches(b'N', b'C'));
    assert!(matches(b'N', b'G'));
    assert!(matches(b'N', b'T'));
}

#[test]
fn test_ambiguous_candidates_never_match() {
    assert!(!matches(b'N', b'N'));
    assert!(!matches(b'N', b'R'));
    assert!(!matches(b'R', b'R'));
    assert!(!matches(b'N', b'-'));
    assert!(!matches(b'N', b'@'));
}

#[test]
fn test_matches_pattern() {
    assert!(matches_pattern(b"NGG", b"AGG"));
    assert!(matches_pattern(b"NGG", b"tgg"));
    assert!(!matches_pattern(b"NGG", b"NGG"));
    assert!(!matches_pattern(b"NGG", b"AGC"));
    assert!(!matches_pattern(b"NGG", b"AG"));
    assert!(matches_pattern(b"NNGRRT", b"ACGAGT"));
    assert!(!matches_pattern(b"NNGRRT", b"ACGCGT"));
}

#[test]
fn test_is_literal() {
    assert!(is_literal(b"A"));
    assert!(is_literal(b"acgtn"));
    assert!(!is_literal(b""));
    assert!(!is_literal(b"<DEL>"));
    assert!(!is_literal(b"*"));
    assert!(!is_literal(b"."));
    assert!(!is_literal(b"A,T"));
}
