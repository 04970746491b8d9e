use bio_types::strand::Strand;
use rayon::prelude::*;

use crate::cas::CasProfile;
use crate::guide::Side;
use crate::iupac;

pub const STRANDS: [Strand; 2] = [Strand::Forward, Strand::Reverse];

/// Half-open interval `[start, end)` of a motif match, relative to the
/// start of the scanned sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Finds all, possibly overlapping, occurrences of an IUPAC pattern
pub fn find_occurrences(pattern: &[u8], sequence: &[u8]) -> Vec<Match> {
    if pattern.is_empty() || pattern.len() > sequence.len() {
        return Vec::new();
    }

    sequence
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| iupac::matches_pattern(pattern, window))
        .map(|(start, _)| Match {
            start,
            end: start + pattern.len(),
        })
        .collect()
}

/// Parallel version of `find_occurrences` for whole-chromosome scans
pub fn par_find_occurrences(pattern: &[u8], sequence: &[u8]) -> Vec<Match> {
    if pattern.is_empty() || pattern.len() > sequence.len() {
        return Vec::new();
    }

    sequence
        .par_windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| iupac::matches_pattern(pattern, window))
        .map(|(start, _)| Match {
            start,
            end: start + pattern.len(),
        })
        .collect()
}

pub fn pattern(cas: &CasProfile, strand: Strand) -> &'static [u8] {
    match strand {
        Strand::Reverse => cas.reverse_pattern,
        _ => cas.forward_pattern,
    }
}

/// Returns the 1-based anchors, relative to the start of `sequence`, of
/// every PAM on the given strand, in increasing order.
pub fn find_anchors(cas: &CasProfile, strand: Strand, sequence: &[u8]) -> Vec<u64> {
    let side = Side::of(cas.orientation, strand);

    find_occurrences(pattern(cas, strand), sequence)
        .iter()
        .map(|m| side.anchor(m))
        .collect()
}
