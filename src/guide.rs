//! Guide coordinates and sequences.
//!
//! Every conversion between PAM matches, anchors, guide spans and output
//! coordinates happens here. Genome positions are 1-based throughout; the
//! reference is read with 0-based half-open coordinates and candidates report
//! 0-based half-open spans.
//!
//! The *anchor* of a PAM is the PAM base adjacent to the guide, given in
//! forward-strand coordinates. For a 3' PAM on the forward strand this is the
//! first PAM base and the guide lies upstream of it; for a 3' PAM on the
//! reverse strand it is the last PAM base (in forward coordinates) and the
//! guide lies downstream. 5' PAMs swap the two.

use bio::alphabets::dna;
use bio_types::strand::Strand;

use crate::cas::{CasProfile, Orientation};
use crate::constants::SENTINEL_BASE;
use crate::errors::*;
use crate::haplotype::Haplotype;
use crate::pam::Match;
use crate::reference::Reference;

/// Closed interval of 1-based positions; empty when `last < first`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub first: i64,
    pub last: i64,
}

impl Span {
    pub fn new(first: i64, last: i64) -> Span {
        Span { first, last }
    }

    pub fn len(&self) -> usize {
        if self.last < self.first {
            0
        } else {
            (self.last - self.first + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pos: i64) -> bool {
        self.first <= pos && pos <= self.last
    }

    pub fn covers(&self, other: &Span) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    /// True if the span lies on a chromosome of length `len`
    pub fn fits(&self, len: u64) -> bool {
        self.first >= 1 && self.last <= len as i64
    }

    /// 0-based, inclusive start
    pub fn start(&self) -> u64 {
        (self.first - 1) as u64
    }

    /// 0-based, exclusive stop
    pub fn stop(&self) -> u64 {
        self.last as u64
    }
}

/// Side of the PAM, in forward coordinates, on which the guide lies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Upstream,
    Downstream,
}

impl Side {
    pub fn of(orientation: Orientation, strand: Strand) -> Side {
        match (orientation, strand) {
            (Orientation::ThreePrime, Strand::Reverse) => Side::Downstream,
            (Orientation::FivePrime, Strand::Reverse) => Side::Upstream,
            (Orientation::ThreePrime, _) => Side::Upstream,
            (Orientation::FivePrime, _) => Side::Downstream,
        }
    }

    /// 1-based anchor of a match, relative to the scanned sequence
    pub fn anchor(self, m: &Match) -> u64 {
        match self {
            Side::Upstream => m.start as u64 + 1,
            Side::Downstream => m.end as u64,
        }
    }

    pub fn guide(self, anchor: i64, guide_length: usize) -> Span {
        let guide_length = guide_length as i64;

        match self {
            Side::Upstream => Span::new(anchor - guide_length, anchor - 1),
            Side::Downstream => Span::new(anchor + 1, anchor + guide_length),
        }
    }

    /// Span covered by the guide and its PAM
    pub fn frame(self, anchor: i64, guide_length: usize, pam_length: usize) -> Span {
        let guide_length = guide_length as i64;
        let pam_length = pam_length as i64;

        match self {
            Side::Upstream => Span::new(anchor - guide_length, anchor + pam_length - 1),
            Side::Downstream => Span::new(anchor - pam_length + 1, anchor + guide_length),
        }
    }

    /// Anchors of the PAMs whose guide contains `pos`
    pub fn anchors_covering(self, pos: i64, guide_length: usize) -> Span {
        let guide_length = guide_length as i64;

        match self {
            Side::Upstream => Span::new(pos + 1, pos + guide_length),
            Side::Downstream => Span::new(pos - guide_length, pos - 1),
        }
    }
}

pub fn guide_span(cas: &CasProfile, strand: Strand, anchor: i64) -> Span {
    Side::of(cas.orientation, strand).guide(anchor, cas.guide_length)
}

/// 1-based position of `pos` in the guide+PAM sequence as read 5' to 3' on
/// the strand of the guide. Positions outside the frame yield values below 1
/// or above the frame length.
pub fn position_in_guide(cas: &CasProfile, strand: Strand, anchor: i64, pos: i64) -> i64 {
    let side = Side::of(cas.orientation, strand);
    let frame = side.frame(anchor, cas.guide_length, cas.pam_length());

    match strand {
        Strand::Reverse => frame.last - pos + 1,
        _ => pos - frame.first + 1,
    }
}

pub fn read_span<R: Reference + ?Sized>(reference: &R, span: Span) -> Result<Vec<u8>> {
    if span.is_empty() {
        Ok(Vec::new())
    } else if span.first < 1 {
        Err(ErrorKind::OutOfBounds(
            reference.name().into(),
            0,
            span.stop(),
            reference.len(),
        )
        .into())
    } else {
        reference.fetch(span.start(), span.stop())
    }
}

/// Relationship of a variant to the PAM a guide is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideKind {
    NearPam,
    DestroysPam,
    MakesPam,
}

/// Outcome of building the guides of a PAM for a variant
#[derive(Clone, Debug, PartialEq)]
pub enum Built {
    Guide(GuideWindow),
    /// The guide does not fit on the chromosome or the haplotype
    OffSequence,
    /// The anchor base is removed by the alternate allele
    AnchorDeleted,
}

impl Built {
    pub fn guide(self) -> Option<GuideWindow> {
        match self {
            Built::Guide(window) => Some(window),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GuideWindow {
    pub strand: Strand,
    pub anchor: u64,
    pub span: Span,
    pub ref_sequence: Vec<u8>,
    pub alt_sequence: Vec<u8>,
    pub variant_position_in_guide: Option<i64>,
}

pub struct WindowBuilder<'a, R: ?Sized> {
    reference: &'a R,
    cas: &'a CasProfile,
    raw_strand: bool,
}

impl<'a, R: Reference + ?Sized> WindowBuilder<'a, R> {
    /// With `raw_strand` set, reverse-strand guides are reported as found on
    /// the forward strand instead of being reverse complemented.
    pub fn new(reference: &'a R, cas: &'a CasProfile, raw_strand: bool) -> Self {
        WindowBuilder {
            reference,
            cas,
            raw_strand,
        }
    }

    fn orient(&self, strand: Strand, sequence: Vec<u8>) -> Vec<u8> {
        match strand {
            Strand::Reverse if !self.raw_strand => dna::revcomp(&sequence),
            _ => sequence,
        }
    }

    fn sentinel(&self) -> Vec<u8> {
        vec![SENTINEL_BASE; self.cas.guide_length]
    }

    fn read_reference(&self, strand: Strand, anchor: u64) -> Result<Option<(Span, Vec<u8>)>> {
        let span = guide_span(self.cas, strand, anchor as i64);
        if !span.fits(self.reference.len()) {
            return Ok(None);
        }

        let sequence = read_span(self.reference, span)?;

        Ok(Some((span, self.orient(strand, sequence))))
    }

    /// Guide for a PAM unaffected by any variant; both sequences are the
    /// reference guide.
    pub fn reference(&self, strand: Strand, anchor: u64) -> Result<Option<GuideWindow>> {
        Ok(self
            .read_reference(strand, anchor)?
            .map(|(span, sequence)| GuideWindow {
                strand,
                anchor,
                span,
                ref_sequence: sequence.clone(),
                alt_sequence: sequence,
                variant_position_in_guide: None,
            }))
    }

    /// Builds the reference and alternate guides for a PAM affected by the
    /// variant of `haplotype`.
    ///
    /// For `MakesPam` the anchor is a haplotype coordinate; otherwise it is a
    /// reference coordinate.
    pub fn build(
        &self,
        strand: Strand,
        kind: GuideKind,
        anchor: u64,
        haplotype: &Haplotype,
    ) -> Result<Built> {
        let pos = haplotype.variant_pos();

        let (span, frame_anchor, ref_sequence, alt_sequence) = match kind {
            GuideKind::NearPam => {
                let projected = match haplotype.project(anchor as i64) {
                    Some(value) => value,
                    None => return Ok(Built::AnchorDeleted),
                };

                let (span, ref_sequence) = match self.read_reference(strand, anchor)? {
                    Some(value) => value,
                    None => return Ok(Built::OffSequence),
                };

                let alt_span = guide_span(self.cas, strand, projected);
                let alt_sequence = match haplotype.read(alt_span) {
                    Some(sequence) => self.orient(strand, sequence),
                    None => return Ok(Built::OffSequence),
                };

                (span, projected, ref_sequence, alt_sequence)
            }
            GuideKind::DestroysPam => match self.read_reference(strand, anchor)? {
                Some((span, ref_sequence)) => (span, anchor as i64, ref_sequence, self.sentinel()),
                None => return Ok(Built::OffSequence),
            },
            GuideKind::MakesPam => {
                let span = guide_span(self.cas, strand, anchor as i64);
                let alt_sequence = match haplotype.read(span) {
                    Some(sequence) if span.first >= 1 => self.orient(strand, sequence),
                    _ => return Ok(Built::OffSequence),
                };

                (span, anchor as i64, self.sentinel(), alt_sequence)
            }
        };

        Ok(Built::Guide(GuideWindow {
            strand,
            anchor,
            span,
            ref_sequence,
            alt_sequence,
            variant_position_in_guide: Some(position_in_guide(
                self.cas,
                strand,
                frame_anchor,
                pos,
            )),
        }))
    }
}
