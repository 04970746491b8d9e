use std::cmp;

use crate::errors::*;
use crate::guide::{read_span, Span};
use crate::reference::Reference;
use crate::variant::Variant;

/// Position of a PAM anchor found in a haplotype, expressed in reference
/// coordinates where possible
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locus {
    Reference(i64),
    // Base introduced by the alternate allele; has no reference position
    Inserted(i64),
}

/// Reference sequence surrounding a variant with the alternate allele
/// substituted for the reference allele.
///
/// Haplotype coordinates equal reference coordinates up to and including the
/// prefix shared by both alleles, and are shifted by `len(alt) - len(ref)`
/// after the reference allele.
#[derive(Clone, Debug)]
pub struct Haplotype {
    first: i64,
    sequence: Vec<u8>,
    pos: i64,
    ref_len: i64,
    alt_len: i64,
}

impl Haplotype {
    /// Builds the haplotype with up to `flank` reference bases on each side of
    /// the reference allele, clamped to the chromosome.
    pub fn build<R: Reference + ?Sized>(
        reference: &R,
        variant: &Variant,
        flank: usize,
    ) -> Result<Haplotype> {
        let pos = variant.pos as i64;
        let ref_len = variant.ref_allele.len() as i64;
        let alt_len = variant.alt_allele.len() as i64;
        let flank = flank as i64;

        let left = Span::new(cmp::max(1, pos - flank), pos - 1);
        let right = Span::new(
            pos + ref_len,
            cmp::min(reference.len() as i64, pos + ref_len - 1 + flank),
        );

        let mut sequence = read_span(reference, left)?;
        sequence.extend(variant.alt_allele.as_bytes().to_ascii_uppercase());
        sequence.extend(read_span(reference, right)?);

        Ok(Haplotype {
            first: left.first,
            sequence,
            pos,
            ref_len,
            alt_len,
        })
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn span(&self) -> Span {
        Span::new(self.first, self.first + self.sequence.len() as i64 - 1)
    }

    pub fn variant_pos(&self) -> i64 {
        self.pos
    }

    pub fn shift(&self) -> i64 {
        self.alt_len - self.ref_len
    }

    /// Window of `radius` bases on either side of the alternate allele
    pub fn window(&self, radius: usize) -> Span {
        let span = self.span();
        let radius = radius as i64;

        Span::new(
            cmp::max(span.first, self.pos - radius),
            cmp::min(span.last, self.pos + self.alt_len - 1 + radius),
        )
    }

    /// Haplotype coordinate of a reference position; `None` for deleted bases
    pub fn project(&self, pos: i64) -> Option<i64> {
        if pos < self.pos + cmp::min(self.ref_len, self.alt_len) {
            Some(pos)
        } else if pos >= self.pos + self.ref_len {
            Some(pos + self.shift())
        } else {
            None
        }
    }

    /// Reference locus of a haplotype coordinate
    pub fn locus(&self, pos: i64) -> Locus {
        if pos < self.pos + cmp::min(self.ref_len, self.alt_len) {
            Locus::Reference(pos)
        } else if pos >= self.pos + self.alt_len {
            Locus::Reference(pos - self.shift())
        } else {
            Locus::Inserted(pos)
        }
    }

    /// Reads a span in haplotype coordinates, if covered by the haplotype
    pub fn read(&self, span: Span) -> Option<Vec<u8>> {
        if span.is_empty() || !self.span().covers(&span) {
            return None;
        }

        let start = (span.first - self.first) as usize;
        Some(self.sequence[start..start + span.len()].to_owned())
    }
}
