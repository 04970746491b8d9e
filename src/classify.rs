use std::cmp;
use std::collections::BTreeMap;

use bio_types::strand::Strand;

use crate::cas::CasProfile;
use crate::errors::*;
use crate::guide::{read_span, Side, Span};
use crate::haplotype::{Haplotype, Locus};
use crate::index::ChromosomeSites;
use crate::pam::{self, STRANDS};
use crate::reference::Reference;
use crate::variant::Variant;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantPamEffect {
    pub makes_pam: bool,
    pub breaks_pam: bool,
    pub near_pam: bool,
}

/// Difference between the PAMs found on one strand of the reference window
/// and of the allele-substituted window
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrandDiff {
    pub ref_count: usize,
    pub alt_count: usize,
    // Anchors only found with the alternate allele, in haplotype coordinates
    pub gained: Vec<u64>,
    // Anchors only found in the reference, in reference coordinates
    pub lost: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    pub forward: StrandDiff,
    pub reverse: StrandDiff,
    pub effect: VariantPamEffect,
}

impl Classification {
    pub fn diff(&self, strand: Strand) -> &StrandDiff {
        match strand {
            Strand::Reverse => &self.reverse,
            _ => &self.forward,
        }
    }

    /// True if the PAM at `anchor` on `strand` is no longer found with the
    /// alternate allele
    pub fn loses(&self, strand: Strand, anchor: u64) -> bool {
        self.diff(strand).lost.binary_search(&anchor).is_ok()
    }
}

/// Returns true if `pos` lies in the guide of any PAM in `sites`
pub fn is_near_pam(cas: &CasProfile, sites: &ChromosomeSites, pos: u64) -> bool {
    STRANDS.iter().any(|&strand| {
        let side = Side::of(cas.orientation, strand);
        let anchors = side.anchors_covering(pos as i64, cas.guide_length);

        !sites.in_span(strand, anchors).is_empty()
    })
}

pub struct Classifier<'a, R: ?Sized> {
    reference: &'a R,
    cas: &'a CasProfile,
    sites: &'a ChromosomeSites,
    radius: usize,
}

impl<'a, R: Reference + ?Sized> Classifier<'a, R> {
    pub fn new(
        reference: &'a R,
        cas: &'a CasProfile,
        sites: &'a ChromosomeSites,
        radius: usize,
    ) -> Self {
        Classifier {
            reference,
            cas,
            sites,
            radius,
        }
    }

    /// Compares the PAMs within `radius` bases of the variant with and without
    /// the alternate allele. The haplotype must extend at least `radius` bases
    /// past either side of the allele.
    pub fn classify(&self, variant: &Variant, haplotype: &Haplotype) -> Result<Classification> {
        let pos = variant.pos as i64;
        let radius = self.radius as i64;
        let ref_window = Span::new(
            cmp::max(1, pos - radius),
            cmp::min(
                self.reference.len() as i64,
                pos + variant.ref_allele.len() as i64 - 1 + radius,
            ),
        );

        let ref_sequence = read_span(self.reference, ref_window)?;
        let alt_window = haplotype.window(self.radius);
        let alt_sequence = haplotype.read(alt_window).unwrap_or_default();

        let reference = (ref_window, ref_sequence.as_slice());
        let alternate = (alt_window, alt_sequence.as_slice());
        let forward = self.diff(Strand::Forward, reference, alternate, haplotype);
        let reverse = self.diff(Strand::Reverse, reference, alternate, haplotype);

        // Gains are checked first, so a gain on one strand wins over a loss on the other
        let gains =
            forward.alt_count > forward.ref_count || reverse.alt_count > reverse.ref_count;
        let losses =
            forward.ref_count > forward.alt_count || reverse.ref_count > reverse.alt_count;

        let effect = VariantPamEffect {
            makes_pam: gains,
            breaks_pam: !gains && losses,
            near_pam: is_near_pam(self.cas, self.sites, variant.pos),
        };

        Ok(Classification {
            forward,
            reverse,
            effect,
        })
    }

    fn diff(
        &self,
        strand: Strand,
        (ref_window, ref_sequence): (Span, &[u8]),
        (alt_window, alt_sequence): (Span, &[u8]),
        haplotype: &Haplotype,
    ) -> StrandDiff {
        let ref_anchors: BTreeMap<Locus, u64> = pam::find_anchors(self.cas, strand, ref_sequence)
            .into_iter()
            .map(|anchor| {
                let pos = ref_window.first + anchor as i64 - 1;
                (Locus::Reference(pos), pos as u64)
            })
            .collect();

        let alt_anchors: BTreeMap<Locus, u64> = pam::find_anchors(self.cas, strand, alt_sequence)
            .into_iter()
            .map(|anchor| {
                let pos = alt_window.first + anchor as i64 - 1;
                (haplotype.locus(pos), pos as u64)
            })
            .collect();

        let mut gained: Vec<u64> = alt_anchors
            .iter()
            .filter(|(locus, _)| !ref_anchors.contains_key(*locus))
            .map(|(_, &pos)| pos)
            .collect();
        gained.sort_unstable();

        let mut lost: Vec<u64> = ref_anchors
            .iter()
            .filter(|(locus, _)| !alt_anchors.contains_key(*locus))
            .map(|(_, &pos)| pos)
            .collect();
        lost.sort_unstable();

        StrandDiff {
            ref_count: ref_anchors.len(),
            alt_count: alt_anchors.len(),
            gained,
            lost,
        }
    }
}
