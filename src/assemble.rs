use std::collections::HashSet;

use bio_types::strand::Strand;
use tracing::{debug, warn};

use crate::cas::CasProfile;
use crate::classify::Classification;
use crate::errors::*;
use crate::guide::{guide_span, Built, GuideKind, GuideWindow, Side, Span, WindowBuilder};
use crate::haplotype::Haplotype;
use crate::index::ChromosomeSites;
use crate::pam::STRANDS;
use crate::reference::Reference;
use crate::variant::Variant;

/// Rule of the assembler that produced a guide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Reference,
    Amended,
    CreatedPam,
    DestroyedPam,
    NearPam,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Reference => "reference",
            Origin::Amended => "amended",
            Origin::CreatedPam => "created_pam",
            Origin::DestroyedPam => "destroyed_pam",
            Origin::NearPam => "near_pam",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GuideCandidate {
    pub chrom: String,
    /// 0-based start of the guide
    pub start: u64,
    /// 0-based, exclusive end of the guide
    pub stop: u64,
    pub ref_allele: Option<String>,
    pub alt_allele: Option<String>,
    pub variant_position: Option<u64>,
    pub variant_position_in_guide: Option<i64>,
    pub ref_sequence: Vec<u8>,
    pub alt_sequence: Vec<u8>,
    pub strand: Strand,
    pub cas_type: &'static str,
    pub origin: Origin,
    pub pam_position: u64,
}

/// A variant carried by the sample, with its effect on the PAMs of one nuclease
pub struct Classified<'a> {
    pub variant: &'a Variant,
    pub haplotype: &'a Haplotype,
    pub classification: Classification,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub reference: usize,
    pub amended: usize,
    pub created: usize,
    pub destroyed: usize,
    pub near_pam: usize,
    pub disqualified: usize,
    pub multi_variant: usize,
    pub out_of_bounds: usize,
    pub anchor_deleted: usize,
}

impl AssemblyStats {
    pub fn emitted(&self) -> usize {
        self.reference + self.amended + self.created + self.destroyed + self.near_pam
    }

    pub fn merge(&mut self, other: &AssemblyStats) {
        self.reference += other.reference;
        self.amended += other.amended;
        self.created += other.created;
        self.destroyed += other.destroyed;
        self.near_pam += other.near_pam;
        self.disqualified += other.disqualified;
        self.multi_variant += other.multi_variant;
        self.out_of_bounds += other.out_of_bounds;
        self.anchor_deleted += other.anchor_deleted;
    }

    fn record(&mut self, origin: Origin) {
        match origin {
            Origin::Reference => self.reference += 1,
            Origin::Amended => self.amended += 1,
            Origin::CreatedPam => self.created += 1,
            Origin::DestroyedPam => self.destroyed += 1,
            Origin::NearPam => self.near_pam += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct Assembly {
    pub candidates: Vec<GuideCandidate>,
    pub stats: AssemblyStats,
}

/// Builds the guides of one nuclease on one chromosome.
///
/// Variants passed to the assembler must be sorted by position and carry the
/// alternate allele.
pub struct Assembler<'a, R: ?Sized> {
    chrom: &'a str,
    reference: &'a R,
    cas: &'a CasProfile,
    sites: &'a ChromosomeSites,
    builder: WindowBuilder<'a, R>,
    regions: Option<&'a [Span]>,
    assembly: Assembly,
}

impl<'a, R: Reference + ?Sized> Assembler<'a, R> {
    pub fn new(
        chrom: &'a str,
        reference: &'a R,
        cas: &'a CasProfile,
        sites: &'a ChromosomeSites,
        raw_strand: bool,
    ) -> Self {
        Assembler {
            chrom,
            reference,
            cas,
            sites,
            builder: WindowBuilder::new(reference, cas, raw_strand),
            regions: None,
            assembly: Assembly::default(),
        }
    }

    /// Restricts guides to PAMs anchored in `regions`, which must be sorted
    /// and non-overlapping.
    pub fn with_regions(mut self, regions: &'a [Span]) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Emits a guide for every PAM, amended with the homozygous variant in
    /// its guide, plus guides for PAMs created by a variant or destroyed on
    /// one of the two copies. PAMs whose guide contains a heterozygous
    /// variant, or that any variant removes, are left out; a PAM moved by an
    /// indel is emitted at its new anchor as a created PAM.
    pub fn personalized(mut self, variants: &[Classified]) -> Result<Assembly> {
        for &strand in &STRANDS {
            let lost: HashSet<u64> = variants
                .iter()
                .flat_map(|v| v.classification.diff(strand).lost.iter().copied())
                .collect();

            for anchors in self.anchors(strand) {
                for &anchor in anchors {
                    self.personalize(strand, anchor, variants, &lost)?;
                }
            }
        }

        for classified in variants {
            self.pam_changes(classified)?;
        }

        Ok(self.finish())
    }

    /// Emits guides that only target the alternate allele of a heterozygous
    /// variant: guides of PAMs near the variant and of PAMs it creates or
    /// destroys.
    pub fn allele_specific(mut self, variants: &[Classified]) -> Result<Assembly> {
        let sites = self.sites;

        for classified in variants.iter().filter(|v| v.variant.is_heterozygous()) {
            let pos = classified.variant.pos as i64;

            for &strand in &STRANDS {
                let side = Side::of(self.cas.orientation, strand);
                let covering = side.anchors_covering(pos, self.cas.guide_length);

                for &anchor in sites.in_span(strand, covering) {
                    if classified.classification.loses(strand, anchor) {
                        self.assembly.stats.disqualified += 1;
                    } else if self.in_region(anchor) {
                        self.emit(Origin::NearPam, GuideKind::NearPam, strand, anchor, classified)?;
                    }
                }
            }

            self.pam_changes(classified)?;
        }

        Ok(self.finish())
    }

    fn personalize(
        &mut self,
        strand: Strand,
        anchor: u64,
        variants: &[Classified],
        lost: &HashSet<u64>,
    ) -> Result<()> {
        let span = guide_span(self.cas, strand, anchor as i64);
        if !span.fits(self.reference.len()) {
            debug!("guide of PAM at {}:{} runs off the chromosome", self.chrom, anchor);
            self.assembly.stats.out_of_bounds += 1;
            return Ok(());
        }

        let in_guide = overlapping(variants, span);
        if lost.contains(&anchor) || in_guide.iter().any(|v| v.variant.is_heterozygous()) {
            self.assembly.stats.disqualified += 1;
            return Ok(());
        }

        match in_guide {
            [] => {
                if let Some(window) = self.builder.reference(strand, anchor)? {
                    self.push(Origin::Reference, None, window);
                }
            }
            [classified] => {
                self.emit(Origin::Amended, GuideKind::NearPam, strand, anchor, classified)?;
            }
            _ => {
                let err = Error::from(ErrorKind::UnsupportedMultiVariantWindow(
                    self.chrom.into(),
                    anchor,
                    in_guide.len(),
                ));

                warn!("skipping guide: {}", err);
                self.assembly.stats.multi_variant += 1;
            }
        }

        Ok(())
    }

    /// Guides of every PAM only found with the alternate allele, and of every
    /// PAM a heterozygous variant removes from one copy.
    ///
    /// Anchors are taken from the per-strand differences rather than the
    /// effect flags, so a PAM that an indel moves without changing the number
    /// of PAMs is still reported at its new anchor.
    fn pam_changes(&mut self, classified: &Classified) -> Result<()> {
        let heterozygous = classified.variant.is_heterozygous();

        for &strand in &STRANDS {
            let diff = classified.classification.diff(strand);

            for &anchor in &diff.gained {
                if self.in_region(anchor) {
                    self.emit(Origin::CreatedPam, GuideKind::MakesPam, strand, anchor, classified)?;
                }
            }

            if heterozygous {
                for &anchor in &diff.lost {
                    if self.in_region(anchor) {
                        self.emit(
                            Origin::DestroyedPam,
                            GuideKind::DestroysPam,
                            strand,
                            anchor,
                            classified,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    fn emit(
        &mut self,
        origin: Origin,
        kind: GuideKind,
        strand: Strand,
        anchor: u64,
        classified: &Classified,
    ) -> Result<()> {
        match self.builder.build(strand, kind, anchor, classified.haplotype)? {
            Built::Guide(window) => self.push(origin, Some(classified.variant), window),
            Built::OffSequence => {
                debug!(
                    "skipping {} guide of PAM at {}:{} ({}) for variant at {}; \
                     guide runs off the sequence",
                    origin.as_str(),
                    self.chrom,
                    anchor,
                    strand.strand_symbol(),
                    classified.variant.pos,
                );

                self.assembly.stats.out_of_bounds += 1;
            }
            Built::AnchorDeleted => {
                debug!(
                    "skipping {} guide of PAM at {}:{} ({}); anchor deleted by variant at {}",
                    origin.as_str(),
                    self.chrom,
                    anchor,
                    strand.strand_symbol(),
                    classified.variant.pos,
                );

                self.assembly.stats.anchor_deleted += 1;
            }
        }

        Ok(())
    }

    fn push(&mut self, origin: Origin, variant: Option<&Variant>, window: GuideWindow) {
        self.assembly.stats.record(origin);
        self.assembly.candidates.push(GuideCandidate {
            chrom: self.chrom.into(),
            start: window.span.start(),
            stop: window.span.stop(),
            ref_allele: variant.map(|v| v.ref_allele.clone()),
            alt_allele: variant.map(|v| v.alt_allele.clone()),
            variant_position: variant.map(|v| v.pos),
            variant_position_in_guide: window.variant_position_in_guide,
            ref_sequence: window.ref_sequence,
            alt_sequence: window.alt_sequence,
            strand: window.strand,
            cas_type: self.cas.name,
            origin,
            pam_position: window.anchor,
        });
    }

    /// Anchors on `strand` that guides are built for
    fn anchors(&self, strand: Strand) -> Vec<&'a [u64]> {
        let sites = self.sites;

        match self.regions {
            Some(regions) => regions
                .iter()
                .map(|&span| sites.in_span(strand, span))
                .collect(),
            None => vec![sites.sites(strand)],
        }
    }

    fn in_region(&self, anchor: u64) -> bool {
        let anchor = anchor as i64;

        self.regions.map_or(true, |regions| {
            let idx = regions.partition_point(|span| span.last < anchor);
            regions.get(idx).map_or(false, |span| span.contains(anchor))
        })
    }

    fn finish(mut self) -> Assembly {
        self.assembly
            .candidates
            .sort_by_key(|candidate| (candidate.start, candidate.stop));

        self.assembly
    }
}

/// Variants whose position lies within `span`
fn overlapping<'v, 'a>(variants: &'v [Classified<'a>], span: Span) -> &'v [Classified<'a>] {
    let start = variants.partition_point(|v| (v.variant.pos as i64) < span.first);
    let end = variants.partition_point(|v| (v.variant.pos as i64) <= span.last);

    &variants[start..end.max(start)]
}
