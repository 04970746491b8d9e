//! Per-chromosome driver: filters and classifies the variants of one
//! chromosome for every nuclease, then assembles guides from the variants
//! carried by the sample.

use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::assemble::{Assembler, AssemblyStats, Classified, GuideCandidate};
use crate::classify::{Classifier, VariantPamEffect};
use crate::config::{Config, Mode};
use crate::errors::*;
use crate::guide::Span;
use crate::haplotype::Haplotype;
use crate::index::{ChromosomeSites, PamIndex};
use crate::progress::ProgressBar;
use crate::reference::{resolve_name, FastaReference, Reference};
use crate::regions::Regions;
use crate::variant::{Variant, VariantFilter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub non_literal: usize,
    pub indel_too_large: usize,
    pub outside_chromosome: usize,
    pub non_carrier: usize,
}

impl FilterCounts {
    fn record(&mut self, filter: VariantFilter) {
        match filter {
            VariantFilter::NonLiteralAllele => self.non_literal += 1,
            VariantFilter::IndelTooLarge => self.indel_too_large += 1,
            VariantFilter::OutsideChromosome => self.outside_chromosome += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.non_literal + self.indel_too_large + self.outside_chromosome
    }
}

#[derive(Debug, Default)]
pub struct ChromosomeReport {
    pub chrom: String,
    /// Every variant with its effect for each configured nuclease, in order
    pub effects: Vec<(Variant, Vec<VariantPamEffect>)>,
    pub candidates: Vec<GuideCandidate>,
    pub stats: AssemblyStats,
    pub filtered: FilterCounts,
}

/// Classifies the variants of one chromosome and, if `assemble` is set,
/// builds guides from them. `sites` holds the PAM sites of the chromosome
/// for each nuclease of `config`, in the same order.
pub fn analyze_chromosome<R: Reference + ?Sized>(
    config: &Config,
    reference: &R,
    sites: &[&ChromosomeSites],
    chrom: &str,
    mut variants: Vec<Variant>,
    regions: Option<&[Span]>,
    assemble: bool,
) -> Result<ChromosomeReport> {
    variants.sort_by_key(|v| v.pos);

    let flank = config.flank();
    let mut filtered = FilterCounts::default();
    let mut kept: Vec<(usize, Haplotype)> = Vec::with_capacity(variants.len());
    for (idx, variant) in variants.iter().enumerate() {
        match variant.filter(config.max_indel, reference.len()) {
            Some(reason) => {
                debug!(
                    "skipping variant {}:{} {}>{}: {:?}",
                    chrom, variant.pos, variant.ref_allele, variant.alt_allele, reason
                );

                filtered.record(reason);
            }
            None => kept.push((idx, Haplotype::build(reference, variant, flank)?)),
        }
    }

    filtered.non_carrier = kept
        .iter()
        .filter(|(idx, _)| !variants[*idx].carries_alt())
        .count();

    let mut effects =
        vec![vec![VariantPamEffect::default(); config.profiles.len()]; variants.len()];
    let mut candidates = Vec::new();
    let mut stats = AssemblyStats::default();

    for (cas_idx, (cas, &sites)) in config.profiles.iter().zip(sites).enumerate() {
        let classifier = Classifier::new(reference, cas, sites, config.radius);

        let mut carriers = Vec::new();
        for (idx, haplotype) in &kept {
            let variant = &variants[*idx];
            let classification = classifier.classify(variant, haplotype)?;
            effects[*idx][cas_idx] = classification.effect;

            if variant.carries_alt() {
                carriers.push(Classified {
                    variant,
                    haplotype,
                    classification,
                });
            }
        }

        if assemble {
            let mut assembler = Assembler::new(chrom, reference, cas, sites, config.raw_strand);
            if let Some(regions) = regions {
                assembler = assembler.with_regions(regions);
            }

            let assembly = match config.mode {
                Mode::Personalized => assembler.personalized(&carriers)?,
                Mode::AlleleSpecific => assembler.allele_specific(&carriers)?,
            };

            debug!(
                "{} guides for {} on {}: {:?}",
                assembly.candidates.len(),
                cas.name,
                chrom,
                assembly.stats
            );
            stats.merge(&assembly.stats);
            candidates.extend(assembly.candidates);
        }
    }

    info!(
        "{}: {} variants, {} filtered ({} non-literal, {} large indels, {} outside chromosome), \
         {} without alternate allele; {} guides, {} disqualified, {} multi-variant, \
         {} off sequence, {} with deleted anchor",
        chrom,
        variants.len(),
        filtered.total(),
        filtered.non_literal,
        filtered.indel_too_large,
        filtered.outside_chromosome,
        filtered.non_carrier,
        stats.emitted(),
        stats.disqualified,
        stats.multi_variant,
        stats.out_of_bounds,
        stats.anchor_deleted,
    );

    Ok(ChromosomeReport {
        chrom: chrom.into(),
        effects: variants.into_iter().zip(effects).collect(),
        candidates,
        stats,
        filtered,
    })
}

/// Runs `analyze_chromosome` over chromosomes of an indexed FASTA file
pub struct Analysis<'a> {
    config: &'a Config,
    fasta: &'a FastaReference,
    indexes: &'a [PamIndex],
    regions: Option<&'a Regions>,
}

impl<'a> Analysis<'a> {
    /// `indexes` holds one index per nuclease of `config`, in the same order
    pub fn new(config: &'a Config, fasta: &'a FastaReference, indexes: &'a [PamIndex]) -> Self {
        Analysis {
            config,
            fasta,
            indexes,
            regions: None,
        }
    }

    pub fn with_regions(mut self, regions: &'a Regions) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Analyses chromosomes in batches of one per worker thread and passes
    /// each report to `sink` in the order of `groups`, so at most one batch
    /// of reports is held at a time.
    ///
    /// A chromosome that fails is logged and left out of the output; the
    /// names of failed chromosomes are returned. Errors from `sink` end the
    /// run.
    pub fn run<F>(
        &self,
        groups: Vec<(String, Vec<Variant>)>,
        assemble: bool,
        progress: &ProgressBar,
        mut sink: F,
    ) -> Result<Vec<String>>
    where
        F: FnMut(ChromosomeReport) -> Result<()>,
    {
        let batch_size = rayon::current_num_threads().max(1);
        let mut groups = groups.into_iter();
        let mut failed = Vec::new();

        loop {
            let batch: Vec<(String, Vec<Variant>)> = groups.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let reports: Vec<(String, Result<ChromosomeReport>)> = batch
                .into_par_iter()
                .map(|(chrom, variants)| {
                    let report = self
                        .chromosome(&chrom, variants, assemble)
                        .chain_err(|| format!("failed to analyse chromosome {:?}", chrom));

                    progress.inc(1);
                    (chrom, report)
                })
                .collect();

            for (chrom, report) in reports {
                match report {
                    Ok(report) => sink(report)?,
                    Err(err) => {
                        let chain: Vec<String> = err.iter().map(|e| e.to_string()).collect();
                        error!("skipping chromosome {:?}: {}", chrom, chain.join(": "));

                        failed.push(chrom);
                    }
                }
            }
        }

        Ok(failed)
    }

    fn chromosome(
        &self,
        chrom: &str,
        variants: Vec<Variant>,
        assemble: bool,
    ) -> Result<ChromosomeReport> {
        let names = self.fasta.names();
        let name = match resolve_name(&names, chrom) {
            Some(name) => name,
            None => return Err(ErrorKind::UnknownChromosome(chrom.into()).into()),
        };

        let sites = self
            .indexes
            .iter()
            .map(|index| {
                index.get(name).ok_or_else(|| {
                    Error::from(ErrorKind::InvalidIndex(format!(
                        "{:?} not found in index for {}",
                        name,
                        index.cas().name
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let reference = self.fasta.load(name)?;
        let regions = self.regions.map(|regions| regions.get(chrom));

        analyze_chromosome(self.config, &reference, &sites, chrom, variants, regions, assemble)
    }
}

/// Adds an empty group for every chromosome with target regions but no
/// variants, so that guides are built for all regions.
pub fn add_region_chromosomes(groups: &mut Vec<(String, Vec<Variant>)>, regions: &Regions) {
    let names: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();

    for chrom in regions.chromosomes() {
        if resolve_name(&names, &chrom).is_none() {
            groups.push((chrom, Vec::new()));
        }
    }
}
