use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::*;
use crate::iupac;
use crate::table;

/// Diploid genotype; `None` for a missing (`.`) allele
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Genotype {
    pub first: Option<u32>,
    pub second: Option<u32>,
}

impl Genotype {
    pub fn parse(value: &str) -> Option<Genotype> {
        let mut alleles = value.split(|c| c == '/' || c == '|');
        let first = Self::parse_allele(alleles.next()?)?;
        // Haploid calls are treated as homozygous
        let second = match alleles.next() {
            Some(value) => Self::parse_allele(value)?,
            None => first,
        };

        if alleles.next().is_some() {
            None
        } else {
            Some(Genotype { first, second })
        }
    }

    fn parse_allele(value: &str) -> Option<Option<u32>> {
        if value == "." {
            Some(None)
        } else {
            value.parse().ok().map(Some)
        }
    }

    pub fn is_heterozygous(&self) -> bool {
        self.first != self.second
    }

    /// True if at least one allele is an alternate allele
    pub fn carries_alt(&self) -> bool {
        [self.first, self.second]
            .iter()
            .any(|allele| matches!(allele, Some(n) if *n > 0))
    }
}

/// Reason a variant is left out of classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantFilter {
    NonLiteralAllele,
    IndelTooLarge,
    OutsideChromosome,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub genotype: Option<Genotype>,
}

impl Variant {
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Variant {
        Variant {
            chrom: chrom.into(),
            pos,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            genotype: None,
        }
    }

    pub fn with_genotype(mut self, genotype: Genotype) -> Variant {
        self.genotype = Some(genotype);
        self
    }

    pub fn is_indel(&self) -> bool {
        self.ref_allele.len() != self.alt_allele.len()
    }

    pub fn filter(&self, max_indel: usize, chrom_len: u64) -> Option<VariantFilter> {
        let ref_len = self.ref_allele.len();
        let alt_len = self.alt_allele.len();

        if !iupac::is_literal(self.ref_allele.as_bytes())
            || !iupac::is_literal(self.alt_allele.as_bytes())
        {
            Some(VariantFilter::NonLiteralAllele)
        } else if self.is_indel() && ref_len.max(alt_len) > max_indel {
            Some(VariantFilter::IndelTooLarge)
        } else if self.pos == 0 || self.pos + ref_len as u64 - 1 > chrom_len {
            Some(VariantFilter::OutsideChromosome)
        } else {
            None
        }
    }

    /// Variants without a genotype are treated as heterozygous
    pub fn is_heterozygous(&self) -> bool {
        self.genotype.map_or(true, |gt| gt.is_heterozygous())
    }

    pub fn carries_alt(&self) -> bool {
        self.genotype.map_or(true, |gt| gt.carries_alt())
    }
}

fn parse_row(row: &table::Row) -> Result<Variant> {
    let fields = &row.fields;
    if fields.len() < 4 {
        return Err(ErrorKind::InvalidVariant(
            row.line,
            format!("expected at least 4 columns, found {}", fields.len()),
        )
        .into());
    }

    let pos = fields[1].parse::<u64>().map_err(|err| {
        ErrorKind::InvalidVariant(row.line, format!("invalid position {:?}: {}", fields[1], err))
    })?;

    let mut variant = Variant::new(&fields[0], pos, &fields[2], &fields[3]);
    if let Some(value) = fields.get(4) {
        match Genotype::parse(value) {
            Some(genotype) => variant.genotype = Some(genotype),
            None => {
                return Err(ErrorKind::InvalidVariant(
                    row.line,
                    format!("invalid genotype {:?}", value),
                )
                .into())
            }
        }
    }

    Ok(variant)
}

/// Reads a table of `chrom pos ref alt [genotype]` rows; a header row is
/// recognized by a non-numeric position in the first row.
pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Vec<Variant>> {
    let rows = table::read(path).chain_err(|| "failed to read table of variants")?;

    let mut variants = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if !table::is_header(idx, row, 1) {
            variants.push(parse_row(row)?);
        }
    }

    Ok(variants)
}

/// Groups variants by chromosome, in order of first appearance, each group
/// sorted by position
pub fn group_by_chrom(variants: Vec<Variant>) -> Vec<(String, Vec<Variant>)> {
    let mut groups: Vec<(String, Vec<Variant>)> = Vec::new();
    let mut lookup: HashMap<String, usize> = HashMap::new();

    for variant in variants {
        let idx = *lookup.entry(variant.chrom.clone()).or_insert_with(|| {
            groups.push((variant.chrom.clone(), Vec::new()));
            groups.len() - 1
        });

        groups[idx].1.push(variant);
    }

    for (_, group) in &mut groups {
        group.sort_by_key(|v| v.pos);
    }

    groups
}
