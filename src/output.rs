use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::Write;

use crate::annotation::Annotations;
use crate::assemble::GuideCandidate;
use crate::cas::CasProfile;
use crate::classify::VariantPamEffect;
use crate::errors::*;
use crate::variant::Variant;

pub fn open_file_or_stdout(file: &Option<String>) -> Result<Box<dyn Write>> {
    if let Some(path) = file {
        let handle =
            File::create(path).chain_err(|| format!("could not create output file {:?}", path))?;

        Ok(Box::new(io::BufWriter::new(handle)))
    } else {
        Ok(Box::new(io::BufWriter::new(io::stdout())))
    }
}

fn or_na<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "NA".into(),
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn write_candidate_header(out: &mut dyn Write, annotated: bool) -> Result<()> {
    write!(
        out,
        "chrom\tstart\tstop\tref\talt\tvariant_position_in_guide\tgRNA_ref\tgRNA_alt\t\
         variant_position\tstrand\tcas_type\torigin\tpam_position\tguide_id"
    )
    .chain_err(|| "failed to write output header")?;

    if annotated {
        write!(out, "\trsID\tAF").chain_err(|| "failed to write output header")?;
    }

    writeln!(out).chain_err(|| "failed to write output header")
}

fn write_candidate(
    out: &mut dyn Write,
    candidate: &GuideCandidate,
    guide_id: usize,
    annotations: Option<&Annotations>,
) -> Result<()> {
    write!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\tguide{}",
        candidate.chrom,
        candidate.start,
        candidate.stop,
        or_na(&candidate.ref_allele),
        or_na(&candidate.alt_allele),
        or_na(&candidate.variant_position_in_guide),
        String::from_utf8_lossy(&candidate.ref_sequence),
        String::from_utf8_lossy(&candidate.alt_sequence),
        or_na(&candidate.variant_position),
        candidate.strand.strand_symbol(),
        candidate.cas_type,
        candidate.origin.as_str(),
        candidate.pam_position,
        guide_id,
    )
    .chain_err(|| "failed to write output row")?;

    if let Some(annotations) = annotations {
        let (rsid, af) = match (
            candidate.variant_position,
            &candidate.ref_allele,
            &candidate.alt_allele,
        ) {
            (Some(pos), Some(ref_allele), Some(alt_allele)) => {
                annotations.lookup(&candidate.chrom, pos, ref_allele, alt_allele)
            }
            _ => ("NA".into(), "NA".into()),
        };

        write!(out, "\t{}\t{}", rsid, af).chain_err(|| "failed to write output row")?;
    }

    writeln!(out).chain_err(|| "failed to write output row")
}

/// Table of guide candidates, written one chromosome at a time. Guides are
/// numbered `guide1`, `guide2`, ... in output order.
pub struct CandidateWriter<'a, W: Write> {
    out: W,
    annotations: Option<&'a Annotations>,
    count: usize,
}

impl<'a, W: Write> CandidateWriter<'a, W> {
    /// Writes the header; `rsID` and `AF` columns are added if `annotations`
    /// are given.
    pub fn new(mut out: W, annotations: Option<&'a Annotations>) -> Result<Self> {
        write_candidate_header(&mut out, annotations.is_some())?;

        Ok(CandidateWriter {
            out,
            annotations,
            count: 0,
        })
    }

    pub fn write(&mut self, candidates: &[GuideCandidate]) -> Result<()> {
        for candidate in candidates {
            self.count += 1;
            write_candidate(&mut self.out, candidate, self.count, self.annotations)?;
        }

        Ok(())
    }

    /// Flushes the table and returns the number of guides written
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush().chain_err(|| "failed to flush output")?;

        Ok(self.count)
    }
}

/// Table of the effect of every variant on the PAMs of each nuclease
pub struct EffectsWriter<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> EffectsWriter<W> {
    pub fn new(mut out: W, profiles: &[CasProfile]) -> Result<Self> {
        write!(out, "chrom\tpos\tref\talt").chain_err(|| "failed to write output header")?;
        for cas in profiles {
            write!(
                out,
                "\tmakes_{name}\tbreaks_{name}\tvar_near_{name}",
                name = cas.name
            )
            .chain_err(|| "failed to write output header")?;
        }
        writeln!(out).chain_err(|| "failed to write output header")?;

        Ok(EffectsWriter { out, count: 0 })
    }

    pub fn write(&mut self, effects: &[(Variant, Vec<VariantPamEffect>)]) -> Result<()> {
        for (variant, effects) in effects {
            write!(
                self.out,
                "{}\t{}\t{}\t{}",
                variant.chrom, variant.pos, variant.ref_allele, variant.alt_allele
            )
            .chain_err(|| "failed to write output row")?;

            for effect in effects {
                write!(
                    self.out,
                    "\t{}\t{}\t{}",
                    flag(effect.makes_pam),
                    flag(effect.breaks_pam),
                    flag(effect.near_pam)
                )
                .chain_err(|| "failed to write output row")?;
            }

            writeln!(self.out).chain_err(|| "failed to write output row")?;
            self.count += 1;
        }

        Ok(())
    }

    /// Flushes the table and returns the number of variants written
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush().chain_err(|| "failed to flush output")?;

        Ok(self.count)
    }
}
