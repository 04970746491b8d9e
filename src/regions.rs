use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use bio::io::bed;

use crate::errors::*;
use crate::guide::Span;
use crate::reference::alternative_name;

/// Target regions per chromosome, as sorted and merged 1-based spans
#[derive(Clone, Debug, Default)]
pub struct Regions {
    spans: HashMap<String, Vec<Span>>,
}

impl Regions {
    pub fn new() -> Regions {
        Regions::default()
    }

    /// Adds the BED interval `[start, end)`
    pub fn add(&mut self, chrom: &str, start: u64, end: u64) {
        if end > start {
            self.spans
                .entry(chrom.into())
                .or_insert_with(Vec::new)
                .push(Span::new(start as i64 + 1, end as i64));
        }
    }

    pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Regions> {
        let mut reader = bed::Reader::from_file(path)
            .chain_err(|| format!("failed to open BED file {:?}", path))?;

        let mut regions = Regions::new();
        for record in reader.records() {
            let record = record.chain_err(|| "failed to read BED record")?;

            regions.add(record.chrom(), record.start(), record.end());
        }

        regions.merge();

        Ok(regions)
    }

    /// Sorts the spans of every chromosome and merges overlapping spans
    pub fn merge(&mut self) {
        for spans in self.spans.values_mut() {
            spans.sort_by_key(|span| (span.first, span.last));

            let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
            for &span in spans.iter() {
                match merged.last_mut() {
                    Some(last) if span.first <= last.last + 1 => {
                        last.last = last.last.max(span.last);
                    }
                    _ => merged.push(span),
                }
            }

            *spans = merged;
        }
    }

    pub fn chromosomes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.spans.keys().cloned().collect();
        names.sort();
        names
    }

    /// Regions on `chrom`, allowing for a missing or extra "chr" prefix
    pub fn get(&self, chrom: &str) -> &[Span] {
        self.spans
            .get(chrom)
            .or_else(|| self.spans.get(&alternative_name(chrom)))
            .map(|spans| spans.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, chrom: &str, pos: u64) -> bool {
        let pos = pos as i64;
        let spans = self.get(chrom);
        let idx = spans.partition_point(|span| span.last < pos);

        spans.get(idx).map_or(false, |span| span.contains(pos))
    }

    pub fn len(&self) -> usize {
        self.spans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
