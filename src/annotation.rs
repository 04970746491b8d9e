use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::*;
use crate::table;

type Key = (String, u64, String, String);

/// Population annotations (`chrom pos ref alt rsid af`) keyed by variant
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    records: HashMap<Key, (String, String)>,
}

fn key(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Key {
    (
        chrom.strip_prefix("chr").unwrap_or(chrom).to_owned(),
        pos,
        ref_allele.to_ascii_uppercase(),
        alt_allele.to_ascii_uppercase(),
    )
}

impl Annotations {
    pub fn new() -> Annotations {
        Annotations::default()
    }

    pub fn insert(
        &mut self,
        chrom: &str,
        pos: u64,
        ref_allele: &str,
        alt_allele: &str,
        rsid: &str,
        af: &str,
    ) {
        self.records.insert(
            key(chrom, pos, ref_allele, alt_allele),
            (rsid.into(), af.into()),
        );
    }

    pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Annotations> {
        let rows = table::read(path).chain_err(|| "failed to read table of annotations")?;

        let mut annotations = Annotations::new();
        for (idx, row) in rows.iter().enumerate() {
            if table::is_header(idx, row, 1) {
                continue;
            } else if row.fields.len() < 6 {
                return Err(format!(
                    "expected 6 columns on line {} of {:?}, found {}",
                    row.line,
                    path,
                    row.fields.len()
                )
                .into());
            }

            let fields = &row.fields;
            let pos = fields[1].parse::<u64>().chain_err(|| {
                format!("invalid position {:?} on line {} of {:?}", fields[1], row.line, path)
            })?;

            annotations.insert(&fields[0], pos, &fields[2], &fields[3], &fields[4], &fields[5]);
        }

        Ok(annotations)
    }

    /// rsID and allele frequency of a variant; unknown variants are named
    /// `chrom:pos:ref:alt` and given a frequency of 0.
    pub fn lookup(
        &self,
        chrom: &str,
        pos: u64,
        ref_allele: &str,
        alt_allele: &str,
    ) -> (String, String) {
        match self.records.get(&key(chrom, pos, ref_allele, alt_allele)) {
            Some(record) => record.clone(),
            None => (
                format!("{}:{}:{}:{}", chrom, pos, ref_allele, alt_allele),
                "0".into(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
