use std::fs::File;

use bio::io::fasta;

use crate::errors::*;

/// Random access to the sequence of a single chromosome.
///
/// Coordinates are 0-based and half-open; reads extending past the end of the
/// chromosome fail with `ErrorKind::OutOfBounds`.
pub trait Reference {
    fn name(&self) -> &str;

    fn len(&self) -> u64;

    fn fetch(&self, start: u64, stop: u64) -> Result<Vec<u8>>;
}

/// Upper-cased chromosome sequence held in memory
#[derive(Clone, Debug)]
pub struct Chromosome {
    name: String,
    sequence: Vec<u8>,
}

impl Chromosome {
    pub fn new<S: Into<String>>(name: S, sequence: &[u8]) -> Chromosome {
        Chromosome {
            name: name.into(),
            sequence: sequence.to_ascii_uppercase(),
        }
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }
}

impl Reference for Chromosome {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    fn fetch(&self, start: u64, stop: u64) -> Result<Vec<u8>> {
        if start > stop || stop > self.len() {
            return Err(ErrorKind::OutOfBounds(self.name.clone(), start, stop, self.len()).into());
        }

        Ok(self.sequence[start as usize..stop as usize].to_owned())
    }
}

/// Indexed FASTA file; each call to `load` uses its own reader, so
/// chromosomes may be loaded from several threads at once.
#[derive(Clone, Debug)]
pub struct FastaReference {
    path: String,
    sequences: Vec<(String, u64)>,
}

impl FastaReference {
    pub fn open(path: &str) -> Result<FastaReference> {
        let index = fasta::Index::with_fasta_file(&path)
            .chain_err(|| format!("failed to open FASTA index file for {:?}", path))?;

        let sequences = index
            .sequences()
            .into_iter()
            .map(|seq| (seq.name, seq.len))
            .collect();

        Ok(FastaReference {
            path: path.to_owned(),
            sequences,
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.sequences.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len_of(&self, name: &str) -> Option<u64> {
        self.sequences
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, len)| len)
    }

    pub fn load(&self, name: &str) -> Result<Chromosome> {
        let len = match self.len_of(name) {
            Some(len) => len,
            None => return Err(ErrorKind::UnknownChromosome(name.into()).into()),
        };

        let fai = fasta::Index::with_fasta_file(&self.path)
            .chain_err(|| format!("failed to open FASTA index file for {:?}", self.path))?;
        let fasta = File::open(&self.path)
            .chain_err(|| format!("failed to open FASTA file {:?}", self.path))?;
        let mut reader = fasta::IndexedReader::with_index(fasta, fai);

        reader
            .fetch(name, 0, len)
            .chain_err(|| format!("failed to fetch {:?}", name))?;

        let mut sequence = Vec::new();
        reader
            .read(&mut sequence)
            .chain_err(|| format!("failed to read {:?}", name))?;

        Ok(Chromosome::new(name, &sequence))
    }
}

/// Name with the "chr" prefix removed, or added if absent
pub fn alternative_name(name: &str) -> String {
    match name.strip_prefix("chr") {
        Some(stripped) => stripped.to_owned(),
        None => format!("chr{}", name),
    }
}

/// Finds `name` among `names`, allowing for a missing or extra "chr" prefix
pub fn resolve_name<'a>(names: &'a [String], name: &str) -> Option<&'a str> {
    let alternative = alternative_name(name);

    names
        .iter()
        .find(|candidate| *candidate == name)
        .or_else(|| names.iter().find(|candidate| **candidate == alternative))
        .map(|candidate| candidate.as_str())
}
