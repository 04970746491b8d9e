use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bio_types::strand::Strand;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::cas::CasProfile;
use crate::constants::*;
use crate::errors::*;
use crate::guide::{Side, Span};
use crate::pam;

/// Anchors of every PAM on one chromosome, per strand, in increasing order
#[derive(Clone, Debug, PartialEq)]
pub struct ChromosomeSites {
    name: String,
    forward: Vec<u64>,
    reverse: Vec<u64>,
}

impl ChromosomeSites {
    pub fn new(name: &str, forward: Vec<u64>, reverse: Vec<u64>) -> ChromosomeSites {
        ChromosomeSites {
            name: name.into(),
            forward,
            reverse,
        }
    }

    /// Scans both strands of a chromosome sequence
    pub fn scan(cas: &CasProfile, name: &str, sequence: &[u8]) -> ChromosomeSites {
        let (forward, reverse) = rayon::join(
            || scan_strand(cas, Strand::Forward, sequence),
            || scan_strand(cas, Strand::Reverse, sequence),
        );

        Self::new(name, forward, reverse)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sites(&self, strand: Strand) -> &[u64] {
        match strand {
            Strand::Reverse => &self.reverse,
            _ => &self.forward,
        }
    }

    /// Anchors on `strand` that fall within `span`
    pub fn in_span(&self, strand: Strand, span: Span) -> &[u64] {
        let sites = self.sites(strand);
        let start = sites.partition_point(|&anchor| (anchor as i64) < span.first);
        let end = sites.partition_point(|&anchor| (anchor as i64) <= span.last);

        &sites[start..end.max(start)]
    }

    pub fn len(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn scan_strand(cas: &CasProfile, strand: Strand, sequence: &[u8]) -> Vec<u64> {
    let side = Side::of(cas.orientation, strand);

    pam::par_find_occurrences(pam::pattern(cas, strand), sequence)
        .iter()
        .map(|m| side.anchor(m))
        .collect()
}

pub struct PamIndex {
    cas: CasProfile,
    chromosomes: Vec<ChromosomeSites>,
}

impl PamIndex {
    pub fn new(cas: &CasProfile, chromosomes: Vec<ChromosomeSites>) -> PamIndex {
        PamIndex {
            cas: cas.clone(),
            chromosomes,
        }
    }

    pub fn cas(&self) -> &CasProfile {
        &self.cas
    }

    pub fn chromosomes(&self) -> &[ChromosomeSites] {
        &self.chromosomes
    }

    pub fn names(&self) -> Vec<String> {
        self.chromosomes.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ChromosomeSites> {
        self.chromosomes.iter().find(|c| c.name == name)
    }

    pub fn site_count(&self) -> usize {
        self.chromosomes.iter().map(ChromosomeSites::len).sum()
    }

    pub fn read<P: AsRef<Path> + Debug>(filename: &P) -> Result<PamIndex> {
        let file = File::open(filename)
            .chain_err(|| format!("failed to open index file {:?}", filename))?;
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();

        reader
            .by_ref()
            .take(INDEX_HEADER.len() as u64)
            .read_to_end(&mut buffer)
            .chain_err(|| "failed to read index header")?;
        if buffer != INDEX_HEADER {
            return Err(
                ErrorKind::InvalidIndex(format!("{:?} is not a PAM index file", filename)).into(),
            );
        }

        let version = reader
            .read_u8()
            .chain_err(|| "failed to read index version number")?;
        if version < INDEX_VERSION {
            return Err(ErrorKind::InvalidIndex(
                "index file is outdated; please re-index genome".into(),
            )
            .into());
        } else if version > INDEX_VERSION {
            return Err(ErrorKind::InvalidIndex(
                "index generated using newer version; please upgrade or re-index genome".into(),
            )
            .into());
        }

        buffer.clear();
        let name_len = reader
            .read_u8()
            .chain_err(|| "failed to read length of nuclease name")?;
        reader
            .by_ref()
            .take(u64::from(name_len))
            .read_to_end(&mut buffer)
            .chain_err(|| "failed to read nuclease name")?;

        let name = std::str::from_utf8(&buffer).chain_err(|| "failed to decode nuclease name")?;
        let cas = CasProfile::lookup(name)?;

        let chrom_count = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read number of chromosomes")?;

        let mut chromosomes = Vec::with_capacity(chrom_count as usize);
        for _ in 0..chrom_count {
            chromosomes.push(Self::read_chromosome(&mut reader)?);
        }

        Ok(PamIndex { cas, chromosomes })
    }

    fn read_chromosome<R: Read>(reader: &mut R) -> Result<ChromosomeSites> {
        let name_len = reader
            .read_u16::<LittleEndian>()
            .chain_err(|| "failed to read length of chromosome name")?;

        let mut buffer = vec![0; name_len as usize];
        reader
            .read_exact(&mut buffer)
            .chain_err(|| "failed to read chromosome name")?;
        let name = String::from_utf8(buffer).chain_err(|| "failed to parse chromosome name")?;

        let forward = Self::read_sites(reader)
            .chain_err(|| format!("failed to read forward sites for {:?}", name))?;
        let reverse = Self::read_sites(reader)
            .chain_err(|| format!("failed to read reverse sites for {:?}", name))?;

        Ok(ChromosomeSites {
            name,
            forward,
            reverse,
        })
    }

    fn read_sites<R: Read>(reader: &mut R) -> Result<Vec<u64>> {
        let count = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read number of sites")?;

        let mut sites = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let anchor = reader
                .read_u64::<LittleEndian>()
                .chain_err(|| "failed to read site")?;

            if sites.last().map_or(false, |&last| last >= anchor) {
                return Err(ErrorKind::InvalidIndex("sites are not sorted".into()).into());
            }

            sites.push(anchor);
        }

        Ok(sites)
    }

    pub fn write<P: AsRef<Path> + Debug>(&self, filename: P) -> Result<()> {
        let file = File::create(&filename)
            .chain_err(|| format!("failed to create index file {:?}", filename))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(INDEX_HEADER)
            .chain_err(|| "failed to write index header")?;
        writer
            .write_u8(INDEX_VERSION)
            .chain_err(|| "failed to write index version")?;

        let name = self.cas.name.as_bytes();
        writer
            .write_u8(name.len() as u8)
            .chain_err(|| "failed to write nuclease name length")?;
        writer
            .write_all(name)
            .chain_err(|| "failed to write nuclease name")?;

        writer
            .write_u64::<LittleEndian>(self.chromosomes.len() as u64)
            .chain_err(|| "failed to write number of chromosomes")?;

        for chromosome in &self.chromosomes {
            let bytes = chromosome.name.as_bytes();
            writer
                .write_u16::<LittleEndian>(bytes.len() as u16)
                .chain_err(|| "failed to write length of chromosome name")?;
            writer
                .write_all(bytes)
                .chain_err(|| "failed to write chromosome name")?;

            Self::write_sites(&mut writer, &chromosome.forward)
                .chain_err(|| "failed to write forward sites")?;
            Self::write_sites(&mut writer, &chromosome.reverse)
                .chain_err(|| "failed to write reverse sites")?;
        }

        writer.flush().chain_err(|| "failed to flush index file")
    }

    fn write_sites<W: Write>(writer: &mut W, sites: &[u64]) -> Result<()> {
        writer
            .write_u64::<LittleEndian>(sites.len() as u64)
            .chain_err(|| "failed to write number of sites")?;

        for &anchor in sites {
            writer
                .write_u64::<LittleEndian>(anchor)
                .chain_err(|| "failed to write site")?;
        }

        Ok(())
    }

    pub fn summarize(&self) -> String {
        format!(
            "Index contains {} PAM sites on {} sequences for {}",
            self.site_count(),
            self.chromosomes.len(),
            self.cas.summarize()
        )
    }
}

/// Path of the index file for `cas` next to `prefix`
pub fn index_path(prefix: &str, cas: &CasProfile) -> String {
    format!("{}{}", prefix, cas.index_extension())
}
