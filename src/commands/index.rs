use std::fmt::Debug;
use std::path::Path;

use bio::io::fasta::Reader;
use tracing::info;

use crate::args::IndexArgs;
use crate::cas::CasProfile;
use crate::errors::*;
use crate::index::{index_path, ChromosomeSites, PamIndex};

/// Scans every sequence in a FASTA file for the PAMs of each nuclease
pub fn collect_sites<P: AsRef<Path> + Debug>(
    filename: &P,
    profiles: &[CasProfile],
) -> Result<Vec<PamIndex>> {
    info!("Finding PAM sites in {:?}", &filename);
    let file = Reader::from_file(&filename)
        .chain_err(|| format!("failed to open FASTA file {:?}", filename))?;

    let mut sites: Vec<Vec<ChromosomeSites>> = vec![Vec::new(); profiles.len()];

    let mut running_size = 0;
    let timer = ::std::time::Instant::now();
    for record in file.records() {
        let record = record.chain_err(|| "failed to read FASTA sequence")?;
        record.check().map_err(|v| ErrorKind::Msg(v.into()))?;

        let sequence = record.seq().to_ascii_uppercase();
        for (cas, chromosomes) in profiles.iter().zip(sites.iter_mut()) {
            let chromosome = ChromosomeSites::scan(cas, record.id(), &sequence);
            info!("  {}: {} {} sites", record.id(), chromosome.len(), cas.name);

            chromosomes.push(chromosome);
        }

        let seconds = timer.elapsed().as_secs() as usize;
        running_size += sequence.len();

        info!(
            "  Processed {} Mbp in {} seconds ({:.1} Mbp/s)",
            running_size / 1_000_000,
            seconds,
            (running_size / 1_000_000) as f64 / ::std::cmp::max(1, seconds) as f64
        );
    }

    Ok(profiles
        .iter()
        .zip(sites)
        .map(|(cas, chromosomes)| PamIndex::new(cas, chromosomes))
        .collect())
}

pub fn main(args: &IndexArgs) -> Result<()> {
    ::rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .chain_err(|| "failed to build thread pool")?;

    let indexes = collect_sites(&args.fasta, &args.profiles)
        .chain_err(|| "failed to collect PAM sites")?;

    let prefix = args.prefix.as_ref().unwrap_or(&args.fasta);
    for index in indexes {
        let filename = index_path(prefix, index.cas());

        info!("{}", index.summarize());
        info!("  Writing PAM sites to {:?}", filename);
        index
            .write(&filename)
            .chain_err(|| format!("failed to write PAM index {:?}", filename))?;
    }

    Ok(())
}
