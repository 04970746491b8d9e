use tracing::info;

use crate::analysis::{add_region_chromosomes, Analysis, ChromosomeReport};
use crate::args::AnalysisArgs;
use crate::errors::*;
use crate::index::{index_path, PamIndex};
use crate::progress;
use crate::reference::FastaReference;
use crate::regions::Regions;
use crate::variant;

pub mod annotate;
pub mod guides;
pub mod index;

/// Reads the PAM index of every configured nuclease
fn read_indexes(args: &AnalysisArgs) -> Result<Vec<PamIndex>> {
    let prefix = args.index_prefix.as_ref().unwrap_or(&args.fasta);

    args.config
        .profiles
        .iter()
        .map(|cas| {
            let filename = index_path(prefix, cas);
            info!("Reading PAM sites from {:?}", filename);

            let index = PamIndex::read(&filename)
                .chain_err(|| format!("failed to read PAM index {:?}", filename))?;
            if index.cas().name != cas.name {
                return Err(ErrorKind::InvalidIndex(format!(
                    "{:?} holds sites for {}, not {}",
                    filename,
                    index.cas().name,
                    cas.name
                ))
                .into());
            }

            info!("  {}", index.summarize());
            Ok(index)
        })
        .collect()
}

/// Classifies the variants of `args` on every chromosome, optionally
/// assembling guides restricted to `regions`, and passes each chromosome's
/// report to `sink` as it is finished. Returns the chromosomes that failed.
fn run<F>(
    args: &AnalysisArgs,
    regions: Option<&Regions>,
    assemble: bool,
    sink: F,
) -> Result<Vec<String>>
where
    F: FnMut(ChromosomeReport) -> Result<()>,
{
    ::rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .chain_err(|| "failed to build thread pool")?;

    for cas in &args.config.profiles {
        info!("Using {}", cas.summarize());
    }

    let indexes = read_indexes(args)?;
    let fasta = FastaReference::open(&args.fasta)?;

    info!("Reading variants from {:?}", args.variants);
    let variants = variant::read(&args.variants)?;
    info!("  read {} variants", variants.len());

    let mut groups = variant::group_by_chrom(variants);
    let mut analysis = Analysis::new(&args.config, &fasta, &indexes);
    if let Some(regions) = regions {
        add_region_chromosomes(&mut groups, regions);
        analysis = analysis.with_regions(regions);
    }

    let progress = progress::chromosomes(groups.len());
    let failed = analysis.run(groups, assemble, &progress, sink)?;
    progress.finish();

    Ok(failed)
}

/// Fails the command if any chromosome could not be analysed
fn check_failed(failed: &[String]) -> Result<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "failed to analyse {} chromosome(s): {}",
            failed.len(),
            failed.join(", ")
        )
        .into())
    }
}
