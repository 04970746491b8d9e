use tracing::info;

use crate::annotation::Annotations;
use crate::args::GuidesArgs;
use crate::errors::*;
use crate::output::{open_file_or_stdout, CandidateWriter};
use crate::regions::Regions;

pub fn main(args: &GuidesArgs) -> Result<()> {
    let regions = match &args.regions {
        Some(filename) => {
            info!("Reading target regions from {:?}", filename);
            let regions = Regions::read(filename)?;
            info!("  read {} regions", regions.len());

            Some(regions)
        }
        None => None,
    };

    let annotations = match &args.annotations {
        Some(filename) => {
            info!("Reading variant annotations from {:?}", filename);
            let annotations = Annotations::read(filename)?;
            info!("  read {} annotations", annotations.len());

            Some(annotations)
        }
        None => None,
    };

    let out = open_file_or_stdout(&args.analysis.output)?;
    let mut writer = CandidateWriter::new(out, annotations.as_ref())?;
    let failed = super::run(&args.analysis, regions.as_ref(), true, |report| {
        writer.write(&report.candidates)
    })?;

    let count = writer.finish()?;
    info!("Wrote {} guides", count);

    super::check_failed(&failed)
}
