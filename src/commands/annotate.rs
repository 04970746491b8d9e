use tracing::info;

use crate::args::AnalysisArgs;
use crate::errors::*;
use crate::output::{open_file_or_stdout, EffectsWriter};

pub fn main(args: &AnalysisArgs) -> Result<()> {
    let mut writer = EffectsWriter::new(open_file_or_stdout(&args.output)?, &args.config.profiles)?;
    let failed = super::run(args, None, false, |report| writer.write(&report.effects))?;

    let variants = writer.finish()?;
    info!("Annotated {} variants", variants);

    super::check_failed(&failed)
}
