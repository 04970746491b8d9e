use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::cas::CasProfile;
use crate::config::{Config, Mode};
use crate::errors::*;

#[derive(Debug)]
pub struct IndexArgs {
    pub fasta: String,
    pub prefix: Option<String>,
    pub profiles: Vec<CasProfile>,
    pub threads: usize,
}

#[derive(Debug)]
pub struct AnalysisArgs {
    pub fasta: String,
    pub variants: String,
    pub index_prefix: Option<String>,
    pub config: Config,
    pub output: Option<String>,
    pub threads: usize,
}

#[derive(Debug)]
pub struct GuidesArgs {
    pub analysis: AnalysisArgs,
    pub regions: Option<String>,
    pub annotations: Option<String>,
}

pub enum Args {
    Index(IndexArgs),
    Annotate(AnalysisArgs),
    Guides(GuidesArgs),
    None,
}

fn cas_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("cas")
        .long("cas")
        .takes_value(true)
        .default_value("SpCas9")
        .help("Comma-separated list of nucleases, or 'all'.")
}

fn threads_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("threads")
        .long("threads")
        .takes_value(true)
        .allow_hyphen_values(true)
        .number_of_values(1)
        .default_value("0")
        .help("Number of threads used for computation (0 for automatic).")
}

fn index_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("index")
        .about("Index the PAM sites of a genome in FASTA format")
        .arg(
            Arg::with_name("fasta")
                .help("Reference genome in FASTA format.")
                .required(true),
        )
        .arg(cas_arg())
        .arg(
            Arg::with_name("prefix")
                .long("prefix")
                .takes_value(true)
                .help("Prefix of index files; defaults to the path of the FASTA file."),
        )
        .arg(threads_arg())
}

fn analysis_command<'a, 'b>(name: &str) -> App<'a, 'b> {
    SubCommand::with_name(name)
        .arg(
            Arg::with_name("fasta")
                .help("Indexed reference genome in FASTA format.")
                .required(true),
        )
        .arg(
            Arg::with_name("variants")
                .help("Table of variants (chrom, pos, ref, alt, and optional genotype).")
                .required(true),
        )
        .arg(cas_arg())
        .arg(
            Arg::with_name("index-prefix")
                .long("index-prefix")
                .takes_value(true)
                .help("Prefix of PAM index files; defaults to the path of the FASTA file."),
        )
        .arg(
            Arg::with_name("guide-length")
                .long("guide-length")
                .takes_value(true)
                .default_value("20")
                .help("Guide length, or comma-separated guide lengths for each nuclease."),
        )
        .arg(
            Arg::with_name("max-indel")
                .long("max-indel")
                .takes_value(true)
                .default_value("5")
                .help("Indels longer than this are not considered."),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .help("Output table; defaults to STDOUT."),
        )
        .arg(threads_arg())
}

fn annotate_command<'a, 'b>() -> App<'a, 'b> {
    analysis_command("annotate").about("Annotate the effect of variants on PAM sites")
}

fn guides_command<'a, 'b>() -> App<'a, 'b> {
    analysis_command("guides")
        .about("Design personalized or allele-specific guides for a genotype")
        .arg(
            Arg::with_name("raw-strand")
                .long("raw-strand")
                .short("c")
                .help("Report reverse strand guides as found on the forward strand."),
        )
        .arg(
            Arg::with_name("allele-specific")
                .long("allele-specific")
                .help("Only design guides targeting one allele of heterozygous variants."),
        )
        .arg(
            Arg::with_name("regions")
                .long("regions")
                .takes_value(true)
                .help("BED file of regions to which guides are restricted."),
        )
        .arg(
            Arg::with_name("annotations")
                .long("annotations")
                .takes_value(true)
                .help("Table of chrom, pos, ref, alt, rsID, and allele frequency of variants."),
        )
}

fn get_str<'a>(matches: &'a ArgMatches, key: &str) -> Result<&'a str> {
    match matches.value_of(key) {
        Some(value) => Ok(value),
        None => Err(format!("Required option {:?} not set", key).into()),
    }
}

fn get_string(matches: &ArgMatches, key: &str) -> Result<String> {
    get_str(matches, key).map(|v| v.into())
}

fn get_optional(matches: &ArgMatches, key: &str) -> Option<String> {
    matches.value_of(key).map(|v| v.to_string())
}

fn parse_usize(matches: &ArgMatches, key: &str) -> Result<usize> {
    let s = get_str(matches, key)?;

    match s.trim().parse::<usize>() {
        Ok(v) => Ok(v),
        Err(err) => Err(format!("Invalid --{} ({:?}) value: {}", key, s, err).into()),
    }
}

fn parse_usize_list(matches: &ArgMatches, key: &str) -> Result<Vec<usize>> {
    let s = get_str(matches, key)?;

    s.split(',')
        .map(|v| -> Result<usize> {
            match v.trim().parse::<usize>() {
                Ok(v) => Ok(v),
                Err(err) => Err(format!("Invalid --{} ({:?}) value: {}", key, s, err).into()),
            }
        })
        .collect()
}

fn parse_analysis(matches: &ArgMatches) -> Result<AnalysisArgs> {
    let guide_lengths = parse_usize_list(matches, "guide-length")?;
    let profiles = CasProfile::parse_list(get_str(matches, "cas")?, &guide_lengths)?;
    let mut config = Config::new(profiles);
    config.max_indel = parse_usize(matches, "max-indel")?;

    Ok(AnalysisArgs {
        fasta: get_string(matches, "fasta")?,
        variants: get_string(matches, "variants")?,
        index_prefix: get_optional(matches, "index-prefix"),
        config,
        output: get_optional(matches, "output"),
        threads: parse_usize(matches, "threads")?,
    })
}

/// Returns the requested verbosity along with the parsed command
pub fn parse_args() -> Result<(u64, Args)> {
    let matches = App::new("pamvar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Finds the effect of genetic variants on CRISPR PAM sites and designs guides")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase verbosity of log messages (-v for debug, -vv for trace)."),
        )
        .subcommand(index_command())
        .subcommand(annotate_command())
        .subcommand(guides_command())
        .get_matches();

    let mut verbosity = matches.occurrences_of("verbose");
    let args = if let Some(matches) = matches.subcommand_matches("index") {
        verbosity = verbosity.max(matches.occurrences_of("verbose"));

        Args::Index(IndexArgs {
            fasta: get_string(matches, "fasta")?,
            prefix: get_optional(matches, "prefix"),
            profiles: CasProfile::parse_list(get_str(matches, "cas")?, &[])?,
            threads: parse_usize(matches, "threads")?,
        })
    } else if let Some(matches) = matches.subcommand_matches("annotate") {
        verbosity = verbosity.max(matches.occurrences_of("verbose"));

        let args = parse_analysis(matches)?;
        args.config.validate()?;

        Args::Annotate(args)
    } else if let Some(matches) = matches.subcommand_matches("guides") {
        verbosity = verbosity.max(matches.occurrences_of("verbose"));

        let mut analysis = parse_analysis(matches)?;
        analysis.config.raw_strand = matches.is_present("raw-strand");
        if matches.is_present("allele-specific") {
            analysis.config.mode = Mode::AlleleSpecific;
        }
        analysis.config.validate()?;

        Args::Guides(GuidesArgs {
            analysis,
            regions: get_optional(matches, "regions"),
            annotations: get_optional(matches, "annotations"),
        })
    } else {
        eprintln!("{}", matches.usage());

        Args::None
    };

    Ok((verbosity, args))
}
