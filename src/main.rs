// error_chain macro can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use(lazy_static)]
extern crate lazy_static;

use tracing_subscriber::EnvFilter;

mod analysis;
mod annotation;
mod args;
mod assemble;
mod cas;
mod classify;
mod commands;
mod config;
mod constants;
mod errors;
mod guide;
mod haplotype;
mod index;
mod iupac;
mod output;
mod pam;
mod progress;
mod reference;
mod regions;
mod table;
mod variant;

fn print_err(e: &errors::Error) {
    use error_chain::ChainedError;
    use std::io::Write; // trait which holds `display_chain`
    let stderr = &mut ::std::io::stderr();
    let errmsg = "Error writing to stderr";

    writeln!(stderr, "{}", e.display_chain()).expect(errmsg);
}

/// Logs to STDERR; RUST_LOG takes precedence over the -v flags
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(::std::io::stderr)
        .init();
}

fn inner_main() -> errors::Result<()> {
    let (verbosity, args) = args::parse_args()?;
    init_logging(verbosity);

    match args {
        args::Args::Index(args) => commands::index::main(&args),
        args::Args::Annotate(args) => commands::annotate::main(&args),
        args::Args::Guides(args) => commands::guides::main(&args),
        args::Args::None => Ok(()),
    }
}

fn main() {
    if let Err(e) = inner_main() {
        print_err(&e);

        ::std::process::exit(1);
    } else {
        ::std::process::exit(0);
    }
}
