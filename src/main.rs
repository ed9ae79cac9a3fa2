use clap::Parser;

use cdm_collections::args::Args;
use cdm_collections::logging::init_logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet)?;

    let config = args.resolve()?;
    tracing::debug!(?config, "Resolved configuration");

    cdm_collections::run(&config)?;
    Ok(())
}
