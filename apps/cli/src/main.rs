//! biocatalog CLI: bioinformatics resource catalog curation.
//!
//! Merges yearly database listings, supplements and web-resource sheets
//! into one categorized, glossed JSON catalog.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
