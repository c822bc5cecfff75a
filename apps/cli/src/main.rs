//! rstextract CLI: pull reStructuredText out of Go source comments.
//!
//! Writes one `<package>.rst` per package found in a source directory,
//! assembled from comment blocks whose first line is `+rst`.

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
