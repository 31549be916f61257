//! protonav CLI: regenerate the protobuf section of a docs site's navigation.
//!
//! Cleans up `protoc-gen-doc` markdown pages, parses their tables of contents,
//! and rewrites the matching `nav` entry of the site configuration.

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
