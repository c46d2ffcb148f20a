//! `nerdhub`: terminal front end for the NerdHub dashboard.
//!
//! Every command builds a fresh core state, restores saved view preferences,
//! runs the core until no request is in flight and prints the resulting view.

mod cli;
mod commands;
mod config;
mod effects;
mod persistence;
mod render;
mod runtime;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.is_verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    hub_logging::initialize(cli.global.log.into(), level, &config::log_path());

    commands::run(cli)
}
