pub mod cli;
pub mod columns;
pub mod data;
pub mod dataset;
pub mod error;
pub mod guess;
pub mod io_utils;
pub mod mapping;
pub mod report;
pub mod segments;
pub mod signal;
pub mod summarize;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("lead_segments", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Guess(args) => guess::execute(&args),
        Commands::Summarize(args) => summarize::execute(&args),
    }
}
