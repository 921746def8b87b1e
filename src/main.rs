//! `dotlink` command-line entry point.
use anyhow::Result;
use clap::Parser;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::fs::FileSystem;
use dotlink::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = Logger::new(args.global.dry_run);
    let fs = FileSystem::os();

    match args.command {
        Command::Link => commands::link::run(&args.global, &fs, &log),
        Command::Show => commands::show::run(&args.global, &fs, &log),
        Command::Init(opts) => commands::init::run(&args.global, &opts, &fs, &log),
        Command::Completions(opts) => {
            commands::completions::run(&opts);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
