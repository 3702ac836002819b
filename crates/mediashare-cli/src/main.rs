//! Mediashare CLI - share MediaInfo reports behind expiring links
//!
//! Command-line front end for the mediashare entry store. Every command
//! opens the SQLite share database, runs one store operation, and exits
//! with a code that tells scripts what happened.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::Parser;
use mediashare_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, maintenance, misc, shares};
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();
    let daemon = matches!(cli.command, Some(Commands::Reaper(_)));
    logging::init_logging(cli.verbose, cli.quiet, daemon);

    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        if let Some(cli_err) = e.downcast_ref::<CliError>() {
            cli_err.exit();
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Create(args)) => {
            shares::handle_create(ctx, args)?;
        }
        Some(Commands::Fetch(args)) => {
            shares::handle_fetch(ctx, args)?;
        }
        Some(Commands::Info(args)) => {
            shares::handle_info(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            shares::handle_delete(ctx, args)?;
        }
        Some(Commands::Reap(args)) => {
            maintenance::handle_reap(ctx, args)?;
        }
        Some(Commands::Reaper(args)) => {
            maintenance::handle_reaper(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Mediashare v{}", VERSION);
            println!("\nQuickstart:");
            println!("  mediashare init");
            println!("  mediainfo movie.mkv | mediashare create --lifetime 12h");
            println!("  mediashare fetch <id>");
            println!("  mediashare fetch <id> --summary");
            println!("  mediashare reaper");
            println!("\nRun `mediashare --help` for full usage.");
        }
    }

    Ok(())
}
