mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{edit, inspect, patch, EditArgs, InspectArgs, PatchArgs};
use tracing_subscriber::EnvFilter;

/// Blueprint CLI - inspect and patch Blueprint theme stylesheets
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tokens and components of a stylesheet or directory
    Inspect(InspectArgs),

    /// Apply a JSON patch file to a stylesheet
    Patch(PatchArgs),

    /// Edit a stylesheet with undo/redo, one command per line
    Edit(EditArgs),
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Inspect(args) => inspect(args, &cwd),
                Command::Patch(args) => patch(args, &cwd),
                Command::Edit(args) => edit(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
