use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::Output;

pub mod config;
pub mod hook;
pub mod init;
pub mod packs;

#[derive(Parser)]
#[command(
    name = "commit-shame",
    version = env!("CARGO_PKG_VERSION"),
    about = "Git hooks that shame oversized diffs, lazy commit messages and giant pushes",
    long_about = "commit-shame runs as a git pre-commit, commit-msg and pre-push hook. \
                  Built-in rules and optional plugins judge each event as pass, warn \
                  or block, and the verdict is delivered in the insult pack and \
                  shame level of your choice."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a git hook (invoked by the installed shims)
    Hook(hook::HookArgs),
    /// Install the hook shims into the current repository
    Init(init::InitArgs),
    /// Print the effective configuration
    Config(config::ConfigArgs),
    /// List the built-in insult packs and shame levels
    Packs(packs::PacksArgs),
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Commands::Hook(args) => hook::execute(args, &output).await,
            Commands::Init(args) => init::execute(args, &output),
            Commands::Config(args) => config::execute(args),
            Commands::Packs(args) => packs::execute(args, &output),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout carries the verdict report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
