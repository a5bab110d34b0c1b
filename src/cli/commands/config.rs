use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::config::{ConfigFormat, ConfigResolver};
use crate::git::GitRepo;

#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ConfigFormat::Yaml)]
    pub format: ConfigFormat,
}

/// Print the configuration a hook would run with from here
pub fn execute(args: ConfigArgs) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let root = match GitRepo::discover(&cwd) {
        Ok(repo) => repo.root(),
        Err(e) => {
            tracing::info!("{e}; resolving config from {}", cwd.display());
            cwd
        }
    };

    let config = ConfigResolver::resolve(&root);
    println!("{}", config.export(args.format)?.trim_end());
    Ok(ExitCode::SUCCESS)
}
