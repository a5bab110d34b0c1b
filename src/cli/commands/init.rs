use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::Output;
use crate::config::{SHELL_CONFIG_FILE, YAML_CONFIG_FILE};
use crate::git::{GitRepo, HookInstall};
use crate::hooks::HookEvent;

#[derive(Args, Default)]
pub struct InitArgs {
    /// Overwrite hooks that were not installed by commit-shame
    #[arg(short, long)]
    pub force: bool,
}

pub fn execute(args: InitArgs, output: &Output) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let repo = GitRepo::discover(&cwd)?;
    let hooks_dir = repo.hooks_dir();

    output.header("Installing commit-shame hooks");

    let mut skipped = 0;
    for event in HookEvent::ALL {
        let name = event.hook_name();
        match repo.install_hook(name, &event.shim(), args.force)? {
            HookInstall::Installed => output.success(&format!("Installed {name} hook")),
            HookInstall::Replaced => output.success(&format!("Replaced {name} hook")),
            HookInstall::Skipped => {
                skipped += 1;
                output.warning(&format!(
                    "Existing {name} hook was not installed by commit-shame; use --force to overwrite"
                ));
            }
        }
    }

    output.table_row("Hooks directory", &hooks_dir.display().to_string());
    if skipped > 0 {
        output.error(&format!(
            "Only {}/{} hooks were installed",
            HookEvent::ALL.len() - skipped,
            HookEvent::ALL.len()
        ));
        return Ok(ExitCode::from(1));
    }

    output.info(&format!(
        "Create a {YAML_CONFIG_FILE} or {SHELL_CONFIG_FILE} file to customize behavior"
    ));
    Ok(ExitCode::SUCCESS)
}
