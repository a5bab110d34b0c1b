use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::Output;
use crate::hooks::{HookInvocation, HookOrchestrator, read_ref_updates};

#[derive(Args)]
pub struct HookArgs {
    #[command(subcommand)]
    pub hook: HookCommand,
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// Judge the staged diff
    PreCommit,
    /// Judge the commit message
    CommitMsg {
        /// File holding the proposed message, as passed by git
        message_file: PathBuf,
    },
    /// Judge the commits about to be pushed (ref lines on stdin)
    PrePush {
        /// Name of the remote being pushed to
        remote: String,
        /// URL of the remote
        url: Option<String>,
    },
}

pub async fn execute(args: HookArgs, output: &Output) -> Result<ExitCode> {
    let invocation = match args.hook {
        HookCommand::PreCommit => HookInvocation::PreCommit,
        HookCommand::CommitMsg { message_file } => HookInvocation::CommitMsg { message_file },
        HookCommand::PrePush { remote, url } => {
            let updates = read_ref_updates(std::io::stdin().lock())?;
            tracing::debug!(%remote, refs = updates.len(), "Read pre-push ref updates");
            HookInvocation::PrePush {
                remote,
                url,
                updates,
            }
        }
    };

    let start_dir = std::env::current_dir()?;
    let outcome = HookOrchestrator::default().run(&invocation, &start_dir).await?;
    output.report(&outcome);

    Ok(ExitCode::from(outcome.exit_code))
}
