use clap::Parser;
use std::process::ExitCode;

use commit_shame::cli::Output;
use commit_shame::cli::commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
            let _ = e.print();
            return code;
        }
    };

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            Output::new(0, false).error(&format!("{e:#}"));
            ExitCode::from(1)
        }
    }
}
