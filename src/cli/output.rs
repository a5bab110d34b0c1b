//! Terminal output for commit-shame
//!
//! The verdict report goes to stdout so git shows it to the committer; logs
//! and fatal errors go to stderr.

use console::{StyledObject, style};

use crate::hooks::{HookOutcome, RenderedMessage};
use crate::verdict::Verdict;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: u8,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: u8, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are always shown, even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {item}");
        }
    }

    /// Print the verdict report of a hook run.
    ///
    /// A clean pass is silent in quiet mode; warnings and blocks always print.
    pub fn report(&self, outcome: &HookOutcome) {
        if self.quiet && outcome.verdict == Verdict::Pass {
            return;
        }

        if let Some(primary) = &outcome.primary {
            println!("{}", verdict_line(primary));
        }
        for message in &outcome.supplementary {
            println!("  {}", verdict_line(message));
        }
        if let Some(advisory) = &outcome.advisory {
            println!("{} {}", style("⚠ ADVISORY").yellow().bold(), advisory);
        }
        if self.is_verbose() {
            println!(
                "{} {} {}",
                style("❯").cyan(),
                style(outcome.event).dim(),
                style(format!("verdict: {}, exit {}", outcome.verdict, outcome.exit_code)).dim()
            );
        }
    }
}

fn verdict_symbol(verdict: Verdict) -> StyledObject<&'static str> {
    match verdict {
        Verdict::Pass => style("✔").green(),
        Verdict::Warn => style("⚠").yellow(),
        Verdict::Block => style("✖").red().bold(),
    }
}

/// `✖ [DiffSizeRule] 812 lines in one commit? ...`
pub fn verdict_line(message: &RenderedMessage) -> String {
    format!(
        "{} {} {}",
        verdict_symbol(message.verdict),
        style(format!("[{}]", message.source)).bold(),
        message.text
    )
}
