use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::Output;
use crate::config::ShameLevel;
use crate::tone::{self, DEFAULT_PACK};

#[derive(Args, Default)]
pub struct PacksArgs {}

pub fn execute(_args: PacksArgs, output: &Output) -> Result<ExitCode> {
    output.header("Insult packs");
    for pack in tone::pack_names() {
        if pack == DEFAULT_PACK {
            output.list_item(&format!("{pack} (default)"));
        } else {
            output.list_item(pack);
        }
    }

    output.header("Shame levels");
    for level in ShameLevel::ALL {
        if level == ShameLevel::default() {
            output.list_item(&format!("{level} (default)"));
        } else {
            output.list_item(level.as_str());
        }
    }
    Ok(ExitCode::SUCCESS)
}
