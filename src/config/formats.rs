use anyhow::Result;
use clap::ValueEnum;

use super::EffectiveConfig;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ConfigFormat {
    Json,
    Toml,
    #[default]
    Yaml,
}

impl EffectiveConfig {
    /// Export the effective configuration in the specified format
    pub fn export(&self, format: ConfigFormat) -> Result<String> {
        let output = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
        };

        Ok(output)
    }
}
