//! User config file section for filename decoding.

use std::fs;

use anyhow::Context;
use serde::Deserialize;

use crate::decode::NamingStyle;

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub log: bool,
    #[serde(default)]
    pub move_files: bool,
    #[serde(default)]
    pub naming: NamingStyle,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub placeholder_extensions: Vec<String>,
    #[serde(default)]
    pub source_dir: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    fndecode: DecodeConfig,
}

impl DecodeConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.fndecode)
            .context("Failed to parse fndecode config TOML")
    }
}
