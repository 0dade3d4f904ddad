mod file_creation;

use super::Config;
use crate::{CmdTreeError, Result};
use file_creation::create_default_config_file;
use std::{fs, path::Path};
use tracing::{debug, info};

impl Config {
    /// Loads the configuration file at `path`.
    ///
    /// A missing file is created with every option commented out, so the
    /// defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or read
    /// - The TOML content is invalid
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            info!(path = %path.display(), "Creating default configuration file");
            create_default_config_file(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| CmdTreeError::IoError {
            path: path.to_path_buf(),
            details: format!("Failed to read config file: {e}"),
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| CmdTreeError::toml_parse(e, Some(path)))?;
        debug!(path = %path.display(), aliases = config.aliases.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `CmdTreeError::TomlParseError` if the content is invalid.
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| CmdTreeError::toml_parse(e, None))
    }
}
