//! Configuration schema definitions and loading.
//!
//! Defines the complete configuration structure for cmdtree: logging, the
//! command prefix and fallback locale, the confirmation timeout and
//! command aliases declared by the user. All configurations are
//! serializable to/from TOML format.

mod commands;
mod confirm;
mod general;
mod loading;
mod paths;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

pub use commands::CommandsConfig;
pub use confirm::ConfirmConfig;
pub use general::{GeneralConfig, LogFormat, LogLevel};
pub use paths::ConfigPaths;

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::{CmdTreeError, Result};

/// Main configuration structure for cmdtree.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Command dispatch settings.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Confirmation queue settings.
    #[serde(default)]
    pub confirm: ConfirmConfig,

    /// Top-level aliases, mapping the alias to a space separated command
    /// path (e.g. `gm = "gamemode"`).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Renders the JSON schema of [`Config`].
///
/// # Errors
///
/// Returns `CmdTreeError::Config` if the schema cannot be serialized.
pub fn schema_json() -> Result<String> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| CmdTreeError::Config(format!("Failed to serialize schema: {e}")))
}
