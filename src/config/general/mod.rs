mod log_level;

pub use log_level::{LogFormat, LogLevel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// General configuration settings for cmdtree.
///
/// Contains global settings that affect the overall behavior of the application,
/// such as logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct GeneralConfig {
    /// Logging level for the application.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Output format of the console log.
    #[serde(default)]
    pub log_format: LogFormat,
}
