use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::command::Locale;

/// Settings applied by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct CommandsConfig {
    /// Prefix of usage lines. Also stripped from the start of input.
    pub prefix: String,

    /// Locale tag used when nothing more specific is known.
    pub default_locale: String,
}

impl CommandsConfig {
    /// The configured fallback locale.
    pub fn locale(&self) -> Locale {
        Locale::new(self.default_locale.clone())
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
            default_locale: "en_US".to_string(),
        }
    }
}
