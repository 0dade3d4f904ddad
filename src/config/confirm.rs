use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings of the confirmation queue.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Seconds a pending confirmation waits before it expires.
    pub timeout_secs: u64,
}

impl ConfirmConfig {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}
