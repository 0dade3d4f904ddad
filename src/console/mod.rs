//! The process console as a command sender, plus the demo command set and
//! terminal formatting used by the `cmdtree` binary.

mod commands;
pub mod formatting;

pub use commands::{GAMEMODE, register_demo_commands};

use crate::command::{CommandSender, Locale, Permission};

/// The local console. Holds every permission.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSender {
    locale: Locale,
}

impl ConsoleSender {
    /// A console using `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl CommandSender for ConsoleSender {
    fn name(&self) -> &str {
        "console"
    }

    fn is_authorized(&self, _permission: &Permission) -> bool {
        true
    }

    fn locale(&self) -> Locale {
        self.locale.clone()
    }

    fn capability_tags(&self) -> Vec<String> {
        vec!["console".to_string()]
    }
}
