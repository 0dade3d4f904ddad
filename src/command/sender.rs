use std::fmt;

/// A language tag such as `en_US` or `de_DE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale from its tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The full tag.
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// The language part of the tag (`de` for `de_DE`).
    pub fn language(&self) -> &str {
        self.0
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
    }

    /// Rewrites a decimal comma to a point for languages that write one.
    pub(crate) fn normalize_decimal(&self, input: &str) -> String {
        match self.language() {
            "de" | "fr" | "es" | "it" | "nl" | "pt" | "ru" | "pl" => input.replace(',', "."),
            _ => input.to_string(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en_US")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A permission node such as `cmdtree.command.give`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission(String);

impl Permission {
    /// Creates a permission from its node name.
    pub fn new(node: impl Into<String>) -> Self {
        Self(node.into())
    }

    /// The node name.
    pub fn node(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity issuing a command.
///
/// Permission checks, translation and capability tags are supplied by the
/// host; this crate only consumes them.
pub trait CommandSender: Send + Sync {
    /// Stable name, used to key per-sender state and in logs.
    fn name(&self) -> &str;

    /// Whether the sender holds `permission`.
    fn is_authorized(&self, permission: &Permission) -> bool;

    /// The sender's locale.
    fn locale(&self) -> Locale {
        Locale::default()
    }

    /// Translates a message key. The key itself is the English message.
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }

    /// Capability tags describing what kind of sender this is
    /// (e.g. `console`, `player`, `block`).
    fn capability_tags(&self) -> Vec<String>;
}

impl fmt::Debug for dyn CommandSender + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSender")
            .field("name", &self.name())
            .finish()
    }
}
