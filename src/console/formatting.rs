//! ANSI styling for the `cmdtree` binary's output.

/// ANSI escape sequences used by the console output.
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

fn paint(styles: &[&str], text: &str) -> String {
    format!("{}{text}{}", styles.concat(), Colors::RESET)
}

/// Section title of the command listing.
pub fn format_header(text: &str) -> String {
    paint(&[Colors::BOLD, Colors::CYAN], text)
}

/// A command name, with its aliases.
pub fn format_command(text: &str) -> String {
    paint(&[Colors::BOLD, Colors::GREEN], text)
}

/// Muted secondary text.
pub fn format_description(text: &str) -> String {
    paint(&[Colors::DIM], text)
}

/// A usage line such as `/give <item amount> [-force]`.
pub fn format_usage(text: &str) -> String {
    paint(&[Colors::DIM], text)
}

/// A question the sender has to confirm.
pub fn format_prompt(text: &str) -> String {
    paint(&[Colors::BOLD, Colors::YELLOW], text)
}

/// A rejected command.
pub fn format_error(text: &str) -> String {
    paint(&[Colors::BOLD, Colors::RED], text)
}

/// Leading whitespace for an entry `depth` levels down the command tree.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
