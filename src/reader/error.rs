use thiserror::Error;

/// A token that a reader could not convert.
///
/// `template` is a message containing an `{input}` placeholder. It doubles as
/// translation key, so the sender's translation of the template is looked up
/// before the offending token is interpolated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", interpolate(.template, .input))]
pub struct ReaderError {
    /// Message template with an `{input}` placeholder.
    pub template: String,
    /// The raw token that failed to convert.
    pub input: String,
}

impl ReaderError {
    /// Creates a conversion error for `input`.
    pub fn new(template: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            input: input.into(),
        }
    }

    /// Renders a (possibly translated) template with the offending token.
    pub fn render(&self, template: &str) -> String {
        interpolate(template, &self.input)
    }
}

fn interpolate(template: &str, input: &str) -> String {
    template.replace("{input}", input)
}
