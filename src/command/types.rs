use crate::confirm::PendingAction;

use super::{CommandContext, CommandError};

/// What a successful command hands back to the dispatcher.
#[derive(Debug)]
pub enum CommandOutput {
    /// A message for the sender. May be empty.
    Message(String),
    /// An action the sender has to confirm before it runs.
    Confirmation(PendingAction),
}

impl CommandOutput {
    /// The message text, or the confirmation prompt.
    pub fn text(&self) -> &str {
        match self {
            CommandOutput::Message(message) => message,
            CommandOutput::Confirmation(action) => action.prompt(),
        }
    }
}

impl From<String> for CommandOutput {
    fn from(message: String) -> Self {
        CommandOutput::Message(message)
    }
}

impl From<&str> for CommandOutput {
    fn from(message: &str) -> Self {
        CommandOutput::Message(message.to_string())
    }
}

/// Result type returned by command handlers.
pub type CommandResult = Result<CommandOutput, CommandError>;

/// A command handler.
///
/// Handlers run after the arguments were matched and the context passed the
/// permission and bounds gate, so they can read their parameters without
/// re-validating presence or count.
pub trait Command: Send + Sync {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Failed`] (or any other variant) when the
    /// command cannot complete.
    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult;
}

impl<F> Command for F
where
    F: Fn(&CommandContext<'_>) -> CommandResult + Send + Sync,
{
    fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        self(ctx)
    }
}
