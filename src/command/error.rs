use thiserror::Error;

use crate::reader::{ReaderError, ValueType};

use super::{CommandSender, Permission};

/// Errors raised while dispatching a single command invocation.
///
/// Every variant is recoverable: the dispatcher catches it, translates it for
/// the sender and reports it without touching any other invocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The first token names no registered command.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// A token matched no flag, named parameter or indexed slot.
    #[error("Could not match argument: {token}")]
    ArgumentParse {
        /// The unmatched token.
        token: String,
    },

    /// A token matched a parameter but its reader rejected it.
    #[error("Invalid argument for {value_type}: {source}")]
    InvalidArgument {
        /// The type the token should have converted into.
        value_type: ValueType,
        /// The reader failure with the offending token.
        #[source]
        source: ReaderError,
    },

    /// Fewer indexed arguments than the parameters require.
    #[error("You've given too few arguments.")]
    TooFewArguments,

    /// More indexed arguments than the parameters accept.
    #[error("You've given too many arguments.")]
    TooManyArguments,

    /// A required named parameter is absent.
    #[error("The parameter {0} is missing!")]
    MissingParameter(String),

    /// The sender lacks a permission.
    #[error("You are not allowed to do this. Missing permission: {0}")]
    PermissionDenied(Permission),

    /// The command is restricted to other kinds of senders.
    #[error("This command cannot be used by {sender}")]
    RestrictedSender {
        /// Name of the rejected sender.
        sender: String,
        /// Capability tags any of which would have been accepted.
        allowed: Vec<String>,
    },

    /// The node only groups subcommands.
    #[error("{command} needs a subcommand: {}", .subcommands.join(", "))]
    NotExecutable {
        /// Path of the node.
        command: String,
        /// Names of its children.
        subcommands: Vec<String>,
    },

    /// The handler reported a failure.
    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    /// Renders the error for `sender`, translating the message template
    /// before the variable parts are interpolated.
    pub fn localize(&self, sender: &dyn CommandSender) -> String {
        match self {
            CommandError::CommandNotFound(name) => {
                sender.translate("Command not found: {command}").replace("{command}", name)
            }
            CommandError::ArgumentParse { token } => sender
                .translate("Could not match argument: {input}")
                .replace("{input}", token),
            CommandError::InvalidArgument { source, .. } => {
                source.render(&sender.translate(&source.template))
            }
            CommandError::TooFewArguments => sender.translate("You've given too few arguments."),
            CommandError::TooManyArguments => sender.translate("You've given too many arguments."),
            CommandError::MissingParameter(name) => sender
                .translate("The parameter {name} is missing!")
                .replace("{name}", name),
            CommandError::PermissionDenied(permission) => sender
                .translate("You are not allowed to do this. Missing permission: {permission}")
                .replace("{permission}", permission.node()),
            CommandError::RestrictedSender { sender: name, .. } => sender
                .translate("This command cannot be used by {sender}")
                .replace("{sender}", name),
            CommandError::NotExecutable {
                command,
                subcommands,
            } => sender
                .translate("{command} needs a subcommand: {subcommands}")
                .replace("{command}", command)
                .replace("{subcommands}", &subcommands.join(", ")),
            CommandError::Failed(message) => sender.translate(message),
        }
    }
}

/// Errors raised while building the command tree or a parameter specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The handle does not belong to the tree.
    #[error("Unknown command node #{0}")]
    UnknownNode(usize),

    /// A node was added as its own child.
    #[error("You can't register a command as a child of itself: {0}")]
    SelfRegistration(String),

    /// The node already has a parent.
    #[error("The command {0} is already registered! Use aliases instead!")]
    AlreadyRegistered(String),

    /// A sibling with the same name or alias exists.
    #[error("A command named {name} already exists under {parent}")]
    DuplicateName {
        /// The clashing name.
        name: String,
        /// Path of the parent.
        parent: String,
    },

    /// A parameter declares a type no reader can handle.
    #[error("The parameter '{parameter}' has an unreadable type: {value_type}")]
    UnreadableType {
        /// Label of the offending parameter.
        parameter: String,
        /// The unreadable type.
        value_type: ValueType,
    },

    /// A parameter was declared without any label or name.
    #[error("A parameter needs at least one label")]
    MissingLabel,

    /// An alias target path does not resolve.
    #[error("Alias target not found: {0}")]
    AliasTargetNotFound(String),
}
