//! Command tree, dispatch and the renderers built on top of it.
//!
//! Commands are registered into a [`CommandTree`] arena once at startup. A
//! [`CommandDispatcher`] then resolves each input line to a node, matches the
//! remaining tokens against the node's parameters, runs the result through
//! the [`gate`](validate) and finally calls the node's [`Command`] handler.

mod completion;
mod context;
mod dispatcher;
mod error;
mod gate;
mod node;
mod sender;
mod tree;
mod types;
mod usage;

#[cfg(test)]
mod tests;

pub use completion::{Completer, SlotCompleter, starts_with_ignore_case};
pub use context::CommandContext;
pub use dispatcher::{CommandDispatcher, DispatchOutcome, tokenize};
pub use error::{CommandError, RegistrationError};
pub use gate::validate;
pub use node::{AliasEntry, CommandDescriptor, CommandNode, NodeId};
pub use sender::{CommandSender, Locale, Permission};
pub use tree::{CommandTree, Resolution};
pub use types::{Command, CommandOutput, CommandResult};
pub use usage::{render_usage, usage_line};
