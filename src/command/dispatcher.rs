use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, instrument, warn};

use crate::{
    config::CommandsConfig,
    parameter::ArgumentMatcher,
    reader::ReaderRegistry,
};

use super::{
    CommandContext, CommandError, CommandOutput, CommandResult, CommandSender, CommandTree,
    NodeId, RegistrationError, completion, gate, usage,
};

/// What [`CommandDispatcher::dispatch`] reports back to the sender.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran.
    Completed(CommandOutput),
    /// The invocation failed before or inside the handler.
    Rejected {
        /// The error, translated for the sender.
        message: String,
        /// Usage of the resolved command, for argument errors.
        usage: Option<String>,
    },
}

impl DispatchOutcome {
    /// Whether the handler ran successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed(_))
    }
}

/// Splits a command line on whitespace.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Owns the command tree and runs invocations against it.
///
/// Registration goes through [`tree_mut`](Self::tree_mut) before the
/// dispatcher is shared; dispatch and completion only need `&self`.
#[derive(Debug)]
pub struct CommandDispatcher {
    tree: CommandTree,
    readers: Arc<ReaderRegistry>,
    settings: CommandsConfig,
}

impl CommandDispatcher {
    /// Creates a dispatcher with an empty tree and default settings.
    pub fn new(readers: Arc<ReaderRegistry>) -> Self {
        Self::with_settings(readers, CommandsConfig::default())
    }

    /// Creates a dispatcher using `settings` for the usage prefix and the
    /// fallback locale.
    pub fn with_settings(readers: Arc<ReaderRegistry>, settings: CommandsConfig) -> Self {
        Self {
            tree: CommandTree::new(),
            readers,
            settings,
        }
    }

    /// The command tree.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The command tree, for registration.
    pub fn tree_mut(&mut self) -> &mut CommandTree {
        &mut self.tree
    }

    /// The shared reader registry.
    pub fn readers(&self) -> &Arc<ReaderRegistry> {
        &self.readers
    }

    /// The active settings.
    pub fn settings(&self) -> &CommandsConfig {
        &self.settings
    }

    /// Installs top-level aliases mapping to space separated command paths.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::AliasTargetNotFound`] for a path that
    /// does not resolve, or the error of [`CommandTree::add_alias`].
    pub fn register_aliases(
        &mut self,
        aliases: &BTreeMap<String, String>,
    ) -> Result<(), RegistrationError> {
        for (alias, path) in aliases {
            let target = self
                .tree
                .find(path)
                .ok_or_else(|| RegistrationError::AliasTargetNotFound(path.clone()))?;
            self.tree.add_alias(target, alias, &[NodeId::ROOT])?;
        }
        Ok(())
    }

    fn strip_prefix<'l>(&self, line: &'l str) -> &'l str {
        let trimmed = line.trim_start();
        match self.settings.prefix.as_str() {
            "" => trimmed,
            prefix => trimmed.strip_prefix(prefix).unwrap_or(trimmed),
        }
    }

    /// Runs `line` for `sender`, returning the handler's output or the first
    /// error met.
    ///
    /// # Errors
    ///
    /// Any [`CommandError`]: resolution, matching and gate failures as well
    /// as failures reported by the handler.
    pub fn try_dispatch(&self, sender: &dyn CommandSender, line: &str) -> CommandResult {
        let tokens = tokenize(self.strip_prefix(line));
        let resolution = self.tree.resolve(&tokens)?;
        let node_id = resolution.node();
        let node = self
            .tree
            .node(node_id)
            .ok_or_else(|| CommandError::CommandNotFound(line.to_string()))?;

        gate::require(sender, node.permission())?;

        let locale = sender.locale();
        let outcome = ArgumentMatcher::new(node.parameters(), &self.readers, &locale)
            .run(resolution.arguments())?;

        let ctx = CommandContext::new(
            &self.tree,
            node_id,
            sender,
            resolution.labels().to_vec(),
            outcome.into_arguments(),
        );
        gate::validate(&ctx)?;

        let Some(handler) = node.handler() else {
            return Err(CommandError::NotExecutable {
                command: self.tree.path(node_id),
                subcommands: node
                    .children()
                    .filter_map(|child| self.tree.node(child))
                    .map(|child| child.name().to_string())
                    .collect(),
            });
        };

        debug!(
            sender = sender.name(),
            command = %self.tree.path(node_id),
            arguments = ctx.arguments().len(),
            "Executing command"
        );
        handler.execute(&ctx)
    }

    /// Runs `line` for `sender` and reports the result. Errors never escape:
    /// they are translated for the sender and logged.
    #[instrument(skip(self, sender), fields(sender = sender.name()))]
    pub fn dispatch(&self, sender: &dyn CommandSender, line: &str) -> DispatchOutcome {
        match self.try_dispatch(sender, line) {
            Ok(output) => DispatchOutcome::Completed(output),
            Err(error) => {
                warn!(error = %error, "Command failed");
                let usage = match error {
                    CommandError::ArgumentParse { .. }
                    | CommandError::InvalidArgument { .. }
                    | CommandError::TooFewArguments
                    | CommandError::TooManyArguments
                    | CommandError::MissingParameter(_) => self.usage(sender, line),
                    _ => None,
                };
                DispatchOutcome::Rejected {
                    message: error.localize(sender),
                    usage,
                }
            }
        }
    }

    /// Usage line of the command `line` resolves to, with the labels as
    /// typed.
    pub fn usage(&self, sender: &dyn CommandSender, line: &str) -> Option<String> {
        let tokens = tokenize(self.strip_prefix(line));
        let resolution = self.tree.resolve(&tokens).ok()?;
        Some(usage::usage_line(
            &self.tree,
            resolution.node(),
            resolution.labels(),
            &self.settings.prefix,
            Some(sender),
        ))
    }

    /// Canonical usage line of `node`.
    pub fn usage_of(&self, node: NodeId, sender: Option<&dyn CommandSender>) -> String {
        usage::usage_line(
            &self.tree,
            node,
            &self.tree.labels(node),
            &self.settings.prefix,
            sender,
        )
    }

    /// Suggestions for the last token of `line`. A line ending in whitespace
    /// completes a new, empty token.
    pub fn complete(&self, sender: &dyn CommandSender, line: &str) -> Vec<String> {
        let stripped = self.strip_prefix(line);
        let mut tokens = tokenize(stripped);
        if stripped.is_empty() || stripped.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }

        let suggestions = match tokens.split_last() {
            None => Vec::new(),
            Some((token, [])) => {
                completion::complete_children(&self.tree, NodeId::ROOT, sender, token)
            }
            Some((token, before)) => self.complete_after(sender, before, token),
        };

        debug!(
            sender = sender.name(),
            line,
            suggestions = suggestions.len(),
            "Tab completion"
        );
        suggestions
    }

    fn complete_after(
        &self,
        sender: &dyn CommandSender,
        before: &[String],
        token: &str,
    ) -> Vec<String> {
        let Ok(resolution) = self.tree.resolve(before) else {
            return Vec::new();
        };
        let node = resolution.node();
        let allowed = self
            .tree
            .node(node)
            .and_then(|node| node.permission())
            .is_none_or(|permission| sender.is_authorized(permission));
        if !allowed {
            return Vec::new();
        }

        let mut suggestions = if resolution.arguments().is_empty() {
            completion::complete_children(&self.tree, node, sender, token)
        } else {
            Vec::new()
        };
        for suggestion in completion::complete_parameters(
            &self.tree,
            node,
            sender,
            resolution.labels(),
            &self.readers,
            resolution.arguments(),
            token,
        ) {
            if !suggestions.contains(&suggestion) {
                suggestions.push(suggestion);
            }
        }
        suggestions
    }
}
