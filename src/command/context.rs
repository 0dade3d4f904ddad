use std::collections::{BTreeSet, HashMap};

use crate::{
    parameter::{ArgumentOrigin, ParameterSpec, ParsedArgument},
    reader::Value,
};

use super::{CommandNode, CommandSender, CommandTree, NodeId};

/// Everything a handler gets to see about one invocation.
///
/// Built fresh for every dispatch (and for every completion request) and
/// dropped afterwards.
#[derive(Debug)]
pub struct CommandContext<'a> {
    tree: &'a CommandTree,
    node: NodeId,
    sender: &'a dyn CommandSender,
    labels: Vec<String>,
    arguments: Vec<ParsedArgument>,
    named: HashMap<String, usize>,
    flags: BTreeSet<String>,
}

impl<'a> CommandContext<'a> {
    /// Creates the context for `node`. `labels` is the path used to reach it.
    pub fn new(
        tree: &'a CommandTree,
        node: NodeId,
        sender: &'a dyn CommandSender,
        labels: Vec<String>,
        arguments: Vec<ParsedArgument>,
    ) -> Self {
        let spec = tree.node(node).map(CommandNode::parameters);

        let mut named = HashMap::new();
        let mut flags = BTreeSet::new();
        for (position, argument) in arguments.iter().enumerate() {
            match argument.origin() {
                ArgumentOrigin::Named(index) => {
                    if let Some(param) = spec.and_then(|spec| spec.named().get(index)) {
                        named.insert(param.name().to_lowercase(), position);
                    }
                }
                ArgumentOrigin::Flag(index) => {
                    if let Some(flag) = spec.and_then(|spec| spec.flags().get(index)) {
                        flags.insert(flag.long_name().to_string());
                    }
                }
                ArgumentOrigin::Indexed { .. } => {}
            }
        }

        Self {
            tree,
            node,
            sender,
            labels,
            arguments,
            named,
            flags,
        }
    }

    /// The tree the command lives in.
    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    /// Handle of the resolved node.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The resolved node.
    pub fn node(&self) -> &'a CommandNode {
        self.tree.node(self.node).unwrap_or_else(|| self.tree.root())
    }

    /// The resolved node's parameters.
    pub fn spec(&self) -> &'a ParameterSpec {
        self.node().parameters()
    }

    /// The sender issuing the command.
    pub fn sender(&self) -> &'a dyn CommandSender {
        self.sender
    }

    /// Labels as typed by the sender, folded to registered names.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// All parsed arguments in input order.
    pub fn arguments(&self) -> &[ParsedArgument] {
        &self.arguments
    }

    /// The indexed arguments in input order.
    pub fn indexed(&self) -> impl Iterator<Item = &ParsedArgument> {
        self.arguments.iter().filter(|argument| argument.is_indexed())
    }

    /// Number of indexed arguments. A merged greedy run counts once.
    pub fn indexed_count(&self) -> usize {
        self.indexed().count()
    }

    /// The `index`-th indexed argument.
    pub fn indexed_arg(&self, index: usize) -> Option<&ParsedArgument> {
        self.indexed().nth(index)
    }

    /// The value of the `index`-th indexed argument.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.indexed_arg(index).map(ParsedArgument::value)
    }

    /// The named argument called `name` (or one of its aliases).
    pub fn named(&self, name: &str) -> Option<&ParsedArgument> {
        let canonical = self.spec().find_named(name)?.name().to_lowercase();
        self.named
            .get(&canonical)
            .and_then(|position| self.arguments.get(*position))
    }

    /// The value of the named argument `name`.
    pub fn named_value(&self, name: &str) -> Option<&Value> {
        self.named(name).map(ParsedArgument::value)
    }

    /// Whether the named parameter `name` was given.
    pub fn has_named(&self, name: &str) -> bool {
        self.named(name).is_some()
    }

    /// Long names of the flags present.
    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    /// Whether the flag with short or long name `name` was given.
    pub fn has_flag(&self, name: &str) -> bool {
        self.spec()
            .flags()
            .iter()
            .find(|flag| {
                flag.short_name().eq_ignore_ascii_case(name)
                    || flag.long_name().eq_ignore_ascii_case(name)
            })
            .is_some_and(|flag| self.flags.contains(flag.long_name()))
    }
}
