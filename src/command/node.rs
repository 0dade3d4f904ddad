use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::parameter::ParameterSpec;

use super::{Command, Permission};

/// Handle of a node inside a [`CommandTree`](super::CommandTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The invisible root every top-level command hangs off.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in its tree.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Everything needed to create a command node.
#[derive(Debug, Clone, Default)]
pub struct CommandDescriptor {
    /// The command name, matched case-insensitively.
    pub name: String,

    /// One line describing what the command does.
    pub description: String,

    /// Name of the module that registered the command.
    pub owner: String,

    /// Permission the sender must hold to run the command.
    pub permission: Option<Permission>,

    /// Capability tags of senders allowed to run the command. Empty means
    /// every sender.
    pub restricted_to: Vec<String>,

    /// Accepted parameters.
    pub parameters: ParameterSpec,
}

impl CommandDescriptor {
    /// A descriptor with only a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// An alias installed into a parent, redirecting to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// The alias as registered.
    pub name: String,
    /// The node the alias resolves to.
    pub target: NodeId,
}

/// A node of the command tree.
pub struct CommandNode {
    pub(super) name: String,
    pub(super) label: String,
    pub(super) description: String,
    pub(super) owner: String,
    pub(super) permission: Option<Permission>,
    pub(super) restricted_to: Vec<String>,
    pub(super) parameters: ParameterSpec,
    pub(super) children: BTreeMap<String, NodeId>,
    pub(super) aliases: BTreeMap<String, AliasEntry>,
    pub(super) alias_names: Vec<String>,
    pub(super) parent: Option<NodeId>,
    pub(super) registered: bool,
    pub(super) handler: Option<Arc<dyn Command>>,
}

impl CommandNode {
    pub(super) fn new(descriptor: CommandDescriptor, handler: Option<Arc<dyn Command>>) -> Self {
        Self {
            label: descriptor.name.clone(),
            name: descriptor.name,
            description: descriptor.description,
            owner: descriptor.owner,
            permission: descriptor.permission,
            restricted_to: descriptor.restricted_to,
            parameters: descriptor.parameters,
            children: BTreeMap::new(),
            aliases: BTreeMap::new(),
            alias_names: Vec::new(),
            parent: None,
            registered: false,
            handler,
        }
    }

    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display label, the name unless changed.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The module that registered the command.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The permission guarding the node.
    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Capability tags of senders allowed to run the command.
    pub fn restricted_to(&self) -> &[String] {
        &self.restricted_to
    }

    /// The accepted parameters.
    pub fn parameters(&self) -> &ParameterSpec {
        &self.parameters
    }

    /// The parent, `None` for the root and for unattached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether the node was attached to a parent.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Whether the node has subcommands.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child handles ordered by lowercase name.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Aliases installed into this node.
    pub fn aliases(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.values()
    }

    /// Names under which this node is aliased elsewhere.
    pub fn alias_names(&self) -> &[String] {
        &self.alias_names
    }

    /// The handler, `None` for pure grouping nodes.
    pub fn handler(&self) -> Option<&Arc<dyn Command>> {
        self.handler.as_ref()
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("aliases", &self.aliases)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}
