use std::sync::Arc;

use tracing::{debug, instrument};

use super::{
    AliasEntry, Command, CommandDescriptor, CommandError, CommandNode, NodeId, RegistrationError,
};

/// A resolved invocation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    node: NodeId,
    labels: Vec<String>,
    arguments: Vec<String>,
}

impl Resolution {
    /// The node the tokens resolved to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The consumed tokens, folded to the registered name or alias.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The tokens left for the parameter matcher.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Consumes the resolution, returning the argument tokens.
    pub fn into_arguments(self) -> Vec<String> {
        self.arguments
    }
}

/// Arena holding every command node.
///
/// Nodes are created detached, then attached exactly once with
/// [`add_child`](Self::add_child). Further appearances elsewhere in the tree
/// go through [`add_alias`](Self::add_alias).
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    /// Creates a tree holding only the root.
    pub fn new() -> Self {
        let mut root = CommandNode::new(CommandDescriptor::default(), None);
        root.registered = true;
        Self { nodes: vec![root] }
    }

    /// Creates a detached node.
    pub fn create(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Option<Arc<dyn Command>>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode::new(descriptor, handler));
        id
    }

    /// Creates a node and attaches it under `parent`.
    ///
    /// # Errors
    ///
    /// See [`add_child`](Self::add_child).
    pub fn register(
        &mut self,
        parent: NodeId,
        descriptor: CommandDescriptor,
        handler: Option<Arc<dyn Command>>,
    ) -> Result<NodeId, RegistrationError> {
        self.check(parent)?;
        let id = self.create(descriptor, handler);
        if let Err(error) = self.add_child(parent, id) {
            self.nodes.pop();
            return Err(error);
        }
        Ok(id)
    }

    /// Creates a top-level command.
    ///
    /// # Errors
    ///
    /// See [`add_child`](Self::add_child).
    pub fn register_command(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Option<Arc<dyn Command>>,
    ) -> Result<NodeId, RegistrationError> {
        self.register(NodeId::ROOT, descriptor, handler)
    }

    /// Attaches `child` under `parent`.
    ///
    /// # Errors
    ///
    /// * [`RegistrationError::UnknownNode`] - either handle is not in the tree
    /// * [`RegistrationError::SelfRegistration`] - `child == parent`
    /// * [`RegistrationError::AlreadyRegistered`] - `child` already has a parent
    /// * [`RegistrationError::DuplicateName`] - a sibling uses the name
    #[instrument(skip(self), err)]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), RegistrationError> {
        self.check(parent)?;
        self.check(child)?;

        if parent == child {
            return Err(RegistrationError::SelfRegistration(
                self.nodes[child.0].name.clone(),
            ));
        }
        if self.nodes[child.0].registered {
            return Err(RegistrationError::AlreadyRegistered(
                self.nodes[child.0].name.clone(),
            ));
        }

        let key = self.nodes[child.0].name.to_lowercase();
        self.ensure_free(parent, &key)?;

        self.nodes[parent.0].children.insert(key, child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.registered = true;

        debug!(command = %self.path(child), "Registered command");
        Ok(())
    }

    /// Makes `target` reachable as `alias` under each of `parents`, or under
    /// the target's own parent when `parents` is empty.
    ///
    /// # Errors
    ///
    /// * [`RegistrationError::UnknownNode`] - a handle is not in the tree
    /// * [`RegistrationError::AliasTargetNotFound`] - no parent was given and
    ///   the target is detached
    /// * [`RegistrationError::DuplicateName`] - a parent already uses the name
    #[instrument(skip(self), err)]
    pub fn add_alias(
        &mut self,
        target: NodeId,
        alias: &str,
        parents: &[NodeId],
    ) -> Result<(), RegistrationError> {
        self.check(target)?;

        let parents = if parents.is_empty() {
            let parent = self.nodes[target.0]
                .parent
                .ok_or_else(|| RegistrationError::AliasTargetNotFound(alias.to_string()))?;
            vec![parent]
        } else {
            parents.to_vec()
        };

        let key = alias.to_lowercase();
        for parent in &parents {
            self.check(*parent)?;
            self.ensure_free(*parent, &key)?;
        }

        for parent in parents {
            self.nodes[parent.0].aliases.insert(
                key.clone(),
                AliasEntry {
                    name: alias.to_string(),
                    target,
                },
            );
            debug!(alias, target = %self.path(target), parent = %self.path(parent), "Registered alias");
        }
        self.nodes[target.0].alias_names.push(alias.to_string());
        Ok(())
    }

    /// Changes the label `id` is displayed under in [`labels`](Self::labels)
    /// and usage lines. Lookup still goes by name and aliases.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnknownNode`] for a foreign handle.
    pub fn set_label(&mut self, id: NodeId, label: &str) -> Result<(), RegistrationError> {
        self.check(id)?;
        self.nodes[id.0].label = label.to_string();
        Ok(())
    }

    /// The node behind `id`.
    pub fn node(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    /// The root node.
    pub fn root(&self) -> &CommandNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Looks up `name` among the children and aliases of `parent`, ignoring
    /// case. Returns the target and the name it was registered under.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<(NodeId, &str)> {
        let node = self.node(parent)?;
        let key = name.to_lowercase();
        if let Some(child) = node.children.get(&key) {
            return Some((*child, self.nodes[child.0].name.as_str()));
        }
        node.aliases
            .get(&key)
            .map(|entry| (entry.target, entry.name.as_str()))
    }

    /// Resolves `tokens` to the deepest matching node.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::CommandNotFound`] when the first token names no
    /// top-level command, or when there is no token at all.
    pub fn resolve(&self, tokens: &[String]) -> Result<Resolution, CommandError> {
        let first = tokens
            .first()
            .ok_or_else(|| CommandError::CommandNotFound(String::new()))?;
        let (mut current, name) = self
            .child(NodeId::ROOT, first)
            .ok_or_else(|| CommandError::CommandNotFound(first.clone()))?;

        let mut labels = vec![name.to_string()];
        let mut consumed = 1;

        while let Some(token) = tokens.get(consumed) {
            let Some((next, name)) = self.child(current, token) else {
                break;
            };
            labels.push(name.to_string());
            current = next;
            consumed += 1;
        }

        Ok(Resolution {
            node: current,
            labels,
            arguments: tokens[consumed..].to_vec(),
        })
    }

    /// Canonical labels from the top-level command down to `id`.
    pub fn labels(&self, id: NodeId) -> Vec<String> {
        let mut labels = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            if node.parent.is_none() {
                break;
            }
            labels.push(node.label.clone());
            current = node.parent;
        }
        labels.reverse();
        labels
    }

    /// Canonical labels joined by spaces.
    pub fn path(&self, id: NodeId) -> String {
        self.labels(id).join(" ")
    }

    /// Finds the node at a space separated path of names or aliases.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.split_whitespace()
            .try_fold(NodeId::ROOT, |current, name| {
                self.child(current, name).map(|(id, _)| id)
            })
            .filter(|id| *id != NodeId::ROOT)
    }

    /// Every attached node below the root, depth first, paired with its
    /// depth (top-level commands have depth 0).
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, NodeId)> = self
            .root()
            .children()
            .rev()
            .map(|child| (0, child))
            .collect();

        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            stack.extend(
                self.nodes[id.0]
                    .children()
                    .rev()
                    .map(|child| (depth + 1, child)),
            );
        }
        out
    }

    fn check(&self, id: NodeId) -> Result<(), RegistrationError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(RegistrationError::UnknownNode(id.0))
        }
    }

    fn ensure_free(&self, parent: NodeId, key: &str) -> Result<(), RegistrationError> {
        let node = &self.nodes[parent.0];
        if node.children.contains_key(key) || node.aliases.contains_key(key) {
            let parent_path = self.path(parent);
            return Err(RegistrationError::DuplicateName {
                name: key.to_string(),
                parent: if parent_path.is_empty() {
                    "/".to_string()
                } else {
                    parent_path
                },
            });
        }
        Ok(())
    }
}
