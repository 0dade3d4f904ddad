use std::{collections::HashSet, sync::Arc};

use crate::{
    parameter::{ArgumentMatcher, IndexedSlot},
    reader::ReaderRegistry,
};

use super::{CommandContext, CommandSender, CommandTree, NodeId, Permission};

/// Supplies suggestions for a partially typed token.
pub trait Completer: Send + Sync {
    /// Suggestions for `token` given what was parsed so far.
    fn complete(&self, ctx: &CommandContext<'_>, token: &str) -> Vec<String>;
}

impl<F> Completer for F
where
    F: Fn(&CommandContext<'_>, &str) -> Vec<String> + Send + Sync,
{
    fn complete(&self, ctx: &CommandContext<'_>, token: &str) -> Vec<String> {
        self(ctx, token)
    }
}

/// Whether `candidate` starts with `token`, ignoring ASCII case.
pub fn starts_with_ignore_case(candidate: &str, token: &str) -> bool {
    candidate
        .get(..token.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(token))
}

/// Merges a delegate completer with a fixed set of labels filtered by
/// prefix.
#[derive(Clone, Default)]
pub struct SlotCompleter {
    delegate: Option<Arc<dyn Completer>>,
    static_labels: Vec<String>,
}

impl SlotCompleter {
    /// Creates the completer.
    pub fn new(delegate: Option<Arc<dyn Completer>>, static_labels: Vec<String>) -> Self {
        Self {
            delegate,
            static_labels,
        }
    }

    /// Completer for an indexed slot: its own completer plus its literal
    /// keywords and the static suggestions of the readers of its types.
    pub fn for_slot(slot: &IndexedSlot, readers: &ReaderRegistry) -> Self {
        let mut labels: Vec<String> = slot.literals().map(str::to_string).collect();
        for ty in slot.types() {
            labels.extend(readers.suggestions(ty));
        }
        Self::new(slot.completer().cloned(), labels)
    }
}

impl Completer for SlotCompleter {
    fn complete(&self, ctx: &CommandContext<'_>, token: &str) -> Vec<String> {
        let mut result = self
            .delegate
            .as_ref()
            .map(|delegate| delegate.complete(ctx, token))
            .unwrap_or_default();
        result.extend(
            self.static_labels
                .iter()
                .filter(|label| starts_with_ignore_case(label, token))
                .cloned(),
        );
        result
    }
}

/// Names and aliases of the children of `parent` the sender can see, that
/// start with `token`.
pub(crate) fn complete_children(
    tree: &CommandTree,
    parent: NodeId,
    sender: &dyn CommandSender,
    token: &str,
) -> Vec<String> {
    let Some(node) = tree.node(parent) else {
        return Vec::new();
    };
    let visible = |id: NodeId| {
        tree.node(id)
            .and_then(|child| child.permission())
            .is_none_or(|permission| sender.is_authorized(permission))
    };

    let mut names: Vec<String> = node
        .children()
        .filter(|child| visible(*child))
        .filter_map(|child| tree.node(child))
        .map(|child| child.name().to_string())
        .collect();
    names.extend(
        node.aliases()
            .filter(|alias| visible(alias.target))
            .map(|alias| alias.name.clone()),
    );
    names.retain(|name| starts_with_ignore_case(name, token));
    names
}

/// Suggestions for the parameter position `token` falls on.
///
/// `arguments` are the complete tokens before `token`. When the last of
/// them names a named parameter, its value is completed. Otherwise the
/// pending indexed slot is completed, followed by the flags and named
/// parameters not given yet.
pub(crate) fn complete_parameters(
    tree: &CommandTree,
    node: NodeId,
    sender: &dyn CommandSender,
    labels: &[String],
    readers: &ReaderRegistry,
    arguments: &[String],
    token: &str,
) -> Vec<String> {
    let Some(command) = tree.node(node) else {
        return Vec::new();
    };
    let spec = command.parameters();
    let locale = sender.locale();
    let matcher = ArgumentMatcher::new(spec, readers, &locale).lenient(true);

    if let Some((last, before)) = arguments.split_last()
        && let Some(param) = spec.find_named(last).filter(|p| p.greed_count() > 0)
    {
        let parsed = matcher
            .run(before)
            .map(|outcome| outcome.into_arguments())
            .unwrap_or_default();
        let ctx = CommandContext::new(tree, node, sender, labels.to_vec(), parsed);
        let completer = SlotCompleter::new(
            param.completer().cloned(),
            readers.suggestions(&param.value_type()),
        );
        return dedup(completer.complete(&ctx, token));
    }

    let Ok(outcome) = matcher.run(arguments) else {
        return Vec::new();
    };
    let pending = outcome.pending_slot(spec);
    let ctx = CommandContext::new(tree, node, sender, labels.to_vec(), outcome.into_arguments());
    let permitted = |permission: Option<&Permission>| {
        permission.is_none_or(|permission| sender.is_authorized(permission))
    };

    let mut result = Vec::new();
    if let Some(slot) =
        pending.and_then(|(group, slot)| spec.indexed().get(group)?.slots().get(slot))
    {
        result.extend(SlotCompleter::for_slot(slot, readers).complete(&ctx, token));
    }

    for flag in spec.flags() {
        if ctx.flags().contains(flag.long_name()) || !permitted(flag.permission()) {
            continue;
        }
        let name = format!("-{}", flag.long_name());
        if starts_with_ignore_case(&name, token) {
            result.push(name);
        }
    }

    for param in spec.named() {
        if !ctx.has_named(param.name())
            && permitted(param.permission())
            && starts_with_ignore_case(param.name(), token)
        {
            result.push(param.name().to_string());
        }
    }

    dedup(result)
}

fn dedup(mut suggestions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    suggestions.retain(|suggestion| seen.insert(suggestion.clone()));
    suggestions
}
