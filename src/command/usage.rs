use crate::parameter::{IndexedGroup, IndexedSlot, ParameterSpec};

use super::{CommandSender, CommandTree, NodeId, Permission};

fn wrap(required: bool, text: &str) -> String {
    if required {
        format!("<{text}>")
    } else {
        format!("[{text}]")
    }
}

fn slot_text(slot: &IndexedSlot) -> String {
    slot.labels()
        .iter()
        .map(|label| label.strip_prefix('!').unwrap_or(label))
        .collect::<Vec<_>>()
        .join("|")
}

fn is_literal(slot: &IndexedSlot) -> bool {
    slot.labels().len() == 1 && slot.labels()[0].starts_with('!')
}

fn render_group(group: &IndexedGroup) -> String {
    let slots = group.slots();
    if slots.len() == 1 {
        let slot = &slots[0];
        if is_literal(slot) {
            return slot_text(slot);
        }
        return wrap(group.is_required(), &slot_text(slot));
    }

    let inner = slots
        .iter()
        .map(|slot| {
            if is_literal(slot) || slot.is_required() == group.is_required() {
                slot_text(slot)
            } else {
                wrap(slot.is_required(), &slot_text(slot))
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    wrap(group.is_required(), &inner)
}

/// Renders the parameter part of a usage line.
///
/// Indexed groups come first in declaration order, then the named parameters
/// and flags `sender` is allowed to use. Required parts render in `<>`,
/// optional ones in `[]`. A multi-slot group opens one bracket for all of its
/// slots; a slot inside it is only bracketed again when its optionality
/// differs from the group's.
pub fn render_usage(spec: &ParameterSpec, sender: Option<&dyn CommandSender>) -> String {
    let permitted = |permission: Option<&Permission>| match (permission, sender) {
        (Some(permission), Some(sender)) => sender.is_authorized(permission),
        _ => true,
    };

    let mut parts: Vec<String> = spec.indexed().iter().map(render_group).collect();

    for param in spec.named() {
        if !permitted(param.permission()) {
            continue;
        }
        let text = if param.greed_count() == 0 {
            param.name().to_string()
        } else {
            format!("{} <{}>", param.name(), param.value_label())
        };
        parts.push(wrap(param.is_required(), &text));
    }

    for flag in spec.flags() {
        if permitted(flag.permission()) {
            parts.push(format!("[-{}]", flag.long_name()));
        }
    }

    parts.join(" ")
}

/// Renders `prefix`, the labels and the node's parameters as one line.
///
/// Pure grouping nodes list their subcommands as `<a|b>` instead.
pub fn usage_line(
    tree: &CommandTree,
    node: NodeId,
    labels: &[String],
    prefix: &str,
    sender: Option<&dyn CommandSender>,
) -> String {
    let Some(command) = tree.node(node) else {
        return String::new();
    };

    let params = if command.handler().is_none() && command.has_children() {
        let names = command
            .children()
            .filter_map(|child| tree.node(child))
            .map(|child| child.name().to_string())
            .collect::<Vec<_>>()
            .join("|");
        wrap(true, &names)
    } else {
        render_usage(command.parameters(), sender)
    };

    let head = format!("{prefix}{}", labels.join(" "));
    if params.is_empty() {
        head
    } else {
        format!("{head} {params}")
    }
}
