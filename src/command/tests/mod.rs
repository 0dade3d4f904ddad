//! Unit tests for the command module.
//! Every test builds its own tree against an in-memory sender.

#![allow(clippy::unwrap_used, clippy::panic)]


use std::{collections::HashMap, sync::Arc};

use crate::{
    command::{
        CommandContext, CommandDescriptor, CommandDispatcher, CommandError, CommandOutput,
        CommandResult, CommandSender, Locale, NodeId, Permission, starts_with_ignore_case,
    },
    parameter::{Flag, IndexedGroup, IndexedSlot, NamedParameter, ParameterSpec},
    reader::{EnumReader, ReaderRegistry, ValueType},
};

const MODE: ValueType = ValueType::new("mode");

#[derive(Debug, Default)]
struct TestSender {
    name: String,
    permissions: Vec<String>,
    tags: Vec<String>,
    translations: HashMap<String, String>,
    locale: Locale,
}

impl TestSender {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn allow(mut self, node: &str) -> Self {
        self.permissions.push(node.to_string());
        self
    }

    fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    fn translating(mut self, key: &str, value: &str) -> Self {
        self.translations.insert(key.to_string(), value.to_string());
        self
    }

    fn speaking(mut self, tag: &str) -> Self {
        self.locale = Locale::new(tag);
        self
    }
}

impl CommandSender for TestSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_authorized(&self, permission: &Permission) -> bool {
        self.permissions
            .iter()
            .any(|node| node == "*" || node == permission.node())
    }

    fn locale(&self) -> Locale {
        self.locale.clone()
    }

    fn translate(&self, key: &str) -> String {
        self.translations
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn capability_tags(&self) -> Vec<String> {
        self.tags.clone()
    }
}

fn alice() -> TestSender {
    TestSender::new("alice").allow("test.give").tag("player")
}

fn give(ctx: &CommandContext<'_>) -> CommandResult {
    let item = ctx.value(0).and_then(|v| v.as_str()).unwrap_or_default();
    let amount = ctx.value(1).and_then(|v| v.as_i64()).unwrap_or_default();
    let target = ctx
        .named_value("to")
        .and_then(|v| v.as_str())
        .unwrap_or(ctx.sender().name());
    let forced = if ctx.has_flag("force") { " forced" } else { "" };
    Ok(CommandOutput::Message(format!(
        "{amount} {item} -> {target}{forced}"
    )))
}

fn echo(ctx: &CommandContext<'_>) -> CommandResult {
    let raws: Vec<&str> = ctx.arguments().iter().map(|a| a.raw()).collect();
    Ok(CommandOutput::Message(raws.join(",")))
}

fn players(_ctx: &CommandContext<'_>, token: &str) -> Vec<String> {
    ["alice", "bob"]
        .iter()
        .filter(|name| starts_with_ignore_case(name, token))
        .map(|name| name.to_string())
        .collect()
}

fn give_spec(readers: &ReaderRegistry) -> ParameterSpec {
    ParameterSpec::builder()
        .indexed(IndexedGroup::fixed(vec![
            IndexedSlot::new("item", ValueType::STRING),
            IndexedSlot::new("amount", ValueType::LONG),
        ]))
        .named(
            NamedParameter::new("to", ValueType::STRING)
                .label("player")
                .alias("for")
                .with_completer(Arc::new(players)),
        )
        .flag(Flag::new("f", "force"))
        .build(readers)
        .unwrap()
}

fn pair_spec(readers: &ReaderRegistry) -> ParameterSpec {
    ParameterSpec::builder()
        .indexed(IndexedGroup::single(IndexedSlot::new("player", ValueType::STRING)))
        .indexed(IndexedGroup::single(IndexedSlot::new("node", ValueType::STRING)))
        .build(readers)
        .unwrap()
}

struct Fixture {
    dispatcher: CommandDispatcher,
    give: NodeId,
    perm: NodeId,
    add: NodeId,
    remove: NodeId,
}

/// ```text
/// fail
/// gamemode <mode>
/// give <item amount> [to <player>] [-force]     (test.give)
/// perm add <player> <node>
/// perm remove|rm <player> <node>
/// secret                                        (test.secret)
/// ```
fn fixture() -> Fixture {
    let readers = Arc::new(ReaderRegistry::with_defaults());
    readers.register(
        EnumReader::new("mode", &["survival", "creative", "spectator"]),
        &[MODE],
    );
    let mut dispatcher = CommandDispatcher::new(Arc::clone(&readers));
    let tree = dispatcher.tree_mut();

    let give = tree
        .register_command(
            CommandDescriptor {
                name: "give".to_string(),
                description: "Gives an item".to_string(),
                permission: Some(Permission::new("test.give")),
                parameters: give_spec(&readers),
                ..CommandDescriptor::default()
            },
            Some(Arc::new(give)),
        )
        .unwrap();

    tree.register_command(
        CommandDescriptor {
            name: "gamemode".to_string(),
            parameters: ParameterSpec::builder()
                .indexed(IndexedGroup::single(IndexedSlot::new("mode", MODE)))
                .build(&readers)
                .unwrap(),
            ..CommandDescriptor::default()
        },
        Some(Arc::new(echo)),
    )
    .unwrap();

    let perm = tree
        .register_command(CommandDescriptor::new("perm", "Permissions"), None)
        .unwrap();
    let add = tree
        .register(
            perm,
            CommandDescriptor {
                name: "add".to_string(),
                parameters: pair_spec(&readers),
                ..CommandDescriptor::default()
            },
            Some(Arc::new(echo)),
        )
        .unwrap();
    let remove = tree
        .register(
            perm,
            CommandDescriptor {
                name: "remove".to_string(),
                parameters: pair_spec(&readers),
                ..CommandDescriptor::default()
            },
            Some(Arc::new(echo)),
        )
        .unwrap();
    tree.add_alias(remove, "rm", &[]).unwrap();

    tree.register_command(
        CommandDescriptor {
            name: "secret".to_string(),
            permission: Some(Permission::new("test.secret")),
            ..CommandDescriptor::default()
        },
        Some(Arc::new(echo)),
    )
    .unwrap();

    tree.register_command(
        CommandDescriptor::new("fail", "Always fails"),
        Some(Arc::new(|_: &CommandContext<'_>| -> CommandResult {
            Err(CommandError::Failed("boom".to_string()))
        })),
    )
    .unwrap();

    Fixture {
        dispatcher,
        give,
        perm,
        add,
        remove,
    }
}
