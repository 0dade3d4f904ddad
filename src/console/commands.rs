use std::sync::Arc;

use crate::{
    command::{
        CommandContext, CommandDescriptor, CommandDispatcher, CommandError, CommandOutput,
        CommandResult, Permission, RegistrationError,
    },
    confirm::PendingAction,
    parameter::{Flag, IndexedGroup, IndexedSlot, NamedParameter, ParameterSpec},
    reader::{EnumReader, ValueType},
};

/// Game modes accepted by `gamemode`.
pub const GAMEMODE: ValueType = ValueType::new("GameMode");

fn text(ctx: &CommandContext<'_>, index: usize) -> Result<String, CommandError> {
    ctx.value(index)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| CommandError::MissingParameter(index.to_string()))
}

fn give(ctx: &CommandContext<'_>) -> CommandResult {
    let item = text(ctx, 0)?;
    let amount = ctx.value(1).and_then(|value| value.as_i64()).unwrap_or(1);
    let target = ctx
        .named_value("to")
        .and_then(|value| value.as_str())
        .unwrap_or_else(|| ctx.sender().name());

    let mut message = format!("Gave {amount} {item} to {target}");
    if ctx.has_flag("force") {
        message.push_str(" (forced)");
    }
    Ok(CommandOutput::Message(message))
}

fn gamemode(ctx: &CommandContext<'_>) -> CommandResult {
    let mode = text(ctx, 0)?.to_lowercase();
    Ok(CommandOutput::Message(format!("Game mode set to {mode}")))
}

fn say(ctx: &CommandContext<'_>) -> CommandResult {
    Ok(CommandOutput::Message(format!(
        "[{}] {}",
        ctx.sender().name(),
        text(ctx, 0)?
    )))
}

fn teleport(ctx: &CommandContext<'_>) -> CommandResult {
    let coordinate = |index: usize| {
        ctx.value(index)
            .and_then(|value| value.as_f64())
            .ok_or_else(|| CommandError::MissingParameter(index.to_string()))
    };
    let (x, y, z) = (coordinate(0)?, coordinate(1)?, coordinate(2)?);
    let world = ctx
        .named_value("world")
        .and_then(|value| value.as_str())
        .unwrap_or("world");
    Ok(CommandOutput::Message(format!(
        "Teleported to {x} {y} {z} in {world}"
    )))
}

fn perm_add(ctx: &CommandContext<'_>) -> CommandResult {
    Ok(CommandOutput::Message(format!(
        "Granted {} to {}",
        text(ctx, 1)?,
        text(ctx, 0)?
    )))
}

fn perm_remove(ctx: &CommandContext<'_>) -> CommandResult {
    Ok(CommandOutput::Message(format!(
        "Revoked {} from {}",
        text(ctx, 1)?,
        text(ctx, 0)?
    )))
}

fn wipe(ctx: &CommandContext<'_>) -> CommandResult {
    let sender = ctx.sender().name().to_string();
    Ok(CommandOutput::Confirmation(PendingAction::new(
        "Do you really want to wipe all data? Confirm within the timeout.",
        move || Ok(CommandOutput::Message(format!("{sender} wiped all data"))),
    )))
}

/// Registers the demo command set used by the binary and the tests:
///
/// ```text
/// give <item amount> [to <player>] [-force]
/// gamemode <mode>
/// say <message>
/// teleport|tp <x y z> [world <world>]
/// perm add <player> <node>
/// perm remove|rm <player> <node>
/// wipe
/// ```
///
/// # Errors
///
/// Returns the first [`RegistrationError`] met.
pub fn register_demo_commands(dispatcher: &mut CommandDispatcher) -> Result<(), RegistrationError> {
    let readers = Arc::clone(dispatcher.readers());
    readers.register(
        EnumReader::new(
            GAMEMODE.name(),
            &["survival", "creative", "adventure", "spectator"],
        ),
        &[GAMEMODE],
    );

    let tree = dispatcher.tree_mut();

    tree.register_command(
        CommandDescriptor {
            name: "give".to_string(),
            description: "Gives an item".to_string(),
            owner: "core".to_string(),
            permission: Some(Permission::new("cmdtree.command.give")),
            parameters: ParameterSpec::builder()
                .indexed(IndexedGroup::fixed(vec![
                    IndexedSlot::new("item", ValueType::STRING),
                    IndexedSlot::new("amount", ValueType::LONG),
                ]))
                .named(NamedParameter::new("to", ValueType::STRING).label("player"))
                .flag(Flag::new("f", "force"))
                .build(&readers)?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(give)),
    )?;

    tree.register_command(
        CommandDescriptor {
            name: "gamemode".to_string(),
            description: "Changes the game mode".to_string(),
            owner: "core".to_string(),
            parameters: ParameterSpec::builder()
                .indexed(IndexedGroup::single(IndexedSlot::new("mode", GAMEMODE)))
                .build(&readers)?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(gamemode)),
    )?;

    tree.register_command(
        CommandDescriptor {
            name: "say".to_string(),
            description: "Broadcasts a message".to_string(),
            owner: "core".to_string(),
            parameters: ParameterSpec::builder()
                .indexed(IndexedGroup::greedy(IndexedSlot::new(
                    "message",
                    ValueType::STRING,
                )))
                .build(&readers)?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(say)),
    )?;

    let tp = tree.register_command(
        CommandDescriptor {
            name: "teleport".to_string(),
            description: "Teleports to coordinates".to_string(),
            owner: "core".to_string(),
            restricted_to: vec!["player".to_string(), "console".to_string()],
            parameters: ParameterSpec::builder()
                .indexed(IndexedGroup::fixed(vec![
                    IndexedSlot::new("x", ValueType::DOUBLE),
                    IndexedSlot::new("y", ValueType::DOUBLE),
                    IndexedSlot::new("z", ValueType::DOUBLE),
                ]))
                .named(NamedParameter::new("world", ValueType::STRING).alias("w"))
                .build(&readers)?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(teleport)),
    )?;
    tree.add_alias(tp, "tp", &[])?;

    let perm = tree.register_command(
        CommandDescriptor::new("perm", "Manages permissions"),
        None,
    )?;
    let grant = || -> Result<ParameterSpec, RegistrationError> {
        ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("player", ValueType::STRING)))
            .indexed(IndexedGroup::single(IndexedSlot::new("node", ValueType::STRING)))
            .build(&readers)
    };
    tree.register(
        perm,
        CommandDescriptor {
            name: "add".to_string(),
            description: "Grants a permission".to_string(),
            owner: "perm".to_string(),
            permission: Some(Permission::new("cmdtree.command.perm.add")),
            parameters: grant()?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(perm_add)),
    )?;
    let remove = tree.register(
        perm,
        CommandDescriptor {
            name: "remove".to_string(),
            description: "Revokes a permission".to_string(),
            owner: "perm".to_string(),
            permission: Some(Permission::new("cmdtree.command.perm.remove")),
            parameters: grant()?,
            ..CommandDescriptor::default()
        },
        Some(Arc::new(perm_remove)),
    )?;
    tree.add_alias(remove, "rm", &[])?;

    tree.register_command(
        CommandDescriptor {
            name: "wipe".to_string(),
            description: "Deletes all data after confirmation".to_string(),
            owner: "core".to_string(),
            permission: Some(Permission::new("cmdtree.command.wipe")),
            restricted_to: vec!["console".to_string()],
            ..CommandDescriptor::default()
        },
        Some(Arc::new(wipe)),
    )?;

    Ok(())
}
