use crate::parameter::ArgumentOrigin;

use super::{CommandContext, CommandError, CommandSender, Permission};

/// Fails with [`CommandError::PermissionDenied`] unless `sender` holds
/// `permission`.
pub(crate) fn require(
    sender: &dyn CommandSender,
    permission: Option<&Permission>,
) -> Result<(), CommandError> {
    match permission {
        Some(permission) if !sender.is_authorized(permission) => {
            Err(CommandError::PermissionDenied(permission.clone()))
        }
        _ => Ok(()),
    }
}

/// Checks a context before its handler may run.
///
/// The checks run in a fixed order and the first failure wins:
///
/// 1. the node's permission
/// 2. the indexed argument count against the specification's bounds
/// 3. the sender's capability tags against the node's restriction set
/// 4. permissions of the named parameters given, then required ones missing
/// 5. permissions of the flags given
/// 6. permissions of the indexed groups given
///
/// # Errors
///
/// Returns the [`CommandError`] of the first failing check.
pub fn validate(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let node = ctx.node();
    let sender = ctx.sender();
    let spec = node.parameters();

    require(sender, node.permission())?;

    let bounds = spec.bounds();
    let count = ctx.indexed_count();
    if count < bounds.min {
        return Err(CommandError::TooFewArguments);
    }
    if bounds.max.is_some_and(|max| count > max) {
        return Err(CommandError::TooManyArguments);
    }

    let allowed = node.restricted_to();
    if !allowed.is_empty() {
        let tags = sender.capability_tags();
        let matches = tags
            .iter()
            .any(|tag| allowed.iter().any(|allowed| allowed.eq_ignore_ascii_case(tag)));
        if !matches {
            return Err(CommandError::RestrictedSender {
                sender: sender.name().to_string(),
                allowed: allowed.to_vec(),
            });
        }
    }

    for param in spec.named() {
        if ctx.has_named(param.name()) {
            require(sender, param.permission())?;
        } else if param.is_required() {
            return Err(CommandError::MissingParameter(param.name().to_string()));
        }
    }

    for flag in spec.flags() {
        if ctx.flags().contains(flag.long_name()) {
            require(sender, flag.permission())?;
        }
    }

    for argument in ctx.arguments() {
        if let ArgumentOrigin::Indexed { group, .. } = argument.origin() {
            require(sender, spec.indexed().get(group).and_then(|g| g.permission()))?;
        }
    }

    Ok(())
}
