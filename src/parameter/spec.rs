use std::{fmt, sync::Arc};

use crate::{
    command::{Completer, Permission, RegistrationError},
    reader::{ReaderRegistry, ValueType},
};

/// One positional slot of an indexed group.
///
/// A slot may accept several types, tried in declaration order, and several
/// labels, shown as alternatives in usage. A label starting with `!` is a
/// literal keyword rendered without brackets.
#[derive(Clone)]
pub struct IndexedSlot {
    labels: Vec<String>,
    types: Vec<ValueType>,
    required: bool,
    completer: Option<Arc<dyn Completer>>,
}

impl IndexedSlot {
    /// A required slot labelled `label` accepting `value_type`.
    pub fn new(label: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            labels: vec![label.into()],
            types: vec![value_type],
            required: true,
            completer: None,
        }
    }

    /// Adds an alternative label.
    #[must_use]
    pub fn or_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Adds a further accepted type, tried after the ones already declared.
    #[must_use]
    pub fn or_type(mut self, value_type: ValueType) -> Self {
        self.types.push(value_type);
        self
    }

    /// Marks the slot optional within its group.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attaches a completer consulted for this slot.
    #[must_use]
    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    /// The display labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The accepted types.
    pub fn types(&self) -> &[ValueType] {
        &self.types
    }

    /// Whether the slot must be filled once its group is present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The attached completer.
    pub fn completer(&self) -> Option<&Arc<dyn Completer>> {
        self.completer.as_ref()
    }

    /// Literal keywords declared with a `!` label.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().filter_map(|label| label.strip_prefix('!'))
    }
}

impl fmt::Debug for IndexedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedSlot")
            .field("labels", &self.labels)
            .field("types", &self.types)
            .field("required", &self.required)
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

/// A run of positional slots matched together.
///
/// A group has one slot (`repeat_count() == 1`), a fixed number of slots
/// (`> 1`), or one slot repeated over all remaining tokens (`-1`).
#[derive(Debug, Clone)]
pub struct IndexedGroup {
    slots: Vec<IndexedSlot>,
    greedy: bool,
    required: bool,
    permission: Option<Permission>,
}

impl IndexedGroup {
    /// A required group with a single slot.
    pub fn single(slot: IndexedSlot) -> Self {
        Self {
            slots: vec![slot],
            greedy: false,
            required: true,
            permission: None,
        }
    }

    /// A required group made of `slots`, matched in order.
    pub fn fixed(slots: Vec<IndexedSlot>) -> Self {
        Self {
            slots,
            greedy: false,
            required: true,
            permission: None,
        }
    }

    /// A required group absorbing every remaining token into `slot`.
    pub fn greedy(slot: IndexedSlot) -> Self {
        Self {
            slots: vec![slot],
            greedy: true,
            required: true,
            permission: None,
        }
    }

    /// An optional greedy string group labelled `0`.
    pub fn greedy_index() -> Self {
        Self::greedy(IndexedSlot::new("0", ValueType::STRING)).optional()
    }

    /// An optional single string slot labelled `label`.
    pub fn empty_index(label: impl Into<String>) -> Self {
        Self::single(IndexedSlot::new(label, ValueType::STRING)).optional()
    }

    /// Marks the whole group optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Requires `permission` to use the group.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// The slots in match order.
    pub fn slots(&self) -> &[IndexedSlot] {
        &self.slots
    }

    /// `1` for a single slot, the slot count for a fixed group, `-1` when
    /// unbounded.
    pub fn repeat_count(&self) -> i32 {
        if self.greedy {
            -1
        } else {
            i32::try_from(self.slots.len()).unwrap_or(i32::MAX)
        }
    }

    /// Whether the group absorbs all remaining tokens.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Whether the group must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The permission guarding the group.
    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Whether slot `index` must be filled once the group is present.
    ///
    /// For one-slot groups the group's own flag decides.
    pub fn slot_required(&self, index: usize) -> bool {
        if self.slots.len() == 1 {
            return true;
        }
        self.slots.get(index).is_some_and(IndexedSlot::is_required)
    }

    /// Tokens needed before the group can start matching.
    pub fn tokens_needed(&self) -> usize {
        (0..self.slots.len())
            .filter(|index| self.slot_required(*index))
            .count()
            .max(1)
    }
}

/// A parameter introduced by its name, e.g. `amount 5`.
#[derive(Clone)]
pub struct NamedParameter {
    name: String,
    aliases: Vec<String>,
    label: String,
    value_type: ValueType,
    required: bool,
    permission: Option<Permission>,
    greed: usize,
    completer: Option<Arc<dyn Completer>>,
}

impl NamedParameter {
    /// An optional parameter `name` reading one token of `value_type`.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            aliases: Vec::new(),
            value_type,
            required: false,
            permission: None,
            greed: 1,
            completer: None,
        }
    }

    /// Adds an alternative name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the value label shown in usage.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Marks the parameter required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Requires `permission` to pass the parameter.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Number of value tokens following the name. `0` reads the name token
    /// itself as the value.
    #[must_use]
    pub fn greed(mut self, greed: usize) -> Self {
        self.greed = greed;
        self
    }

    /// Attaches a completer for the parameter value.
    #[must_use]
    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    /// The canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The usage label of the value.
    pub fn value_label(&self) -> &str {
        &self.label
    }

    /// The value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the parameter must be given.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The permission guarding the parameter.
    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Value tokens consumed after the name.
    pub fn greed_count(&self) -> usize {
        self.greed
    }

    /// The attached completer.
    pub fn completer(&self) -> Option<&Arc<dyn Completer>> {
        self.completer.as_ref()
    }

    /// Whether `token` is one of the parameter's names, ignoring case.
    pub fn matches_name(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(token))
    }
}

impl fmt::Debug for NamedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedParameter")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("value_type", &self.value_type)
            .field("required", &self.required)
            .field("greed", &self.greed)
            .finish_non_exhaustive()
    }
}

/// A presence-only switch written `-short` or `-long`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    short: String,
    long: String,
    permission: Option<Permission>,
}

impl Flag {
    /// Creates the flag `-short` / `-long`.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
            permission: None,
        }
    }

    /// Requires `permission` to pass the flag.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// The short name.
    pub fn short_name(&self) -> &str {
        &self.short
    }

    /// The long name, used as the flag's identity.
    pub fn long_name(&self) -> &str {
        &self.long
    }

    /// The permission guarding the flag.
    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Whether `token` is `-short` or `-long`, ignoring case.
    pub fn matches(&self, token: &str) -> bool {
        token.strip_prefix('-').is_some_and(|name| {
            name.eq_ignore_ascii_case(&self.short) || name.eq_ignore_ascii_case(&self.long)
        })
    }
}

/// Allowed number of indexed arguments. `max` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgBounds {
    /// Fewest indexed arguments accepted.
    pub min: usize,
    /// Most indexed arguments accepted.
    pub max: Option<usize>,
}

impl ArgBounds {
    /// Whether `count` lies within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

/// Every parameter a command accepts.
#[derive(Debug, Clone, Default)]
pub struct ParameterSpec {
    indexed: Vec<IndexedGroup>,
    named: Vec<NamedParameter>,
    flags: Vec<Flag>,
}

impl ParameterSpec {
    /// A specification accepting no arguments at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a specification.
    pub fn builder() -> ParameterSpecBuilder {
        ParameterSpecBuilder::default()
    }

    /// Indexed groups in declaration order.
    pub fn indexed(&self) -> &[IndexedGroup] {
        &self.indexed
    }

    /// Named parameters in declaration order.
    pub fn named(&self) -> &[NamedParameter] {
        &self.named
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// The named parameter called `name` (or aliased so).
    pub fn find_named(&self, name: &str) -> Option<&NamedParameter> {
        self.named.iter().find(|param| param.matches_name(name))
    }

    /// Bounds on the indexed argument count implied by the groups.
    pub fn bounds(&self) -> ArgBounds {
        let min = self
            .indexed
            .iter()
            .filter(|group| group.is_required())
            .map(IndexedGroup::tokens_needed)
            .sum();

        let max = self
            .indexed
            .iter()
            .try_fold(0usize, |acc, group| {
                (!group.is_greedy()).then(|| acc + group.slots().len())
            });

        ArgBounds { min, max }
    }
}

/// Collects parameters and checks their types against a reader registry.
#[derive(Debug, Default)]
pub struct ParameterSpecBuilder {
    spec: ParameterSpec,
}

impl ParameterSpecBuilder {
    /// Appends an indexed group.
    #[must_use]
    pub fn indexed(mut self, group: IndexedGroup) -> Self {
        self.spec.indexed.push(group);
        self
    }

    /// Appends a named parameter.
    #[must_use]
    pub fn named(mut self, param: NamedParameter) -> Self {
        self.spec.named.push(param);
        self
    }

    /// Appends a flag.
    #[must_use]
    pub fn flag(mut self, flag: Flag) -> Self {
        self.spec.flags.push(flag);
        self
    }

    /// Finishes the specification.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnreadableType`] when a declared type has
    /// no reader in `readers`, and [`RegistrationError::MissingLabel`] for a
    /// slot or group without labels.
    pub fn build(self, readers: &ReaderRegistry) -> Result<ParameterSpec, RegistrationError> {
        for group in &self.spec.indexed {
            if group.slots.is_empty() {
                return Err(RegistrationError::MissingLabel);
            }
            for (index, slot) in group.slots.iter().enumerate() {
                let label = slot.labels.first().ok_or(RegistrationError::MissingLabel)?;
                if let Some(unreadable) = slot.types.iter().find(|ty| !readers.has_reader(ty)) {
                    return Err(RegistrationError::UnreadableType {
                        parameter: format!("{label}({index})"),
                        value_type: *unreadable,
                    });
                }
            }
        }

        for param in &self.spec.named {
            if !readers.has_reader(&param.value_type) {
                return Err(RegistrationError::UnreadableType {
                    parameter: param.name.clone(),
                    value_type: param.value_type,
                });
            }
        }

        Ok(self.spec)
    }
}
