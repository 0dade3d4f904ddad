use crate::reader::Value;

/// Which declared parameter produced a [`ParsedArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentOrigin {
    /// Slot `slot` of indexed group `group`.
    Indexed {
        /// Index into the specification's indexed groups.
        group: usize,
        /// Index of the slot within the group.
        slot: usize,
    },
    /// Index into the specification's named parameters.
    Named(usize),
    /// Index into the specification's flags.
    Flag(usize),
}

/// A parameter matched against input, with its converted value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgument {
    origin: ArgumentOrigin,
    value: Value,
    raw: String,
}

impl ParsedArgument {
    /// Creates a parsed argument.
    pub fn new(origin: ArgumentOrigin, value: Value, raw: impl Into<String>) -> Self {
        Self {
            origin,
            value,
            raw: raw.into(),
        }
    }

    /// The declared parameter this came from.
    pub fn origin(&self) -> ArgumentOrigin {
        self.origin
    }

    /// The converted value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The matched tokens joined by single spaces.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this came from an indexed slot.
    pub fn is_indexed(&self) -> bool {
        matches!(self.origin, ArgumentOrigin::Indexed { .. })
    }
}
