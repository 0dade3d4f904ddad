//! Declarative command parameters and the matcher assigning tokens to them.
//!
//! A command declares indexed groups (positional slots), named parameters
//! (`name value`) and flags (`-f` / `-force`). [`ArgumentMatcher`] walks the
//! tokens once, left to right, and converts every match through the reader
//! registry.

mod matcher;
mod parsed;
mod spec;

#[cfg(test)]
mod tests;

pub use matcher::{ArgumentMatcher, MatchOutcome};
pub use parsed::{ArgumentOrigin, ParsedArgument};
pub use spec::{
    ArgBounds, Flag, IndexedGroup, IndexedSlot, NamedParameter, ParameterSpec,
    ParameterSpecBuilder,
};
