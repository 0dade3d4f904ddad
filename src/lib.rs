//! cmdtree - a command-dispatch and argument-parsing engine.
//!
//! Text input is resolved against a tree of registered commands, the
//! remaining tokens are matched against the command's declared parameters
//! (positional groups, named parameters and flags), converted to typed
//! values, checked against permissions and bounds, and handed to the
//! command's handler. The same parameter declarations drive usage strings
//! and tab completion.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cmdtree::{
//!     command::{CommandDispatcher, DispatchOutcome},
//!     console::{ConsoleSender, register_demo_commands},
//!     reader::ReaderRegistry,
//! };
//!
//! let mut dispatcher = CommandDispatcher::new(Arc::new(ReaderRegistry::with_defaults()));
//! register_demo_commands(&mut dispatcher)?;
//!
//! let console = ConsoleSender::default();
//! if let DispatchOutcome::Completed(output) = dispatcher.dispatch(&console, "give stone 5 -f") {
//!     println!("{}", output.text());
//! }
//! # Ok::<(), cmdtree::command::RegistrationError>(())
//! ```

/// Command tree, dispatch, validation, usage and completion.
pub mod command;

/// Configuration schema definitions and loading.
pub mod config;

/// Pending confirmations with timeouts.
pub mod confirm;

/// Console sender, demo commands and terminal formatting.
pub mod console;

/// Core error types and result aliases.
pub mod core;

/// Parameter declarations and the argument matcher.
pub mod parameter;

/// Typed value readers and their registry.
pub mod reader;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{CmdTreeError, Result};
