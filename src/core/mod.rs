//! Core business logic for the shell.
//!
//! This module provides:
//! - [`parse_input`] turning a line into a [`Command`]
//! - [`Session`] over the arena-backed [`VirtualFs`]
//! - [`execute_command`] dispatching commands against a session
//! - [`autocomplete`] for tab completion
//! - [`Terminal`] wiring all of the above to key events

mod autocomplete;
pub mod commands;
pub mod error;
mod filesystem;
pub mod parser;
mod session;
mod terminal;

pub use autocomplete::{AutocompleteResult, autocomplete};
pub use commands::{Builtin, CommandResult, Output, ShellAction, ShellContext, execute_command};
pub use filesystem::{Node, NodeId, NodeKind, VirtualFs, WalkError};
pub use parser::{Command, Redirect, RedirectMode, parse_input};
pub use session::Session;
pub use terminal::Terminal;
