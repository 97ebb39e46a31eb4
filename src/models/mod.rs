//! Data models and types for the shell.
//!
//! Contains domain types for:
//! - [`FileContent`], [`OpenRequest`] - Virtual filesystem content and open instructions
//! - [`InitialTree`], [`InitialFile`] - Bootstrap manifest
//! - [`KeyEvent`], [`UiAction`] - Messages exchanged with the rendering layer

mod filesystem;
mod terminal;

pub use filesystem::{FileContent, InitialFile, InitialTree, OpenRequest};
pub use terminal::{KeyEvent, UiAction};
