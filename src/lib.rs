//! A POSIX-flavored shell over an in-memory filesystem, for the browser.
//!
//! - [`core`] - Lexer, parser, filesystem session, dispatcher and terminal controller
//! - [`models`] - Data exchanged with the rendering layer and the bootstrap manifest
//! - [`utils`] - Fetching and command history
//! - [`config`] - Compile-time constants

pub mod config;
pub mod core;
pub mod models;
pub mod utils;
