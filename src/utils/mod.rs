//! Utility modules for fetching and data structures.
//!
//! Provides:
//! - [`Fetcher`], [`MemoryFetcher`] - Byte fetching seam, with an in-memory implementation
//! - `WebFetcher` - Browser Fetch API with timeout (wasm32 only)
//! - [`CommandHistory`] - Bounded command history with navigation

mod fetch;
mod history;

pub use fetch::{Fetcher, MemoryFetcher};
#[cfg(target_arch = "wasm32")]
pub use fetch::WebFetcher;
pub use history::CommandHistory;
