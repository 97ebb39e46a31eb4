//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the crate.
//! The initial filesystem manifest is loaded at compile time using `include_str!`.

// =============================================================================
// Assets (loaded at compile time)
// =============================================================================

/// Initial filesystem tree, deserialized into [`crate::models::InitialTree`] at boot.
pub const INITIAL_FS_MANIFEST: &str = include_str!("../assets/initial_fs.json");

// =============================================================================
// Session Configuration
// =============================================================================

/// Username used when the embedding application does not provide one.
pub const DEFAULT_USERNAME: &str = "guest";

/// Hostname rendered in the prompt.
pub const HOSTNAME: &str = "mtkonge";

/// Parent directory of every user's home directory.
pub const HOME_ROOT: &str = "/home";

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 100;

/// Marker appended to an abandoned input line on Ctrl+C.
pub const INTERRUPT_MARKER: &str = "^C";

// =============================================================================
// Network Configuration
// =============================================================================

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Backend endpoint that proxies `wget` downloads (the target URL goes in `?url=`).
pub const WGET_PROXY_ENDPOINT: &str = "/bin/wget";

/// File name used by `wget` when the URL has no usable path segment.
pub const WGET_DEFAULT_FILENAME: &str = "index.html";
