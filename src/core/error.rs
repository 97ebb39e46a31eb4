//! Custom error types for the shell.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each stage of a command line:
//!
//! - [`LexError`] - Tokenization failures with the offending byte offset
//! - [`ParseError`] - Token stream does not form a valid command
//! - [`FsError`] - POSIX-like virtual filesystem failures
//! - [`DispatchError`] - Command-level failures (unknown verb, bad operands)
//! - [`FetchError`] - Network/fetch-related errors for `wget` and bootstrap
//! - [`BootError`] - Failures while building the initial filesystem

use thiserror::Error;

/// What went wrong while scanning input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character the shell grammar does not accept (`|`, `<`, `;`, control characters).
    #[error("illegal character '{}'", .0.escape_default())]
    IllegalCharacter(char),
    /// A `'` or `"` without its closing partner.
    #[error("unterminated quote")]
    UnterminatedQuote,
    /// `-` or `--` not followed by an option name.
    #[error("option without value")]
    OptionWithoutValue,
}

/// Tokenization error, positioned at a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

/// Structured error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Lex(#[from] LexError),
    /// A token of the wrong kind where an argument was required.
    #[error("syntax error: expected argument at {offset}, got {found}")]
    UnexpectedToken { offset: usize, found: &'static str },
    /// `>` or `>>` at the end of the line.
    #[error("syntax error: expected redirect target at {offset}")]
    MissingRedirectTarget { offset: usize },
}

/// Virtual filesystem errors. Each variant carries the path as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{0}: No such file or directory")]
    NoSuchFileOrDirectory(String),
    #[error("{0}: Not a directory")]
    NotADirectory(String),
    #[error("{0}: Is a directory")]
    IsADirectory(String),
    #[error("cannot create directory '{0}': File exists")]
    FileExists(String),
    /// Removal of root, `/home` or the session's own home directory.
    #[error("refusing to remove '{0}': protected path")]
    OperationRefused(String),
}

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("failed to create request")]
    RequestCreationFailed,
    /// Network request failed (timeout, CORS, etc.)
    #[error("network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("failed to read response")]
    ResponseReadFailed,
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// No resource registered under this URL
    #[error("{0}: not found")]
    NotFound(String),
}

/// Command-level failures produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{0}: Command not found")]
    CommandNotFound(String),
    #[error("missing operand")]
    MissingOperand,
    #[error("too many arguments")]
    TooManyArguments,
    #[error("invalid option -- '{0}'")]
    InvalidOption(char),
    #[error("unrecognized option '--{0}'")]
    UnrecognizedOption(String),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors raised while building the initial filesystem.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("invalid filesystem manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("failed to fetch '{path}': {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("manifest conflict: {0}")]
    Conflict(#[from] FsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let e = LexError {
            kind: LexErrorKind::IllegalCharacter('|'),
            offset: 3,
        };
        assert_eq!(e.to_string(), "illegal character '|' at 3");

        let e = LexError {
            kind: LexErrorKind::UnterminatedQuote,
            offset: 9,
        };
        assert_eq!(e.to_string(), "unterminated quote at 9");
    }

    #[test]
    fn test_parse_error_wraps_lex_error() {
        let lex = LexError {
            kind: LexErrorKind::OptionWithoutValue,
            offset: 4,
        };
        let e: ParseError = lex.into();
        assert_eq!(e.to_string(), "syntax error: option without value at 4");
    }

    #[test]
    fn test_fs_error_display() {
        assert_eq!(
            FsError::NoSuchFileOrDirectory("foo".into()).to_string(),
            "foo: No such file or directory"
        );
        assert_eq!(
            FsError::FileExists("a".into()).to_string(),
            "cannot create directory 'a': File exists"
        );
        assert_eq!(
            FsError::OperationRefused("/".into()).to_string(),
            "refusing to remove '/': protected path"
        );
    }

    #[test]
    fn test_dispatch_error_is_transparent_over_fs() {
        let e: DispatchError = FsError::IsADirectory("docs".into()).into();
        assert_eq!(e.to_string(), "docs: Is a directory");
        assert_eq!(
            DispatchError::CommandNotFound("vim".into()).to_string(),
            "vim: Command not found"
        );
    }
}
