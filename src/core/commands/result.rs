//! Command execution result type.

use crate::models::OpenRequest;

/// What a command prints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    /// Nothing to show, not a failure
    None,
    Text(String),
    /// Already prefixed with the verb, e.g. `cat: x: No such file or directory`
    Error(String),
}

/// Side effect the caller performs on behalf of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellAction {
    /// Wipe the scrollback
    Clear,
    /// Hand a file to the host for opening
    Open(OpenRequest),
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandResult {
    pub output: Output,
    pub actions: Vec<ShellAction>,
}

impl CommandResult {
    /// Create an empty result (no output, no actions).
    pub fn empty() -> Self {
        Self {
            output: Output::None,
            actions: vec![],
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            output: Output::Text(text.into()),
            actions: vec![],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: Output::Error(message.into()),
            actions: vec![],
        }
    }

    /// Create a result carrying only actions.
    pub fn actions(actions: Vec<ShellAction>) -> Self {
        Self {
            output: Output::None,
            actions,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.output, Output::Error(_))
    }

    /// Text to display, error or not. Empty when there is nothing to show.
    pub fn display(&self) -> &str {
        match &self.output {
            Output::None => "",
            Output::Text(text) | Output::Error(text) => text,
        }
    }
}
