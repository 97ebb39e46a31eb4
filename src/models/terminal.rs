//! Terminal-related data types exchanged with the rendering layer.

use serde::{Deserialize, Serialize};

use super::OpenRequest;

/// A key press forwarded by the UI, along with the input field's value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub input: String,
    #[serde(default)]
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            input: input.into(),
            ctrl: false,
        }
    }

    /// Same key with Ctrl held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// Instruction for the UI, applied in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum UiAction {
    /// Append the submitted line and its output to the scrollback
    AddHistoryItem {
        prompt: String,
        input: String,
        output: String,
    },
    /// Replace the input field's value
    SetInputValue { value: String },
    ClearHistory,
    ClearInput,
    /// Open a file outside the terminal
    Open { request: OpenRequest },
}

impl UiAction {
    pub fn history_item(
        prompt: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::AddHistoryItem {
            prompt: prompt.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn set_input(value: impl Into<String>) -> Self {
        Self::SetInputValue {
            value: value.into(),
        }
    }
}
