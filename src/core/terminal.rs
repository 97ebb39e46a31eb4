//! Terminal controller.
//!
//! Turns key events from the rendering layer into [`UiAction`]s:
//! - `Enter` runs the line through lexer, parser and dispatcher
//! - `Tab` autocompletes the last word
//! - `ArrowUp` / `ArrowDown` walk the command history
//! - `Ctrl+C` abandons the line, `Ctrl+L` clears the scrollback
//!
//! Key events must be delivered one at a time; each call holds the session
//! exclusively until its actions are returned.

use crate::config::{HOSTNAME, INITIAL_FS_MANIFEST, INTERRUPT_MARKER, MAX_COMMAND_HISTORY};
use crate::core::autocomplete::{AutocompleteResult, autocomplete};
use crate::core::commands::{ShellAction, ShellContext, execute_command};
use crate::core::error::BootError;
use crate::core::parser::parse_input;
use crate::core::session::Session;
use crate::models::{InitialTree, KeyEvent, UiAction};
use crate::utils::{CommandHistory, Fetcher};

/// Interactive shell state for one browser tab.
pub struct Terminal<F> {
    session: Session,
    fetcher: F,
    history: CommandHistory,
}

impl<F: Fetcher> Terminal<F> {
    pub fn new(session: Session, fetcher: F) -> Self {
        Self {
            session,
            fetcher,
            history: CommandHistory::new(MAX_COMMAND_HISTORY),
        }
    }

    /// Build the session from the bundled manifest and wrap it.
    pub async fn boot(username: &str, fetcher: F) -> Result<Self, BootError> {
        let tree = InitialTree::from_json(INITIAL_FS_MANIFEST)?;
        let session = Session::bootstrap(&tree, username, &fetcher).await?;
        Ok(Self::new(session, fetcher))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Prompt shown before the input, e.g. `guest@mtkonge:~$ `.
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.session.username(),
            HOSTNAME,
            self.session.formatted_cwd()
        )
    }

    /// Handle one key press. Keys without a binding yield no actions.
    pub async fn handle_key(&mut self, event: &KeyEvent) -> Vec<UiAction> {
        if event.ctrl {
            return match event.key.as_str() {
                "c" => {
                    self.history.reset_cursor();
                    let line = format!("{}{}", event.input, INTERRUPT_MARKER);
                    vec![
                        UiAction::history_item(self.prompt(), line, ""),
                        UiAction::ClearInput,
                    ]
                }
                "l" => vec![UiAction::ClearHistory],
                _ => vec![],
            };
        }

        match event.key.as_str() {
            "Enter" => self.run_line(&event.input).await,
            "Tab" => self.complete(&event.input),
            "ArrowUp" => match self.history.older() {
                Some(line) => vec![UiAction::set_input(line)],
                None => vec![],
            },
            "ArrowDown" => {
                let line = self.history.newer().unwrap_or_default();
                vec![UiAction::set_input(line)]
            }
            _ => vec![],
        }
    }

    /// Run a submitted line and report it.
    pub async fn run_line(&mut self, line: &str) -> Vec<UiAction> {
        let prompt = self.prompt();
        self.history.push(line);

        let command = match parse_input(line) {
            Ok(command) => command,
            Err(e) => {
                log::debug!("rejected '{}': {}", line, e);
                return vec![
                    UiAction::history_item(prompt, line, e.to_string()),
                    UiAction::ClearInput,
                ];
            }
        };

        let mut ctx = ShellContext {
            session: &mut self.session,
            fetcher: &self.fetcher,
        };
        let result = execute_command(&command, &mut ctx).await;

        let mut actions = Vec::new();
        let clears = result.actions.contains(&ShellAction::Clear);
        if !clears {
            actions.push(UiAction::history_item(prompt, line, result.display()));
        }
        for action in result.actions {
            actions.push(match action {
                ShellAction::Clear => UiAction::ClearHistory,
                ShellAction::Open(request) => UiAction::Open { request },
            });
        }
        actions.push(UiAction::ClearInput);
        actions
    }

    fn complete(&self, input: &str) -> Vec<UiAction> {
        match autocomplete(input, &self.session) {
            AutocompleteResult::Single(line) => vec![UiAction::set_input(line)],
            AutocompleteResult::Multiple(prefix, names) => vec![
                UiAction::history_item(self.prompt(), input, names.join("  ")),
                UiAction::set_input(prefix),
            ],
            AutocompleteResult::None => vec![],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
