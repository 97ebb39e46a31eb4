//! Command dispatch.
//!
//! This module provides:
//! - [`Builtin`] enum naming the fixed verb set
//! - [`CommandResult`] for command execution results
//! - [`execute_command`] for running a parsed command against a session
//!
//! # Architecture
//!
//! The parser produces a [`Command`] with raw option and argument lists.
//! [`Builtin::from_name`] picks the verb, [`Builtin::flags`] validates the
//! options into [`Flags`], and `execute_command` runs the verb and then
//! applies the command's redirects.

mod execute;
mod result;

pub use execute::{ShellContext, execute_command};
pub use result::{CommandResult, Output, ShellAction};

use crate::core::error::DispatchError;
use crate::core::parser::Command;

// =============================================================================
// Builtin Enum
// =============================================================================

/// Verbs understood by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Pwd,
    Cd,
    Mkdir,
    Ls,
    Touch,
    Cat,
    Echo,
    Rm,
    XdgOpen,
    Wget,
    Clear,
}

impl Builtin {
    const ALL: [Self; 11] = [
        Self::Cat,
        Self::Cd,
        Self::Clear,
        Self::Echo,
        Self::Ls,
        Self::Mkdir,
        Self::Pwd,
        Self::Rm,
        Self::Touch,
        Self::Wget,
        Self::XdgOpen,
    ];

    /// Get all verb names, sorted, for autocomplete.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::name)
    }

    /// Look a verb up by its exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pwd => "pwd",
            Self::Cd => "cd",
            Self::Mkdir => "mkdir",
            Self::Ls => "ls",
            Self::Touch => "touch",
            Self::Cat => "cat",
            Self::Echo => "echo",
            Self::Rm => "rm",
            Self::XdgOpen => "xdg-open",
            Self::Wget => "wget",
            Self::Clear => "clear",
        }
    }

    /// Accepted flags as `(short, long)` pairs.
    fn accepted_flags(self) -> &'static [(char, &'static str)] {
        match self {
            Self::Ls => &[('a', "all")],
            Self::Mkdir => &[('p', "parents")],
            Self::Rm => &[('r', "recursive"), ('R', "recursive")],
            _ => &[],
        }
    }

    /// Validate a command's options against this verb.
    ///
    /// Short option tokens are clusters: `-ra` sets `r` and `a`.
    pub fn flags(self, command: &Command) -> Result<Flags, DispatchError> {
        let accepted = self.accepted_flags();
        let mut set = Vec::new();

        for cluster in &command.short_options {
            for c in cluster.chars() {
                let (_, long) = accepted
                    .iter()
                    .find(|(short, _)| *short == c)
                    .ok_or(DispatchError::InvalidOption(c))?;
                set.push(*long);
            }
        }

        for option in &command.long_options {
            let (_, long) = accepted
                .iter()
                .find(|(_, long)| *long == option.as_str())
                .ok_or_else(|| DispatchError::UnrecognizedOption(option.clone()))?;
            set.push(*long);
        }

        Ok(Flags(set))
    }

    /// Check if the verb refuses to run without arguments.
    fn needs_operand(self) -> bool {
        matches!(
            self,
            Self::Mkdir | Self::Touch | Self::Cat | Self::Rm | Self::XdgOpen | Self::Wget
        )
    }
}

/// Validated flags of one invocation, by long name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags(Vec<&'static str>);

impl Flags {
    pub fn has(&self, long: &str) -> bool {
        self.0.contains(&long)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_input;

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(Builtin::from_name("ls"), Some(Builtin::Ls));
        assert_eq!(Builtin::from_name("xdg-open"), Some(Builtin::XdgOpen));
        assert_eq!(Builtin::from_name("LS"), None);
        assert_eq!(Builtin::from_name("help"), None);
    }

    #[test]
    fn test_names_sorted_and_complete() {
        let names: Vec<_> = Builtin::names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 11);
        for name in &names {
            assert_eq!(Builtin::from_name(name).map(Builtin::name), Some(*name));
        }
    }

    #[test]
    fn test_flag_clusters() {
        let command = parse_input("rm -rR --recursive x").unwrap();
        let flags = Builtin::Rm.flags(&command).unwrap();
        assert!(flags.has("recursive"));
        assert!(!flags.has("all"));
    }

    #[test]
    fn test_flag_errors() {
        let command = parse_input("ls -al").unwrap();
        assert_eq!(
            Builtin::Ls.flags(&command),
            Err(DispatchError::InvalidOption('l'))
        );

        let command = parse_input("mkdir --force x").unwrap();
        assert_eq!(
            Builtin::Mkdir.flags(&command),
            Err(DispatchError::UnrecognizedOption("force".to_string()))
        );

        let command = parse_input("pwd -a").unwrap();
        assert_eq!(
            Builtin::Pwd.flags(&command),
            Err(DispatchError::InvalidOption('a'))
        );
    }
}
