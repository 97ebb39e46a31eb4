//! Command line parser.
//!
//! Folds the lexer's token stream into a [`Command`]:
//! - The first argument becomes the binary name
//! - Options are collected per kind, duplicates kept
//! - Each `>` / `>>` consumes the following argument as its target

mod lexer;

pub use lexer::{Lexer, Token, TokenKind};

use serde::{Deserialize, Serialize};

use crate::core::error::ParseError;

// =============================================================================
// Command Representation
// =============================================================================

/// How a redirect target receives command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// `>`: replace the file's content
    Write,
    /// `>>`: append to the file's content
    Append,
}

/// Output routing instruction attached to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub target: String,
    pub mode: RedirectMode,
}

/// A parsed command line.
///
/// An empty `bin` means the line held no tokens; callers treat it as a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub bin: String,
    pub short_options: Vec<String>,
    pub long_options: Vec<String>,
    pub arguments: Vec<String>,
    pub redirects: Vec<Redirect>,
}

impl Command {
    /// Check if the line was blank
    pub fn is_empty(&self) -> bool {
        self.bin.is_empty()
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parser over a lexer's token stream.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Consume the whole token stream and build a command.
    pub fn parse(mut self) -> Result<Command, ParseError> {
        let mut cmd = Command::default();

        let Some(first) = self.lexer.next() else {
            return Ok(cmd);
        };
        cmd.bin = Self::expect_argument(first?)?;

        while let Some(token) = self.lexer.next() {
            let token = token?;
            match token.kind {
                TokenKind::LongOption(name) => cmd.long_options.push(name),
                TokenKind::ShortOption(name) => cmd.short_options.push(name),
                TokenKind::Argument(value) => cmd.arguments.push(value),
                TokenKind::RedirectWrite => {
                    let target = self.redirect_target()?;
                    cmd.redirects.push(Redirect {
                        target,
                        mode: RedirectMode::Write,
                    });
                }
                TokenKind::RedirectAppend => {
                    let target = self.redirect_target()?;
                    cmd.redirects.push(Redirect {
                        target,
                        mode: RedirectMode::Append,
                    });
                }
            }
        }

        Ok(cmd)
    }

    fn redirect_target(&mut self) -> Result<String, ParseError> {
        match self.lexer.next() {
            Some(token) => Self::expect_argument(token?),
            None => Err(ParseError::MissingRedirectTarget {
                offset: self.lexer.position(),
            }),
        }
    }

    fn expect_argument(token: Token) -> Result<String, ParseError> {
        match token.kind {
            TokenKind::Argument(value) => Ok(value),
            other => Err(ParseError::UnexpectedToken {
                offset: token.offset,
                found: other.describe(),
            }),
        }
    }
}

/// Parse a raw input line into a command.
pub fn parse_input(input: &str) -> Result<Command, ParseError> {
    Parser::new(Lexer::new(input)).parse()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{LexError, LexErrorKind};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        let cmd = parse_input("").unwrap();
        assert!(cmd.is_empty());
        assert_eq!(cmd, Command::default());

        assert!(parse_input("   \t").unwrap().is_empty());
    }

    #[test]
    fn test_full_command() {
        let cmd = parse_input(r#"echo "a b" --flag -x > out.txt"#).unwrap();
        assert_eq!(cmd.bin, "echo");
        assert_eq!(cmd.arguments, strings(&["a b"]));
        assert_eq!(cmd.long_options, strings(&["flag"]));
        assert_eq!(cmd.short_options, strings(&["x"]));
        assert_eq!(
            cmd.redirects,
            vec![Redirect {
                target: "out.txt".to_string(),
                mode: RedirectMode::Write,
            }]
        );
    }

    #[test]
    fn test_duplicate_options_kept() {
        let cmd = parse_input("ls -a -a --all --all").unwrap();
        assert_eq!(cmd.short_options, strings(&["a", "a"]));
        assert_eq!(cmd.long_options, strings(&["all", "all"]));
    }

    #[test]
    fn test_interleaved_arguments() {
        let cmd = parse_input("rm a -r b").unwrap();
        assert_eq!(cmd.arguments, strings(&["a", "b"]));
        assert_eq!(cmd.short_options, strings(&["r"]));
    }

    #[test]
    fn test_multiple_redirects_in_order() {
        let cmd = parse_input("echo hi > a >> b > c").unwrap();
        let targets: Vec<_> = cmd
            .redirects
            .iter()
            .map(|r| (r.target.as_str(), r.mode))
            .collect();
        assert_eq!(
            targets,
            vec![
                ("a", RedirectMode::Write),
                ("b", RedirectMode::Append),
                ("c", RedirectMode::Write),
            ]
        );
        assert_eq!(cmd.arguments, strings(&["hi"]));
    }

    #[test]
    fn test_first_token_must_be_argument() {
        let err = parse_input("-x ls").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                offset: 0,
                found: "short_option",
            }
        );

        let err = parse_input("> f").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { offset: 0, .. }));
    }

    #[test]
    fn test_missing_redirect_target() {
        let err = parse_input("echo hi >").unwrap_err();
        assert_eq!(err, ParseError::MissingRedirectTarget { offset: 9 });
    }

    #[test]
    fn test_redirect_target_must_be_argument() {
        let err = parse_input("echo hi > --all").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                offset: 10,
                found: "long_option",
            }
        );

        let err = parse_input("echo hi > >> f").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: "redirect_append",
                ..
            }
        ));
    }

    #[test]
    fn test_lex_errors_propagate() {
        let err = parse_input("echo \"abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::Lex(LexError {
                kind: LexErrorKind::UnterminatedQuote,
                offset: 9,
            })
        );
    }
}
