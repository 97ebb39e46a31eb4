//! Lexer for tokenizing shell input.
//!
//! Handles:
//! - Bare arguments with backslash escapes
//! - Short (`-x`) and long (`--name`) options
//! - Output redirection (`>`, `>>`)
//! - Quote handling (single and double quotes, `\n`, `\t`, `\0` escapes)

use crate::core::error::{LexError, LexErrorKind};

// =============================================================================
// Token Types
// =============================================================================

/// Token variants produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `--name`
    LongOption(String),
    /// `-x` (may hold a cluster such as `la`)
    ShortOption(String),
    /// A bare or quoted word
    Argument(String),
    /// `>`
    RedirectWrite,
    /// `>>`
    RedirectAppend,
}

impl TokenKind {
    /// Short name used in syntax error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::LongOption(_) => "long_option",
            Self::ShortOption(_) => "short_option",
            Self::Argument(_) => "argument",
            Self::RedirectWrite => "redirect_write",
            Self::RedirectAppend => "redirect_append",
        }
    }
}

/// A token together with the byte span it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub length: usize,
    pub kind: TokenKind,
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters allowed in option names.
fn is_option_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')
}

/// Shell metacharacters this grammar does not support, plus control characters.
fn is_illegal(c: char) -> bool {
    matches!(c, '|' | '<' | ';') || (c.is_control() && !is_separator(c))
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing shell input.
///
/// Scans lazily: each call to [`Iterator::next`] yields one token, a
/// positioned error, or `None` at end of input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokenize the entire input, stopping at the first error.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    fn done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn step(&mut self) -> char {
        let c = self.current_char();
        self.pos += c.len_utf8();
        c
    }

    fn skip_whitespace(&mut self) {
        while !self.done() && is_separator(self.current_char()) {
            self.step();
        }
    }

    fn token(&self, start: usize, kind: TokenKind) -> Token {
        Token {
            offset: start,
            length: self.pos - start,
            kind,
        }
    }

    fn error(kind: LexErrorKind, offset: usize) -> LexError {
        LexError { kind, offset }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let c = self.current_char();

        match c {
            '-' => self.lex_option(start),
            '>' => {
                self.step();
                if !self.done() && self.current_char() == '>' {
                    self.step();
                    Ok(self.token(start, TokenKind::RedirectAppend))
                } else {
                    Ok(self.token(start, TokenKind::RedirectWrite))
                }
            }
            '\'' | '"' => self.lex_quoted(start),
            c if is_illegal(c) => {
                self.step();
                Err(Self::error(LexErrorKind::IllegalCharacter(c), start))
            }
            _ => {
                let value = self.read_word(|c| {
                    !is_separator(c) && c != '>' && !is_quote(c) && !is_illegal(c)
                });
                Ok(self.token(start, TokenKind::Argument(value)))
            }
        }
    }

    fn lex_option(&mut self, start: usize) -> Result<Token, LexError> {
        self.step();
        let long = !self.done() && self.current_char() == '-';
        if long {
            self.step();
        }

        let name = self.read_word(is_option_char);
        if name.is_empty() {
            return Err(Self::error(LexErrorKind::OptionWithoutValue, start));
        }

        let kind = if long {
            TokenKind::LongOption(name)
        } else {
            TokenKind::ShortOption(name)
        };
        Ok(self.token(start, kind))
    }

    /// Read a run of characters accepted by `accept`, resolving `\x` escapes
    /// to the literal `x`.
    fn read_word(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut value = String::new();

        while !self.done() {
            let c = self.current_char();
            if c == '\\' {
                self.step();
                if self.done() {
                    value.push('\\');
                } else {
                    value.push(self.step());
                }
            } else if accept(c) {
                value.push(self.step());
            } else {
                break;
            }
        }

        value
    }

    fn lex_quoted(&mut self, start: usize) -> Result<Token, LexError> {
        let quote = self.step();
        let mut value = String::new();

        loop {
            if self.done() {
                return Err(Self::error(LexErrorKind::UnterminatedQuote, self.pos));
            }

            let c = self.step();
            if c == quote {
                return Ok(self.token(start, TokenKind::Argument(value)));
            }

            if c == '\\' {
                if self.done() {
                    return Err(Self::error(LexErrorKind::UnterminatedQuote, self.pos));
                }
                match self.step() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '0' => value.push('\0'),
                    other => value.push(other),
                }
            } else {
                value.push(c);
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.done() {
            return None;
        }
        Some(self.next_token())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("input should lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn arg(s: &str) -> TokenKind {
        TokenKind::Argument(s.to_string())
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(kinds("ls"), vec![arg("ls")]);
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(kinds("  \tls \r\n /home  "), vec![arg("ls"), arg("/home")]);
        assert!(kinds("   ").is_empty());
    }

    #[test]
    fn test_full_command_line() {
        assert_eq!(
            kinds(r#"echo "a b" --flag -x > out.txt"#),
            vec![
                arg("echo"),
                arg("a b"),
                TokenKind::LongOption("flag".to_string()),
                TokenKind::ShortOption("x".to_string()),
                TokenKind::RedirectWrite,
                arg("out.txt"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("cat 'a b' >> f").tokenize().unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| (t.offset, t.length)).collect();
        assert_eq!(spans, vec![(0, 3), (4, 5), (10, 2), (13, 1)]);
    }

    #[test]
    fn test_redirect_append() {
        assert_eq!(
            kinds("echo hi >>log"),
            vec![arg("echo"), arg("hi"), TokenKind::RedirectAppend, arg("log")]
        );
    }

    #[test]
    fn test_redirect_ends_bare_argument() {
        assert_eq!(
            kinds("echo hi>f"),
            vec![arg("echo"), arg("hi"), TokenKind::RedirectWrite, arg("f")]
        );
    }

    #[test]
    fn test_option_cluster_and_dashes_in_name() {
        assert_eq!(
            kinds("ls -la --dry-run"),
            vec![
                arg("ls"),
                TokenKind::ShortOption("la".to_string()),
                TokenKind::LongOption("dry-run".to_string()),
            ]
        );
    }

    #[test]
    fn test_option_without_value() {
        let err = Lexer::new("rm - x").tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::OptionWithoutValue);
        assert_eq!(err.offset, 3);

        let err = Lexer::new("rm --").tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::OptionWithoutValue);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(
            kinds(r#"echo "a\nb\tc\0d\"e""#),
            vec![arg("echo"), arg("a\nb\tc\0d\"e")]
        );
        assert_eq!(kinds(r"echo 'it\'s'"), vec![arg("echo"), arg("it's")]);
    }

    #[test]
    fn test_quoted_keeps_operators_verbatim() {
        assert_eq!(
            kinds("echo '> -x | ;'"),
            vec![arg("echo"), arg("> -x | ;")]
        );
    }

    #[test]
    fn test_bare_escape() {
        assert_eq!(kinds(r"cat my\ file"), vec![arg("cat"), arg("my file")]);
        assert_eq!(kinds(r"echo \>"), vec![arg("echo"), arg(">")]);
    }

    #[test]
    fn test_unterminated_quote_points_at_end() {
        let input = "echo \"abc";
        let err = Lexer::new(input).tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedQuote);
        assert_eq!(err.offset, input.len());
    }

    #[test]
    fn test_illegal_character_advances_cursor() {
        let mut lexer = Lexer::new("ls | x");
        assert!(matches!(lexer.next(), Some(Ok(_))));

        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::IllegalCharacter('|'));
        assert_eq!(err.offset, 3);
        assert_eq!(lexer.position(), 4);

        assert_eq!(lexer.next().unwrap().unwrap().kind, arg("x"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_urls_and_home_paths_are_arguments() {
        assert_eq!(
            kinds("wget https://example.com/a?b=c&d=e ~/x"),
            vec![
                arg("wget"),
                arg("https://example.com/a?b=c&d=e"),
                arg("~/x"),
            ]
        );
    }

    #[test]
    fn test_unicode_argument() {
        assert_eq!(kinds("touch héllo"), vec![arg("touch"), arg("héllo")]);
    }
}
