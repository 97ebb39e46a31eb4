//! Tab autocomplete for verbs and paths.
//!
//! The word under completion is the last whitespace-separated word:
//! - First word: completed against the verb set (e.g., "cl" → "clear ")
//! - Later words: completed against the listing of the word's directory,
//!   directories only for `cd`
//!
//! Dotfiles are offered only once the partial name starts with `.`.

use crate::core::commands::Builtin;
use crate::core::session::Session;

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single match - the whole input line, completed.
    Single(String),
    /// Multiple matches - (input extended to the common prefix, all matches).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

// ============================================================================
// Public API
// ============================================================================

/// Perform autocomplete on Tab press.
pub fn autocomplete(input: &str, session: &Session) -> AutocompleteResult {
    if input.trim().is_empty() {
        return AutocompleteResult::None;
    }

    let (head, word) = match input.rfind([' ', '\t']) {
        Some(idx) => input.split_at(idx + 1),
        None => ("", input),
    };

    if head.trim().is_empty() {
        return complete_verb(head, word);
    }

    let dirs_only = head.split_whitespace().next() == Some("cd");
    complete_path(head, word, session, dirs_only)
}

// ============================================================================
// Verb Completion
// ============================================================================

fn complete_verb(head: &str, partial: &str) -> AutocompleteResult {
    let matches: Vec<String> = Builtin::names()
        .filter(|name| name.starts_with(partial))
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{}{} ", head, matches[0])),
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(format!("{}{}", head, common), matches)
        }
    }
}

// ============================================================================
// Path Completion
// ============================================================================

fn complete_path(head: &str, partial: &str, session: &Session, dirs_only: bool) -> AutocompleteResult {
    let (dir_part, name_part) = match partial.rfind('/') {
        Some(idx) => partial.split_at(idx + 1),
        None => ("", partial),
    };

    let listing = if dir_part.is_empty() {
        session.list_files(None)
    } else if session.is_directory(dir_part) {
        session.list_files(Some(dir_part))
    } else {
        return AutocompleteResult::None;
    };
    let Ok(entries) = listing else {
        return AutocompleteResult::None;
    };

    let show_hidden = name_part.starts_with('.');
    let matches: Vec<String> = entries
        .into_iter()
        .filter(|name| name.starts_with(name_part))
        .filter(|name| show_hidden || !name.starts_with('.'))
        .filter(|name| !dirs_only || name.ends_with('/'))
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => {
            let name = &matches[0];
            // Directories keep the cursor inside the path
            let suffix = if name.ends_with('/') { "" } else { " " };
            AutocompleteResult::Single(format!("{}{}{}{}", head, dir_part, name, suffix))
        }
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(format!("{}{}{}", head, dir_part, common), matches)
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Find the common prefix of multiple strings.
fn find_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for s in rest {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((i, a), b)| *i < prefix_len && a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0);
    }

    first[..prefix_len].to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut s = Session::with_home("guest");
        s.mkdir("documents", false).unwrap();
        s.mkdir("downloads", false).unwrap();
        s.touch("notes.txt").unwrap();
        s.touch(".profile").unwrap();
        s.touch("documents/cv.pdf").unwrap();
        s
    }

    #[test]
    fn test_verb_completion_single() {
        assert_eq!(
            autocomplete("cle", &session()),
            AutocompleteResult::Single("clear ".to_string())
        );
        assert_eq!(
            autocomplete("xdg", &session()),
            AutocompleteResult::Single("xdg-open ".to_string())
        );
    }

    #[test]
    fn test_verb_completion_multiple() {
        match autocomplete("c", &session()) {
            AutocompleteResult::Multiple(common, matches) => {
                assert_eq!(common, "c");
                assert_eq!(matches, vec!["cat", "cd", "clear"]);
            }
            other => panic!("Expected multiple matches, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match() {
        assert_eq!(autocomplete("xyz", &session()), AutocompleteResult::None);
        assert_eq!(autocomplete("   ", &session()), AutocompleteResult::None);
        assert_eq!(autocomplete("cat zz", &session()), AutocompleteResult::None);
    }

    #[test]
    fn test_path_completion() {
        let s = session();
        assert_eq!(
            autocomplete("cat no", &s),
            AutocompleteResult::Single("cat notes.txt ".to_string())
        );
        assert_eq!(
            autocomplete("ls documents/c", &s),
            AutocompleteResult::Single("ls documents/cv.pdf ".to_string())
        );
        assert_eq!(
            autocomplete("cat d", &s),
            AutocompleteResult::Multiple(
                "cat do".to_string(),
                vec!["documents/".to_string(), "downloads/".to_string()]
            )
        );
    }

    #[test]
    fn test_cd_completes_directories_only() {
        let s = session();
        assert_eq!(
            autocomplete("cd docu", &s),
            AutocompleteResult::Single("cd documents/".to_string())
        );
        assert_eq!(autocomplete("cd no", &s), AutocompleteResult::None);
    }

    #[test]
    fn test_hidden_files_need_leading_dot() {
        let s = session();
        match autocomplete("cat ", &s) {
            AutocompleteResult::Multiple(_, matches) => {
                assert!(!matches.contains(&".profile".to_string()));
            }
            other => panic!("Expected multiple matches, got {other:?}"),
        }
        assert_eq!(
            autocomplete("cat .p", &s),
            AutocompleteResult::Single("cat .profile ".to_string())
        );
    }

    #[test]
    fn test_path_through_file_has_no_completions() {
        assert_eq!(
            autocomplete("cat notes.txt/x", &session()),
            AutocompleteResult::None
        );
    }

    #[test]
    fn test_common_prefix() {
        let strings = vec![
            "hello".to_string(),
            "help".to_string(),
            "helicopter".to_string(),
        ];
        assert_eq!(find_common_prefix(&strings), "hel");
        assert_eq!(
            find_common_prefix(&["héllo".to_string(), "héla".to_string()]),
            "hél"
        );
        assert_eq!(find_common_prefix(&["a".to_string(), "b".to_string()]), "");
    }
}
