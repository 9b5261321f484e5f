//! Slash-command interpreter.
//!
//! A command is a single line typed into the command bar:
//!
//! ```text
//! /role            keyword block at level 1
//! /my section      free-form block at level 1
//! //tone           block at level 2
//! ///detail        block at level 3
//! /forge <text>    generate a ROLE block with the LLM bridge
//! /save <name>     save the focused block as a snippet
//! /use <name>      append a saved snippet to the focused block
//! ```

use crate::block::IndentLevel;
use crate::keywords::{self, Keyword};

/// Commands that are never treated as tag names or completed.
const RESERVED: [&str; 3] = ["forge", "save", "use"];

/// A parsed command-bar instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing to do (empty input, missing argument, no leading slash).
    Noop,
    /// Free-form block; `tag` is the raw text as typed.
    CreateBlock { tag: String, level: IndentLevel },
    /// Top-level block for a known keyword.
    CreateKeyword(&'static Keyword),
    Forge { description: String },
    SaveSnippet { name: String },
    UseSnippet { name: String },
}

/// Parse a command string.
///
/// `suggestions_visible` is true while the autocomplete list is showing at
/// least one entry; a single-slash command then resolves to the first
/// keyword matching the typed prefix.
pub fn parse(input: &str, suggestions_visible: bool) -> Command {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix("///") {
        return nested(rest, 3);
    }
    if let Some(rest) = input.strip_prefix("//") {
        return nested(rest, 2);
    }
    let Some(text) = input.strip_prefix('/') else {
        return Command::Noop;
    };

    if let Some((command, argument)) = split_reserved(text) {
        if argument.is_empty() {
            return Command::Noop;
        }
        let argument = argument.to_string();
        return match command {
            "forge" => Command::Forge {
                description: argument,
            },
            "save" => Command::SaveSnippet { name: argument },
            _ => Command::UseSnippet { name: argument },
        };
    }

    if suggestions_visible {
        if let Some(keyword) = keywords::matching_prefix(text).first() {
            return Command::CreateKeyword(keyword);
        }
    }

    let tag = text.trim();
    if tag.is_empty() {
        return Command::Noop;
    }
    match keywords::lookup(tag) {
        Some(keyword) => Command::CreateKeyword(keyword),
        None => Command::CreateBlock {
            tag: tag.to_string(),
            level: IndentLevel::TOP,
        },
    }
}

/// Autocomplete candidates for the text currently in the command bar.
///
/// Only single-slash input that is not a reserved command is completed.
pub fn suggest(input: &str) -> Vec<&'static Keyword> {
    let input = input.trim();
    if input.starts_with("//") {
        return Vec::new();
    }
    let Some(text) = input.strip_prefix('/') else {
        return Vec::new();
    };
    if split_reserved(text).is_some() {
        return Vec::new();
    }
    keywords::matching_prefix(text)
}

fn nested(rest: &str, level: u8) -> Command {
    let tag = rest.trim();
    if tag.is_empty() {
        return Command::Noop;
    }
    match IndentLevel::new(level) {
        Ok(level) => Command::CreateBlock {
            tag: tag.to_string(),
            level,
        },
        Err(_) => Command::Noop,
    }
}

/// Split `text` into a reserved command and its trimmed argument.
///
/// The command word must be followed by whitespace or end the input, so
/// `/forget` is an ordinary tag.
fn split_reserved(text: &str) -> Option<(&'static str, &str)> {
    let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    RESERVED
        .iter()
        .find(|r| head.eq_ignore_ascii_case(r))
        .map(|r| (*r, rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u8) -> IndentLevel {
        IndentLevel::new(n).unwrap()
    }

    #[test]
    fn empty_input_is_noop() {
        assert_eq!(parse("", false), Command::Noop);
        assert_eq!(parse("   \t ", true), Command::Noop);
    }

    #[test]
    fn text_without_slash_is_noop() {
        assert_eq!(parse("role", false), Command::Noop);
    }

    #[test]
    fn slash_count_sets_level() {
        assert_eq!(
            parse("///detail", false),
            Command::CreateBlock {
                tag: "detail".into(),
                level: level(3)
            }
        );
        assert_eq!(
            parse("// tone of voice ", false),
            Command::CreateBlock {
                tag: "tone of voice".into(),
                level: level(2)
            }
        );
        assert_eq!(
            parse("/audience", false),
            Command::CreateBlock {
                tag: "audience".into(),
                level: level(1)
            }
        );
    }

    #[test]
    fn four_slashes_keep_the_extra_slash_in_the_tag() {
        assert_eq!(
            parse("////x", false),
            Command::CreateBlock {
                tag: "/x".into(),
                level: level(3)
            }
        );
    }

    #[test]
    fn bare_slashes_are_noop() {
        assert_eq!(parse("//", false), Command::Noop);
        assert_eq!(parse("///   ", false), Command::Noop);
        assert_eq!(parse("/", false), Command::Noop);
    }

    #[test]
    fn exact_keyword_without_suggestions() {
        match parse("/Role", false) {
            Command::CreateKeyword(k) => assert_eq!(k.display, "ROLE"),
            other => panic!("expected keyword, got {other:?}"),
        }
    }

    #[test]
    fn visible_suggestions_resolve_prefix() {
        match parse("/co", true) {
            Command::CreateKeyword(k) => assert_eq!(k.name, "context"),
            other => panic!("expected keyword, got {other:?}"),
        }
        match parse("/", true) {
            Command::CreateKeyword(k) => assert_eq!(k.name, "role"),
            other => panic!("expected keyword, got {other:?}"),
        }
    }

    #[test]
    fn hidden_suggestions_keep_prefix_as_tag() {
        assert_eq!(
            parse("/co", false),
            Command::CreateBlock {
                tag: "co".into(),
                level: level(1)
            }
        );
    }

    #[test]
    fn stale_visible_flag_falls_back_to_free_form() {
        assert_eq!(
            parse("/zzz", true),
            Command::CreateBlock {
                tag: "zzz".into(),
                level: level(1)
            }
        );
    }

    #[test]
    fn forge_takes_trimmed_description() {
        assert_eq!(
            parse("/forge   a pirate who teaches math  ", true),
            Command::Forge {
                description: "a pirate who teaches math".into()
            }
        );
        assert_eq!(
            parse("/FORGE x", false),
            Command::Forge {
                description: "x".into()
            }
        );
    }

    #[test]
    fn forge_without_description_is_noop() {
        assert_eq!(parse("/forge   ", true), Command::Noop);
        assert_eq!(parse("/forge", false), Command::Noop);
    }

    #[test]
    fn save_and_use_take_a_name() {
        assert_eq!(
            parse("/save terse reviewer", false),
            Command::SaveSnippet {
                name: "terse reviewer".into()
            }
        );
        assert_eq!(
            parse("/use terse reviewer", false),
            Command::UseSnippet {
                name: "terse reviewer".into()
            }
        );
        assert_eq!(parse("/use", false), Command::Noop);
    }

    #[test]
    fn reserved_word_must_stand_alone() {
        assert_eq!(
            parse("/forget", false),
            Command::CreateBlock {
                tag: "forget".into(),
                level: level(1)
            }
        );
    }

    #[test]
    fn suggest_prefix_in_table_order() {
        let names: Vec<&str> = suggest("/ro").iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["role"]);

        let names: Vec<&str> = suggest("/C").iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["context", "constraints"]);
    }

    #[test]
    fn suggest_nothing_for_nested_reserved_or_unknown() {
        assert!(suggest("//ro").is_empty());
        assert!(suggest("///ro").is_empty());
        assert!(suggest("/forge something").is_empty());
        assert!(suggest("/xyz").is_empty());
        assert!(suggest("role").is_empty());
    }

    #[test]
    fn suggest_everything_for_a_lone_slash() {
        assert_eq!(suggest("/").len(), keywords::all().len());
    }
}
