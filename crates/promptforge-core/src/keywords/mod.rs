//! Built-in section keywords.
//!
//! The keyword table lives in `keywords.toml`, embedded in the binary at
//! compile time. Its order is the order suggestions are offered in.

use std::sync::LazyLock;

use serde::Deserialize;

use crate::block::ColorFamily;

/// A known section keyword (e.g. `role` -> `ROLE`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Keyword {
    /// Lower-case command name typed after the slash.
    pub name: String,
    /// Canonical display tag for blocks created from this keyword.
    pub display: String,
    pub family: ColorFamily,
}

/// Container for deserializing the embedded TOML file.
#[derive(Debug, Deserialize)]
struct KeywordTable {
    keywords: Vec<Keyword>,
}

/// The embedded keyword table.
static KEYWORDS_TOML: &str = include_str!("keywords.toml");

static KEYWORDS: LazyLock<Vec<Keyword>> = LazyLock::new(|| {
    let table: KeywordTable =
        toml::from_str(KEYWORDS_TOML).expect("embedded keywords.toml is invalid");
    table.keywords
});

/// All keywords, in table order.
///
/// # Panics
///
/// Panics on first use if the embedded TOML is malformed. If the binary was
/// built from a valid table this cannot happen.
pub fn all() -> &'static [Keyword] {
    &KEYWORDS
}

/// Exact, case-insensitive lookup by keyword name.
pub fn lookup(name: &str) -> Option<&'static Keyword> {
    let name = name.trim().to_lowercase();
    all().iter().find(|k| k.name == name)
}

/// Keywords whose name starts with `prefix` (case-insensitive), in table order.
pub fn matching_prefix(prefix: &str) -> Vec<&'static Keyword> {
    let prefix = prefix.to_lowercase();
    all().iter().filter(|k| k.name.starts_with(&prefix)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_in_order() {
        let names: Vec<&str> = all().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(
            names,
            ["role", "context", "task", "constraints", "output", "format", "examples"]
        );
    }

    #[test]
    fn display_tags_are_uppercase_names() {
        for k in all() {
            assert_eq!(k.display, k.name.to_uppercase());
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let k = lookup("ROLE").expect("role should exist");
        assert_eq!(k.display, "ROLE");
        assert_eq!(k.family, ColorFamily::Cyan);
        assert!(lookup("persona").is_none());
    }

    #[test]
    fn prefix_match_keeps_table_order() {
        let names: Vec<&str> = matching_prefix("co")
            .iter()
            .map(|k| k.name.as_str())
            .collect();
        assert_eq!(names, ["context", "constraints"]);
    }

    #[test]
    fn empty_prefix_matches_everything() {
        assert_eq!(matching_prefix("").len(), all().len());
    }
}
