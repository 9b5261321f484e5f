use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Colour family a block is drawn with.
///
/// Keyword blocks carry their keyword's family; nested blocks inherit the
/// family of the most recent top-level block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFamily {
    Cyan,
    Pink,
    Lime,
    Red,
    Purple,
    Teal,
    Amber,
    #[default]
    White,
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cyan => "cyan",
            Self::Pink => "pink",
            Self::Lime => "lime",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Teal => "teal",
            Self::Amber => "amber",
            Self::White => "white",
        };
        f.write_str(s)
    }
}

impl FromStr for ColorFamily {
    type Err = ColorFamilyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cyan" => Ok(Self::Cyan),
            "pink" => Ok(Self::Pink),
            "lime" => Ok(Self::Lime),
            "red" => Ok(Self::Red),
            "purple" => Ok(Self::Purple),
            "teal" => Ok(Self::Teal),
            "amber" => Ok(Self::Amber),
            "white" => Ok(Self::White),
            other => Err(ColorFamilyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ColorFamily`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid colour family: {0:?}")]
pub struct ColorFamilyParseError(pub String);

// ---------------------------------------------------------------------------
// Indent level
// ---------------------------------------------------------------------------

/// Nesting depth of a block, always at least 1.
///
/// Assigned from the number of leading slashes in the creating command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IndentLevel(u8);

/// Error returned for an indent level of zero.
#[derive(Debug, Clone, thiserror::Error)]
#[error("indent level must be at least 1")]
pub struct LevelError;

impl IndentLevel {
    pub const TOP: Self = Self(1);

    pub fn new(level: u8) -> Result<Self, LevelError> {
        if level == 0 {
            return Err(LevelError);
        }
        Ok(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_top(self) -> bool {
        self.0 == 1
    }
}

impl TryFrom<u8> for IndentLevel {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IndentLevel> for u8 {
    fn from(level: IndentLevel) -> Self {
        level.0
    }
}

impl fmt::Display for IndentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One labeled section of the prompt being composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    /// Display tag, e.g. `ROLE` or `TONE OF VOICE`.
    pub tag: String,
    pub level: IndentLevel,
    pub content: String,
    pub family: ColorFamily,
}

impl Block {
    pub fn new(tag: impl Into<String>, level: IndentLevel, family: ColorFamily) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag: tag.into(),
            level,
            content: String::new(),
            family,
        }
    }

    /// Builder-style helper that sets the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Markup element name: lower-cased tag with spaces replaced by `_`.
    pub fn element_name(&self) -> String {
        self.tag.to_lowercase().replace(' ', "_")
    }

    /// Placeholder shown while the content is empty.
    pub fn hint(&self) -> String {
        format!("// Enter {} data...", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_family_display_roundtrip() {
        for family in [
            ColorFamily::Cyan,
            ColorFamily::Pink,
            ColorFamily::Lime,
            ColorFamily::Red,
            ColorFamily::Purple,
            ColorFamily::Teal,
            ColorFamily::Amber,
            ColorFamily::White,
        ] {
            let parsed: ColorFamily = family.to_string().parse().unwrap();
            assert_eq!(parsed, family);
        }
        assert!("magenta".parse::<ColorFamily>().is_err());
    }

    #[test]
    fn indent_level_rejects_zero() {
        assert!(IndentLevel::new(0).is_err());
        assert_eq!(IndentLevel::new(3).unwrap().get(), 3);
        assert!(IndentLevel::TOP.is_top());
    }

    #[test]
    fn element_name_lowercases_and_underscores() {
        let block = Block::new("TONE OF VOICE", IndentLevel::TOP, ColorFamily::White);
        assert_eq!(block.element_name(), "tone_of_voice");
    }

    #[test]
    fn hint_mentions_tag() {
        let block = Block::new("ROLE", IndentLevel::TOP, ColorFamily::Cyan);
        assert_eq!(block.hint(), "// Enter ROLE data...");
    }

    #[test]
    fn new_blocks_get_distinct_ids() {
        let a = Block::new("A", IndentLevel::TOP, ColorFamily::White);
        let b = Block::new("A", IndentLevel::TOP, ColorFamily::White);
        assert_ne!(a.id, b.id);
    }
}
