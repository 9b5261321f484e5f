//! Editor state for one composing session.
//!
//! [`Session`] owns the ordered block registry together with the state the
//! command interpreter needs between commands: the colour family of the
//! most recent top-level block, the focused block, and the current
//! autocomplete suggestions.

use tracing::debug;
use uuid::Uuid;

use crate::block::{Block, ColorFamily, IndentLevel};
use crate::command::{self, Command};
use crate::keywords::{self, Keyword};
use crate::markup;

/// What the caller has to do after [`Session::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened.
    Ignored,
    /// A block was created and focused.
    Created(Uuid),
    /// Generate a ROLE block from this description.
    Forge(String),
    /// Save the focused block's content under this snippet name.
    SaveSnippet(String),
    /// Append the named snippet to the focused block.
    UseSnippet(String),
}

#[derive(Debug, Default)]
pub struct Session {
    blocks: Vec<Block>,
    last_family: ColorFamily,
    focused: Option<Uuid>,
    suggestions: Vec<&'static Keyword>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: Uuid) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Family of the most recent top-level block.
    pub fn last_family(&self) -> ColorFamily {
        self.last_family
    }

    // -- Command bar --

    /// Recompute autocomplete suggestions for the command bar text.
    pub fn update_input(&mut self, input: &str) -> &[&'static Keyword] {
        self.suggestions = command::suggest(input);
        &self.suggestions
    }

    pub fn suggestions(&self) -> &[&'static Keyword] {
        &self.suggestions
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Interpret one command-bar line.
    pub fn execute(&mut self, input: &str) -> Outcome {
        let parsed = command::parse(input, !self.suggestions.is_empty());
        debug!(?parsed, "command parsed");
        match parsed {
            Command::Noop => Outcome::Ignored,
            Command::CreateKeyword(keyword) => Outcome::Created(self.add_keyword_block(keyword)),
            Command::CreateBlock { tag, level } => Outcome::Created(self.add_block(&tag, level)),
            Command::Forge { description } => Outcome::Forge(description),
            Command::SaveSnippet { name } => Outcome::SaveSnippet(name),
            Command::UseSnippet { name } => Outcome::UseSnippet(name),
        }
    }

    /// Create a block from the suggestion at `index`, as if it were clicked.
    pub fn accept_suggestion(&mut self, index: usize) -> Option<Uuid> {
        let keyword = *self.suggestions.get(index)?;
        Some(self.add_keyword_block(keyword))
    }

    // -- Block creation --

    /// Add a block for a known keyword at level 1.
    pub fn add_keyword_block(&mut self, keyword: &Keyword) -> Uuid {
        self.last_family = keyword.family;
        self.push(Block::new(&keyword.display, IndentLevel::TOP, keyword.family))
    }

    /// Add a block from free-form tag text.
    ///
    /// At level 1 an exact keyword name still resolves to the keyword;
    /// anything else is upper-cased and resets the rolling family. Nested
    /// blocks inherit the rolling family whatever their tag says.
    pub fn add_block(&mut self, tag: &str, level: IndentLevel) -> Uuid {
        if level.is_top() {
            if let Some(keyword) = keywords::lookup(tag) {
                return self.add_keyword_block(keyword);
            }
            self.last_family = ColorFamily::default();
        }
        let family = self.last_family;
        self.push(Block::new(tag.to_uppercase(), level, family))
    }

    /// Add the level-1 ROLE block produced by `/forge`.
    pub fn insert_forged_role(&mut self, text: &str) -> Uuid {
        let (display, family) = match keywords::lookup("role") {
            Some(keyword) => (keyword.display.clone(), keyword.family),
            None => ("ROLE".to_string(), ColorFamily::default()),
        };
        self.last_family = family;
        let block = Block::new(display, IndentLevel::TOP, family).with_content(text.trim());
        self.push(block)
    }

    fn push(&mut self, block: Block) -> Uuid {
        let id = block.id;
        debug!(tag = %block.tag, level = %block.level, family = %block.family, "block created");
        self.blocks.push(block);
        self.suggestions.clear();
        self.focused = Some(id);
        id
    }

    // -- Editing --

    /// Replace a block's content. Returns false for an unknown id.
    pub fn set_content(&mut self, id: Uuid, content: impl Into<String>) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Append text to a block, separated from existing content by a newline.
    pub fn append_content(&mut self, id: Uuid, text: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                if !block.content.is_empty() && !block.content.ends_with('\n') {
                    block.content.push('\n');
                }
                block.content.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Remove a block. Focus moves to the block now at the same position,
    /// or the new last block.
    pub fn delete(&mut self, id: Uuid) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        let removed = self.blocks.remove(index);
        if self.focused == Some(id) {
            self.focused = self
                .blocks
                .get(index)
                .or_else(|| self.blocks.last())
                .map(|b| b.id);
        }
        debug!(tag = %removed.tag, "block deleted");
        Some(removed)
    }

    // -- Focus --

    pub fn focused(&self) -> Option<Uuid> {
        self.focused
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focused.and_then(|id| self.block(id))
    }

    pub fn focus(&mut self, id: Uuid) -> bool {
        if self.block(id).is_some() {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    pub fn focus_next(&mut self) {
        self.shift_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.shift_focus(-1);
    }

    fn shift_focus(&mut self, step: isize) {
        if self.blocks.is_empty() {
            self.focused = None;
            return;
        }
        let last = self.blocks.len() - 1;
        let current = self
            .focused
            .and_then(|id| self.blocks.iter().position(|b| b.id == id));
        let next = match current {
            None if step > 0 => 0,
            None => last,
            Some(i) => i.saturating_add_signed(step).min(last),
        };
        self.focused = Some(self.blocks[next].id);
    }

    // -- Output --

    /// Serialize the current blocks as nested markup.
    pub fn render(&self) -> String {
        markup::render(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u8) -> IndentLevel {
        IndentLevel::new(n).unwrap()
    }

    #[test]
    fn keyword_block_uses_canonical_tag_and_family() {
        let mut session = Session::new();
        let id = match session.execute("/role") {
            Outcome::Created(id) => id,
            other => panic!("expected block, got {other:?}"),
        };
        let block = session.block(id).unwrap();
        assert_eq!(block.tag, "ROLE");
        assert_eq!(block.family, ColorFamily::Cyan);
        assert_eq!(session.last_family(), ColorFamily::Cyan);
        assert_eq!(session.focused(), Some(id));
    }

    #[test]
    fn nested_block_inherits_rolling_family() {
        let mut session = Session::new();
        session.execute("/task");
        session.execute("//step one");
        let nested = &session.blocks()[1];
        assert_eq!(nested.tag, "STEP ONE");
        assert_eq!(nested.level, level(2));
        assert_eq!(nested.family, ColorFamily::Lime);
    }

    #[test]
    fn nested_keyword_text_does_not_change_family() {
        let mut session = Session::new();
        session.execute("/context");
        session.execute("//role");
        let nested = &session.blocks()[1];
        assert_eq!(nested.tag, "ROLE");
        assert_eq!(nested.family, ColorFamily::Pink);
        assert_eq!(session.last_family(), ColorFamily::Pink);
    }

    #[test]
    fn custom_top_level_block_resets_family() {
        let mut session = Session::new();
        session.execute("/role");
        session.execute("/audience");
        session.execute("///age");
        let blocks = session.blocks();
        assert_eq!(blocks[1].tag, "AUDIENCE");
        assert_eq!(blocks[1].family, ColorFamily::White);
        assert_eq!(blocks[2].family, ColorFamily::White);
    }

    #[test]
    fn suggestions_drive_prefix_resolution() {
        let mut session = Session::new();
        let names: Vec<&str> = session
            .update_input("/ex")
            .iter()
            .map(|k| k.name.as_str())
            .collect();
        assert_eq!(names, ["examples"]);

        session.execute("/ex");
        assert_eq!(session.blocks()[0].tag, "EXAMPLES");
        assert!(session.suggestions().is_empty(), "creating clears suggestions");
    }

    #[test]
    fn without_suggestions_prefix_is_custom_tag() {
        let mut session = Session::new();
        session.update_input("/ex");
        session.clear_suggestions();
        session.execute("/ex");
        assert_eq!(session.blocks()[0].tag, "EX");
    }

    #[test]
    fn accept_suggestion_creates_that_keyword() {
        let mut session = Session::new();
        session.update_input("/c");
        let id = session.accept_suggestion(1).expect("second suggestion");
        assert_eq!(session.block(id).unwrap().tag, "CONSTRAINTS");
        assert!(session.accept_suggestion(0).is_none());
    }

    #[test]
    fn empty_and_forge_commands_do_not_create_blocks() {
        let mut session = Session::new();
        assert_eq!(session.execute("   "), Outcome::Ignored);
        assert_eq!(session.execute("/forge   "), Outcome::Ignored);
        assert_eq!(
            session.execute("/forge a strict editor"),
            Outcome::Forge("a strict editor".into())
        );
        assert!(session.is_empty());
    }

    #[test]
    fn forged_role_is_top_level_role_block() {
        let mut session = Session::new();
        session.execute("/audience");
        let id = session.insert_forged_role("  You are a strict editor.\n");
        let block = session.block(id).unwrap();
        assert_eq!(block.tag, "ROLE");
        assert_eq!(block.level, IndentLevel::TOP);
        assert_eq!(block.content, "You are a strict editor.");
        assert_eq!(session.last_family(), ColorFamily::Cyan);
    }

    #[test]
    fn set_and_append_content() {
        let mut session = Session::new();
        let id = session.add_block("notes", level(1));
        assert!(session.set_content(id, "first"));
        assert!(session.append_content(id, "second"));
        assert_eq!(session.block(id).unwrap().content, "first\nsecond");
        assert!(!session.set_content(Uuid::new_v4(), "x"));
    }

    #[test]
    fn append_to_empty_block_adds_no_separator() {
        let mut session = Session::new();
        let id = session.add_block("notes", level(1));
        session.append_content(id, "only");
        assert_eq!(session.block(id).unwrap().content, "only");
    }

    #[test]
    fn delete_moves_focus_to_neighbour() {
        let mut session = Session::new();
        let a = session.add_block("a", level(1));
        let b = session.add_block("b", level(1));
        let c = session.add_block("c", level(1));

        session.focus(b);
        session.delete(b).unwrap();
        assert_eq!(session.focused(), Some(c));

        session.delete(c).unwrap();
        assert_eq!(session.focused(), Some(a));

        session.delete(a).unwrap();
        assert_eq!(session.focused(), None);
        assert!(session.delete(a).is_none());
    }

    #[test]
    fn focus_navigation_clamps_at_ends() {
        let mut session = Session::new();
        let a = session.add_block("a", level(1));
        let b = session.add_block("b", level(1));

        session.focus_next();
        assert_eq!(session.focused(), Some(b));
        session.focus_prev();
        session.focus_prev();
        assert_eq!(session.focused(), Some(a));
    }

    #[test]
    fn render_uses_block_order() {
        let mut session = Session::new();
        let role = session.add_block("role", level(1));
        session.set_content(role, "You are X");
        let ctx = session.add_block("context", level(1));
        session.set_content(ctx, "Y");
        assert_eq!(
            session.render(),
            "<role>\n  You are X\n</role>\n<context>\n  Y\n</context>"
        );
    }
}
