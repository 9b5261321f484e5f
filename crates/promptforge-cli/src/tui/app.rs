//! TUI application state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, warn};
use uuid::Uuid;

use promptforge_core::llm::{self, LlmError, TextGenerator};
use promptforge_core::{Outcome, Session};
use promptforge_store::{Snippet, SnippetStore};

use crate::clipboard::Clipboard;

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    CommandBar,
    Editing(Uuid),
}

type PendingRole = oneshot::Receiver<Result<String, LlmError>>;

/// Application state for the TUI.
pub struct App {
    pub session: Session,
    pub input: String,
    pub selected_suggestion: usize,
    pub focus: Focus,
    /// Snippets saved under the focused block's tag.
    pub snippets: Vec<Snippet>,
    pub status_message: Option<String>,
    pub tick_rate: Duration,
    pub should_quit: bool,
    store: SnippetStore,
    generator: Option<Arc<dyn TextGenerator>>,
    pending: Option<PendingRole>,
    clipboard: Option<Clipboard>,
}

impl App {
    pub fn new(store: SnippetStore, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            session: Session::new(),
            input: String::new(),
            selected_suggestion: 0,
            focus: Focus::CommandBar,
            snippets: Vec::new(),
            status_message: None,
            tick_rate: Duration::from_millis(100),
            should_quit: false,
            store,
            generator,
            pending: None,
            clipboard: None,
        }
    }

    /// True while a `/forge` request is in flight. Command input is
    /// disabled until it completes.
    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    // -- Command bar --

    pub fn input_char(&mut self, c: char) {
        if self.is_generating() {
            return;
        }
        self.input.push(c);
        self.input_changed();
    }

    pub fn input_backspace(&mut self) {
        if self.is_generating() {
            return;
        }
        self.input.pop();
        self.input_changed();
    }

    fn input_changed(&mut self) {
        self.session.update_input(&self.input);
        self.selected_suggestion = 0;
    }

    /// Run the command bar text.
    pub fn submit(&mut self) {
        if self.is_generating() {
            return;
        }
        let line = std::mem::take(&mut self.input);
        let outcome = self.session.execute(&line);
        self.session.clear_suggestions();
        self.selected_suggestion = 0;

        match outcome {
            Outcome::Ignored => {}
            Outcome::Created(_) => self.refresh_snippets(),
            Outcome::Forge(description) => self.start_forge(description),
            Outcome::SaveSnippet(name) => self.save_snippet(&name),
            Outcome::UseSnippet(name) => self.use_snippet(&name),
        }
    }

    /// Create a block from the highlighted suggestion.
    pub fn accept_suggestion(&mut self) {
        if self.is_generating() {
            return;
        }
        if self.session.accept_suggestion(self.selected_suggestion).is_some() {
            self.input.clear();
            self.selected_suggestion = 0;
            self.refresh_snippets();
        }
    }

    pub fn suggestion_up(&mut self) {
        self.selected_suggestion = self.selected_suggestion.saturating_sub(1);
    }

    pub fn suggestion_down(&mut self) {
        let count = self.session.suggestions().len();
        if count > 0 && self.selected_suggestion < count - 1 {
            self.selected_suggestion += 1;
        }
    }

    // -- Block focus and editing --

    pub fn focus_prev(&mut self) {
        self.session.focus_prev();
        self.refresh_snippets();
    }

    pub fn focus_next(&mut self) {
        self.session.focus_next();
        self.refresh_snippets();
    }

    pub fn start_editing(&mut self) {
        if let Some(id) = self.session.focused() {
            self.focus = Focus::Editing(id);
        }
    }

    pub fn stop_editing(&mut self) {
        self.focus = Focus::CommandBar;
    }

    pub fn edit_char(&mut self, c: char) {
        self.edit(|content| content.push(c));
    }

    pub fn edit_backspace(&mut self) {
        self.edit(|content| {
            content.pop();
        });
    }

    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        let Focus::Editing(id) = self.focus else {
            return;
        };
        let Some(block) = self.session.block(id) else {
            self.focus = Focus::CommandBar;
            return;
        };
        let mut content = block.content.clone();
        change(&mut content);
        self.session.set_content(id, content);
    }

    pub fn delete_focused(&mut self) {
        let Some(id) = self.session.focused() else {
            return;
        };
        if let Some(block) = self.session.delete(id) {
            self.status_message = Some(format!("Deleted {}", block.tag));
        }
        if self.focus == Focus::Editing(id) {
            self.focus = Focus::CommandBar;
        }
        self.refresh_snippets();
    }

    // -- Actions --

    pub fn copy_markup(&mut self) {
        if self.session.is_empty() {
            self.status_message = Some("Nothing to copy".to_string());
            return;
        }
        let markup = self.session.render();
        let result = self.clipboard().and_then(|clipboard| clipboard.copy(&markup));
        self.status_message = Some(match result {
            Ok(()) => "DATA_COPIED_TO_CLIPBOARD".to_string(),
            Err(e) => format!("Copy failed: {e:#}"),
        });
    }

    /// Open the clipboard on first use and keep it for the rest of the session.
    fn clipboard(&mut self) -> anyhow::Result<&mut Clipboard> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new()?,
        };
        Ok(self.clipboard.insert(clipboard))
    }

    fn start_forge(&mut self, description: String) {
        let Some(generator) = &self.generator else {
            self.status_message = Some(format!(
                "Forge unavailable: {}",
                LlmError::MissingApiKey
            ));
            return;
        };
        info!(%description, "forge requested");
        self.pending = Some(llm::spawn_role_generation(generator.clone(), description));
        self.status_message = Some("FORGING ROLE...".to_string());
    }

    /// Check on an in-flight `/forge`. Called once per tick.
    pub fn poll_generation(&mut self) {
        let Some(rx) = &mut self.pending else {
            return;
        };
        let result = match rx.try_recv() {
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(LlmError::WorkerDropped),
            Ok(result) => result,
        };
        self.pending = None;

        match result {
            Ok(text) => {
                self.session.insert_forged_role(&text);
                self.status_message = Some("ROLE forged".to_string());
                self.refresh_snippets();
            }
            Err(e) => {
                warn!(error = %e, "forge failed");
                self.status_message = Some(format!("Forge failed: {e}"));
            }
        }
    }

    fn save_snippet(&mut self, name: &str) {
        let Some(block) = self.session.focused_block() else {
            self.status_message = Some("Select a block before saving".to_string());
            return;
        };
        let saved = self.store.save(&block.tag, name, block.content.trim());
        self.status_message = Some(if saved {
            format!("Saved snippet {name:?} under {}", block.tag)
        } else {
            format!("Could not save snippet {name:?}")
        });
        self.refresh_snippets();
    }

    fn use_snippet(&mut self, name: &str) {
        let Some(block) = self.session.focused_block() else {
            self.status_message = Some("Select a block before inserting".to_string());
            return;
        };
        let id = block.id;
        match self.store.find(&block.tag, name) {
            Some(snippet) => {
                self.session.append_content(id, &snippet.content);
                self.status_message = Some(format!("Inserted snippet {name:?}"));
            }
            None => {
                self.status_message = Some(format!("No snippet {name:?} for {}", block.tag));
            }
        }
    }

    /// Reload the snippet panel for the focused block's tag.
    pub fn refresh_snippets(&mut self) {
        self.snippets = match self.session.focused_block() {
            Some(block) => self.store.load(&block.tag),
            None => Vec::new(),
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
