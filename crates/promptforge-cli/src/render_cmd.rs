//! `promptforge render`: build a prompt from a script file.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use promptforge_core::llm::{self, TextGenerator};
use promptforge_core::script::{self, Step};
use promptforge_core::{Outcome, Session};
use promptforge_store::SnippetStore;

use crate::clipboard::Clipboard;
use crate::config::ForgeConfig;

/// Drives a [`Session`] from script steps.
///
/// Scripts never show autocomplete, so `/ro` is a custom `RO` tag while
/// `/role` still resolves to the keyword.
pub struct ScriptRunner {
    session: Session,
    store: SnippetStore,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ScriptRunner {
    pub fn new(store: SnippetStore, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            session: Session::new(),
            store,
            generator,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run every step of `text` and return the rendered markup.
    pub async fn run(&mut self, text: &str) -> Result<String> {
        for step in script::parse(text) {
            self.apply(step).await?;
        }
        Ok(self.session.render())
    }

    async fn apply(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Content(text) => match self.session.focused() {
                Some(id) => {
                    self.session.append_content(id, &text);
                }
                None => warn!("content before the first block skipped"),
            },
            Step::Command(line) => match self.session.execute(&line) {
                Outcome::Created(_) => {}
                Outcome::Ignored => warn!(command = %line, "command ignored"),
                Outcome::Forge(description) => self.forge(&description).await?,
                Outcome::SaveSnippet(name) => self.save_snippet(&name),
                Outcome::UseSnippet(name) => self.use_snippet(&name),
            },
        }
        Ok(())
    }

    async fn forge(&mut self, description: &str) -> Result<()> {
        let Some(generator) = &self.generator else {
            bail!("`/forge` needs an API key; set GEMINI_API_KEY or run `promptforge init --api-key ...`");
        };
        let text = llm::generate_role(generator.as_ref(), description)
            .await
            .with_context(|| format!("failed to forge a role for {description:?}"))?;
        self.session.insert_forged_role(&text);
        Ok(())
    }

    fn save_snippet(&mut self, name: &str) {
        let Some(block) = self.session.focused_block() else {
            warn!(name, "`/save` with no block to save");
            return;
        };
        if self.store.save(&block.tag, name, block.content.trim()) {
            info!(tag = %block.tag, name, "snippet saved");
        }
    }

    fn use_snippet(&mut self, name: &str) {
        let Some(block) = self.session.focused_block() else {
            warn!(name, "`/use` with no block to fill");
            return;
        };
        let id = block.id;
        match self.store.find(&block.tag, name) {
            Some(snippet) => {
                self.session.append_content(id, &snippet.content);
            }
            None => warn!(tag = %block.tag, name, "snippet not found"),
        }
    }
}

/// Execute the `promptforge render` command.
pub async fn run_render(
    config: &ForgeConfig,
    script_path: &Path,
    output: Option<&Path>,
    copy: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;

    let store = SnippetStore::open(&config.store)
        .with_context(|| format!("failed to open snippet store {}", config.store.path.display()))?;
    let generator = config.generator().ok();

    let mut runner = ScriptRunner::new(store, generator);
    let markup = runner.run(&text).await?;
    info!(blocks = runner.session().blocks().len(), "script rendered");

    match output {
        Some(path) => {
            std::fs::write(path, format!("{markup}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Prompt written to {}", path.display());
        }
        None => println!("{markup}"),
    }

    if copy {
        Clipboard::new()?.copy(&markup)?;
        println!("DATA_COPIED_TO_CLIPBOARD");
    }

    Ok(())
}
