//! LLM bridge used by `/forge`.
//!
//! A [`TextGenerator`] turns a prompt into text. [`generate_role`] wraps the
//! user's free-text description in a fixed meta-prompt and asks the
//! generator for a persona; [`spawn_role_generation`] runs that on a tokio
//! task and hands back a oneshot receiver so the UI loop never blocks.
//!
//! ```text
//! UI loop --/forge desc--> spawn_role_generation --tokio::spawn--> generate_role
//!    ^                                                               |
//!    +------------- oneshot::Receiver<Result<String, LlmError>> <-----+
//! ```
//!
//! There is no retry, timeout or cancellation: a failed attempt surfaces
//! immediately as an error.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{info, warn};

pub use gemini::GeminiClient;

/// Errors from the LLM bridge.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured; set GEMINI_API_KEY or run `promptforge init --api-key ...`")]
    MissingApiKey,

    #[error("role description is empty")]
    EmptyDescription,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("generation worker stopped before delivering a result")]
    WorkerDropped,
}

/// Anything that can complete a text prompt.
///
/// Object-safe so callers can hold an `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

/// Build the meta-prompt that asks for a persona description.
pub fn role_prompt(description: &str) -> String {
    format!(
        "You are an expert prompt engineer. Write the ROLE section of a prompt \
         for an AI assistant, based on this description:\n\n\
         {description}\n\n\
         Requirements:\n\
         - Start with \"You are...\".\n\
         - Describe the persona's expertise, tone and priorities.\n\
         - Keep it under 150 words.\n\
         - Return only the persona text, with no preamble, headings or quotes."
    )
}

/// Ask `generator` for a persona matching `description`.
///
/// An empty (whitespace-only) description fails with
/// [`LlmError::EmptyDescription`] before any request is made.
pub async fn generate_role(
    generator: &dyn TextGenerator,
    description: &str,
) -> Result<String, LlmError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(LlmError::EmptyDescription);
    }

    info!(generator = generator.name(), "generating role");
    let text = generator.generate(&role_prompt(description)).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Run [`generate_role`] on a background task.
///
/// The receiver yields exactly one result. If the task panics the sender is
/// dropped and the receiver reports a closed channel, which callers map to
/// [`LlmError::WorkerDropped`].
pub fn spawn_role_generation(
    generator: Arc<dyn TextGenerator>,
    description: String,
) -> oneshot::Receiver<Result<String, LlmError>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = generate_role(generator.as_ref(), &description).await;
        if let Err(e) = &result {
            warn!(error = %e, "role generation failed");
        }
        // The receiver may already be gone if the UI quit.
        let _ = tx.send(result);
    });
    rx
}
