use anyhow::{Context, Result, bail};
use tracing::info;

use promptforge_core::llm;

use crate::config::ForgeConfig;

/// Execute the `promptforge forge` command: print a generated ROLE block.
pub async fn run_forge(config: &ForgeConfig, description: &[String]) -> Result<()> {
    let description = description.join(" ");
    if description.trim().is_empty() {
        bail!("describe the role to forge, e.g. `promptforge forge a patient maths tutor`");
    }

    let generator = config
        .generator()
        .context("`forge` needs an API key; set GEMINI_API_KEY or run `promptforge init --api-key ...`")?;
    info!(generator = generator.name(), model = %config.model, "forging role");

    let text = llm::generate_role(generator.as_ref(), &description)
        .await
        .context("role generation failed")?;

    println!("{text}");
    Ok(())
}
