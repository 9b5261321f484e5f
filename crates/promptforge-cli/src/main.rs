mod clipboard;
mod config;
mod forge_cmd;
mod render_cmd;
mod snippet_cmds;
#[cfg(test)]
mod test_util;
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use promptforge_store::config::data_dir;

use config::{ForgeConfig, Overrides};

#[derive(Parser)]
#[command(name = "promptforge", about = "Compose structured LLM prompts from slash commands")]
struct Cli {
    /// Snippet file (overrides PROMPTFORGE_SNIPPETS env var)
    #[arg(long, global = true)]
    snippets: Option<PathBuf>,

    /// Gemini model used by forge (overrides PROMPTFORGE_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a promptforge config file
    Init {
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Open the interactive prompt editor (default)
    Compose,
    /// Render a command script to markup
    Render {
        /// Script file: `/command` lines and content lines
        script: PathBuf,
        /// Write the markup to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also copy the markup to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Generate a ROLE block from a short description
    Forge {
        /// What the assistant should be, e.g. "a patient maths tutor"
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Snippet management
    Snippet {
        #[command(subcommand)]
        command: SnippetCommands,
    },
}

#[derive(Subcommand)]
pub enum SnippetCommands {
    /// Save a snippet under a section tag
    Save {
        /// Section tag, e.g. ROLE (case-insensitive)
        tag: String,
        /// Snippet name
        name: String,
        /// Snippet text (defaults to --file, then stdin)
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the snippet text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List saved snippets
    List {
        /// Only list snippets for this tag
        tag: Option<String>,
    },
}

/// Execute the `promptforge init` command: write config file.
fn cmd_init(api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        llm: config::LlmSection {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: None,
            endpoint: None,
        },
        store: config::StoreSection::default(),
    };
    let has_key = cfg.llm.api_key.is_some();

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if has_key {
        println!("  llm.api_key = (set)");
    } else {
        println!();
        println!(
            "No API key stored. Set {} or rerun with --api-key to use forge.",
            config::API_KEY_ENV
        );
    }

    Ok(())
}

/// Log to stderr for batch commands.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a file for the editor so output does not draw over the screen.
fn init_file_logging() -> anyhow::Result<PathBuf> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    let path = dir.join("promptforge.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = Overrides {
        model: cli.model,
        snippets: cli.snippets,
    };

    match cli.command.unwrap_or(Commands::Compose) {
        Commands::Init { api_key, force } => {
            init_stderr_logging();
            cmd_init(api_key, force)?;
        }
        Commands::Compose => {
            let log_path = init_file_logging()?;
            let resolved = ForgeConfig::resolve(&overrides);
            tracing::info!(log = %log_path.display(), "starting editor");
            tui::run_editor(resolved).await?;
        }
        Commands::Render {
            script,
            output,
            copy,
        } => {
            init_stderr_logging();
            let resolved = ForgeConfig::resolve(&overrides);
            render_cmd::run_render(&resolved, &script, output.as_deref(), copy).await?;
        }
        Commands::Forge { description } => {
            init_stderr_logging();
            let resolved = ForgeConfig::resolve(&overrides);
            forge_cmd::run_forge(&resolved, &description).await?;
        }
        Commands::Snippet { command } => {
            init_stderr_logging();
            let resolved = ForgeConfig::resolve(&overrides);
            snippet_cmds::run_snippet_command(&resolved, command)?;
        }
    }

    Ok(())
}
