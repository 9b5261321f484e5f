use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use promptforge_store::SnippetStore;

use crate::SnippetCommands;
use crate::config::ForgeConfig;

/// Dispatch a `promptforge snippet` subcommand.
pub fn run_snippet_command(config: &ForgeConfig, command: SnippetCommands) -> Result<()> {
    let store = SnippetStore::open(&config.store)
        .with_context(|| format!("failed to open snippet store {}", config.store.path.display()))?;

    match command {
        SnippetCommands::Save {
            tag,
            name,
            content,
            file,
        } => {
            let content = read_content(content, file.as_deref())?;
            save(&store, &tag, &name, &content)
        }
        SnippetCommands::List { tag } => list(&store, tag.as_deref()),
    }
}

/// Content priority: `--content`, then `--file`, then stdin.
fn read_content(content: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(content) = content {
        return Ok(content);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read snippet content from stdin")?;
    Ok(buf)
}

fn save(store: &SnippetStore, tag: &str, name: &str, content: &str) -> Result<()> {
    let content = content.trim();
    if content.is_empty() {
        bail!("snippet content is empty");
    }
    store
        .try_save(tag, name, content)
        .with_context(|| format!("failed to save snippet {name:?}"))?;
    println!("Saved snippet {name:?} under {}", tag.to_uppercase());
    Ok(())
}

fn list(store: &SnippetStore, tag: Option<&str>) -> Result<()> {
    let tags = match tag {
        Some(tag) => vec![tag.to_uppercase()],
        None => store.try_tags()?,
    };

    if tags.is_empty() {
        println!("No snippets saved in {}", store.path().display());
        return Ok(());
    }

    for tag in &tags {
        let snippets = store.try_load(tag)?;
        println!("{tag} ({})", snippets.len());
        for snippet in &snippets {
            println!("  {:<20} {}", snippet.name, preview(&snippet.content, 56));
        }
    }
    Ok(())
}

/// First line of `content`, cut to `width` characters.
fn preview(content: &str, width: usize) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > width {
        let cut: String = line.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_flag_wins_over_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snippet.txt");
        std::fs::write(&path, "from file").unwrap();

        let content = read_content(Some("inline".into()), Some(&path)).unwrap();
        assert_eq!(content, "inline");

        let content = read_content(None, Some(&path)).unwrap();
        assert_eq!(content, "from file");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_content(None, Some(Path::new("/nonexistent/snippet.txt"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn save_rejects_blank_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SnippetStore::open(&promptforge_store::StoreConfig::new(
            dir.path().join("snippets.json"),
        ))
        .unwrap();

        assert!(save(&store, "role", "empty", "  \n").is_err());
        save(&store, "role", "terse", "Be terse.\n").unwrap();
        assert_eq!(store.load("ROLE")[0].content, "Be terse.");
    }

    #[test]
    fn preview_truncates_long_lines() {
        assert_eq!(preview("short\nsecond line", 10), "short");
        assert_eq!(preview("abcdefghijkl", 8), "abcde...");
        assert_eq!(preview("", 8), "");
    }
}
