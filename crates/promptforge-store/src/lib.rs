//! Flat-file snippet store for promptforge.
//!
//! Snippets are named, reusable text fragments grouped by upper-cased
//! section tag in a single JSON file that is rewritten in full on every
//! save.

pub mod config;
pub mod snippets;

pub use config::StoreConfig;
pub use snippets::{Snippet, SnippetStore, StoreError};
