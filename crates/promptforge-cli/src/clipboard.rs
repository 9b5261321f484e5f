//! System clipboard access.

use anyhow::{Context, Result};

/// Long-lived clipboard handle.
///
/// On X11 the copied text is served by this process, so the handle has to
/// outlive the copy for other applications to paste it.
pub struct Clipboard {
    inner: arboard::Clipboard,
}

impl Clipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().context("failed to open the system clipboard")?;
        Ok(Self { inner })
    }

    pub fn copy(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .context("failed to copy to the clipboard")
    }
}
