//! Opening checkout links in a new browsing context.
//!
//! DESIGN
//! ======
//! A reply's `checkout_url` hands the user off to a payment page. The turn
//! controller calls `LinkOpener::open` once per such reply and only logs a
//! failure: a link that cannot be opened never fails the turn.
//!
//! `SystemOpener` resolves relative links against the endpoint base URL,
//! refuses anything but http(s), and launches the platform URL handler
//! without waiting for it.

use reqwest::Url;

#[cfg(test)]
#[path = "opener_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("invalid checkout URL: {0}")]
    InvalidUrl(String),

    #[error("refusing to open '{0}' URL (expected http or https)")]
    UnsupportedScheme(String),

    #[error("failed to launch URL handler: {0}")]
    Launch(#[from] std::io::Error),
}

/// Opens an external link.
pub trait LinkOpener {
    /// # Errors
    ///
    /// Returns an [`OpenError`] when the target is invalid or cannot be launched.
    fn open(&self, target: &str) -> Result<(), OpenError>;
}

impl<T: LinkOpener + ?Sized> LinkOpener for std::rc::Rc<T> {
    fn open(&self, target: &str) -> Result<(), OpenError> {
        (**self).open(target)
    }
}

/// Resolve `target` against `base` and require an http(s) result.
///
/// # Errors
///
/// Returns [`OpenError::InvalidUrl`] or [`OpenError::UnsupportedScheme`].
pub fn resolve_link(base: &Url, target: &str) -> Result<Url, OpenError> {
    let url = base
        .join(target.trim())
        .map_err(|e| OpenError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(OpenError::UnsupportedScheme(other.to_owned())),
    }
}

// =============================================================================
// SYSTEM OPENER
// =============================================================================

pub struct SystemOpener {
    base: Url,
    launch: bool,
}

impl SystemOpener {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base, launch: true }
    }

    /// With `launch` off, links are resolved and logged but not opened.
    #[must_use]
    pub fn with_launch(mut self, launch: bool) -> Self {
        self.launch = launch;
        self
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<(), OpenError> {
        let url = resolve_link(&self.base, target)?;
        if !self.launch {
            tracing::info!(url = %url, "checkout link (launch disabled)");
            return Ok(());
        }
        let child = handler_command(url.as_str())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;
        tracing::info!(url = %url, pid = ?child.id(), "opened checkout link");
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn handler_command(url: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn handler_command(url: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn handler_command(url: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("xdg-open");
    command.arg(url);
    command
}
