use anyhow::{Context, Result};

/// Open the company website in the user's default browser.
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    tracing::debug!(url, "opened browser");
    Ok(())
}
