use anyhow::{Context, Result};

use crate::scoring::Tool;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Open a stage's research tool
pub fn open_tool(tool: &Tool) -> Result<()> {
    log::debug!("Opening {} at {}", tool.name, tool.url);
    open_url(tool.url)
}
