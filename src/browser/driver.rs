//! Browser driver trait for abstracting automation backends

use async_trait::async_trait;
use std::path::Path;

use crate::browser::Selector;
use crate::core::{ConsoleEntry, Result, Viewport};

/// One browser session with a single page.
///
/// Element operations act on the first match of the selector unless the
/// method says otherwise.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate the page to `url`
    async fn open(&self, url: &str) -> Result<()>;

    /// Resize the viewport
    async fn set_viewport(&self, viewport: Viewport) -> Result<()>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &Selector) -> Result<usize>;

    /// Whether the first match is currently visible (false when absent)
    async fn is_visible(&self, selector: &Selector) -> Result<bool>;

    /// Click the element
    async fn click(&self, selector: &Selector) -> Result<()>;

    /// Scroll the element into view if needed
    async fn scroll_into_view(&self, selector: &Selector) -> Result<()>;

    /// Write a PNG of the viewport to `path`
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Console messages and page errors since the last drain
    async fn drain_console(&self) -> Result<Vec<ConsoleEntry>>;

    /// Release the browser. Calling it twice is a no-op.
    async fn close(&self) -> Result<()>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
