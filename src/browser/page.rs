//! Page handle used by scenarios
//!
//! Owns the driver for one session, relays console output after every
//! action and implements the bounded visibility wait.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::browser::{BrowserDriver, Selector};
use crate::core::config::TimingConfig;
use crate::core::{ConsoleEntry, Result, VerifyError, Viewport};

/// A single open page driven through a [`BrowserDriver`]
pub struct Page {
    driver: Arc<dyn BrowserDriver>,
    timing: TimingConfig,
    viewport: Viewport,
    screenshot_dir: PathBuf,
    console: Mutex<Vec<ConsoleEntry>>,
    closed: AtomicBool,
}

impl Page {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        timing: TimingConfig,
        viewport: Viewport,
        screenshot_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            driver,
            timing,
            viewport,
            screenshot_dir: screenshot_dir.into(),
            console: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    /// Console messages and page errors seen so far
    pub fn console(&self) -> Vec<ConsoleEntry> {
        self.console
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Pull pending console output from the driver and log it.
    /// Failures here never affect the scenario.
    async fn relay_console(&self) {
        match self.driver.drain_console().await {
            Ok(entries) => {
                if entries.is_empty() {
                    return;
                }
                for entry in &entries {
                    tracing::info!("{}", entry);
                }
                if let Ok(mut seen) = self.console.lock() {
                    seen.extend(entries);
                }
            }
            Err(e) => tracing::debug!("console relay failed: {}", e),
        }
    }

    /// Set the configured viewport and navigate to `url`
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver.set_viewport(self.viewport).await?;
        tracing::info!("Navigating to {}", url);
        self.driver.open(url).await?;
        self.relay_console().await;
        Ok(())
    }

    /// Unconditional wall-clock delay to let rendering settle
    pub async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    pub async fn count(&self, selector: &Selector) -> Result<usize> {
        self.driver.count(selector).await
    }

    /// Fail with `ElementNotFound` unless the selector matches something
    pub async fn require(&self, selector: &Selector, what: &str) -> Result<usize> {
        let count = self.count(selector).await?;
        if count == 0 {
            return Err(VerifyError::not_found(what, selector.as_str()));
        }
        tracing::debug!("{} matched {} element(s)", what, count);
        Ok(count)
    }

    pub async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        self.driver.is_visible(selector).await
    }

    /// Require a match, then click the first one
    pub async fn click_first(&self, selector: &Selector, what: &str) -> Result<()> {
        self.require(selector, what).await?;
        self.driver.click(selector).await?;
        self.relay_console().await;
        Ok(())
    }

    /// Require a match, then scroll the first one into view
    pub async fn scroll_into_view(&self, selector: &Selector, what: &str) -> Result<()> {
        self.require(selector, what).await?;
        self.driver.scroll_into_view(selector).await
    }

    /// Poll until the first match is visible, or fail after `timeout`
    pub async fn expect_visible(
        &self,
        selector: &Selector,
        what: &str,
        timeout: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.driver.is_visible(selector).await? {
                tracing::debug!("{} is visible", what);
                return Ok(());
            }
            if Instant::now() >= deadline {
                self.relay_console().await;
                return Err(VerifyError::NotVisible {
                    what: what.to_string(),
                    selector: selector.to_string(),
                    timeout,
                });
            }
            sleep(self.timing.poll_interval()).await;
        }
    }

    /// `expect_visible` with the default budget
    pub async fn expect_visible_default(&self, selector: &Selector, what: &str) -> Result<()> {
        self.expect_visible(selector, what, self.timing.expect_timeout())
            .await
    }

    /// Screenshot the viewport into the output directory
    pub async fn screenshot(&self, file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;
        // the automation daemon has its own working directory
        let path = std::path::absolute(self.screenshot_dir.join(file_name))?;
        self.driver.screenshot(&path).await?;
        tracing::info!("Screenshot saved to {}", path.display());
        Ok(path)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the browser. Once a close succeeds, later calls are no-ops.
    pub async fn close(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.relay_console().await;
        tracing::debug!("closing {} session", self.driver.name());
        self.driver.close().await?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
