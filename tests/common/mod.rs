//! Scripted in-memory browser for scenario tests
//!
//! Elements are keyed by their exact selector string. Clicking a selector
//! can reveal further elements, which is enough to model tab switches.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use simverify::browser::{BrowserDriver, Selector};
use simverify::core::config::TimingConfig;
use simverify::core::{ConsoleEntry, Viewport};
use simverify::{Config, Result};

#[derive(Debug, Clone, Copy)]
struct Element {
    count: usize,
    visible: bool,
}

#[derive(Default)]
struct State {
    present: HashMap<String, Element>,
    actions: Vec<String>,
    console: Vec<ConsoleEntry>,
    closes: usize,
    /// Visibility checks left before an element shows up
    pending: HashMap<String, usize>,
}

#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<State>,
    reveals: HashMap<String, Vec<(String, Element)>>,
    panic_on_click: Option<String>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element present from page load
    pub fn with(self, selector: Selector, visible: bool) -> Self {
        self.state.lock().unwrap().present.insert(
            selector.to_string(),
            Element { count: 1, visible },
        );
        self
    }

    /// Element that becomes visible on the `polls`-th visibility check
    pub fn appear_after(self, selector: Selector, polls: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .pending
            .insert(selector.to_string(), polls.max(1));
        self
    }

    /// Clicking `trigger` makes `target` appear
    pub fn reveal(mut self, trigger: Selector, target: Selector, visible: bool) -> Self {
        self.reveals
            .entry(trigger.to_string())
            .or_default()
            .push((target.to_string(), Element { count: 1, visible }));
        self
    }

    /// Console output returned by the next drain
    pub fn with_console(self, entries: Vec<ConsoleEntry>) -> Self {
        self.state.lock().unwrap().console.extend(entries);
        self
    }

    pub fn panic_on_click(mut self, selector: Selector) -> Self {
        self.panic_on_click = Some(selector.to_string());
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    fn record(&self, action: String) {
        self.state.lock().unwrap().actions.push(action);
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn open(&self, url: &str) -> Result<()> {
        self.record(format!("open {}", url));
        Ok(())
    }

    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        self.record(format!("viewport {}x{}", viewport.width, viewport.height));
        Ok(())
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        let state = self.state.lock().unwrap();
        Ok(state
            .present
            .get(selector.as_str())
            .map(|e| e.count)
            .unwrap_or(0))
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let key = selector.as_str();
        let due = match state.pending.get_mut(key) {
            Some(left) => {
                *left -= 1;
                *left == 0
            }
            None => false,
        };
        if due {
            state.pending.remove(key);
            state.present.insert(
                key.to_string(),
                Element {
                    count: 1,
                    visible: true,
                },
            );
        }
        Ok(state
            .present
            .get(selector.as_str())
            .map(|e| e.count > 0 && e.visible)
            .unwrap_or(false))
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        if self.panic_on_click.as_deref() == Some(selector.as_str()) {
            panic!("click handler crashed on {}", selector);
        }
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("click {}", selector));
        if let Some(revealed) = self.reveals.get(selector.as_str()) {
            for (target, element) in revealed {
                state.present.insert(target.clone(), *element);
            }
        }
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &Selector) -> Result<()> {
        self.record(format!("scroll {}", selector));
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, b"\x89PNG\r\n\x1a\n")?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(format!("screenshot {}", name));
        Ok(())
    }

    async fn drain_console(&self) -> Result<Vec<ConsoleEntry>> {
        Ok(std::mem::take(&mut self.state.lock().unwrap().console))
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        state.actions.push("close".to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Config with no settle delays that writes screenshots into `dir`
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.target.base_url = "http://localhost:5173".to_string();
    config.timing = TimingConfig::instant();
    config.output.screenshot_dir = dir.to_path_buf();
    config
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}
