//! IDMC features flow
//!
//! Checks the simulator landing view, switches to Settings and checks the
//! IDMC CDI sections. Screenshots both views.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::browser::{Page, Selector};
use crate::core::config::root_url;
use crate::core::Result;
use crate::scenarios::Scenario;

pub const SIMULATION_SCREENSHOT: &str = "simulation.png";
pub const SETTINGS_SCREENSHOT: &str = "settings.png";

pub mod selectors {
    use super::*;

    pub fn simulator_title() -> Selector {
        Selector::text("Data Pipeline Simulator")
    }

    pub fn settings_button() -> Selector {
        Selector::role("button", "Settings")
    }

    pub fn settings_title() -> Selector {
        Selector::text("IDMC CDI Settings")
    }

    /// Section headings expected on the settings view, with descriptions
    pub fn settings_headings() -> Vec<(Selector, &'static str)> {
        vec![
            (Selector::role("heading", "Connections"), "Connections heading"),
            (Selector::role("heading", "Mappings"), "Mappings heading"),
            (
                Selector::role("heading", "Mapping Tasks (Execution)"),
                "Mapping Tasks heading",
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdmcFeatures;

#[async_trait]
impl Scenario for IdmcFeatures {
    fn name(&self) -> &'static str {
        "idmc"
    }

    fn description(&self) -> &'static str {
        "Simulator landing view, then IDMC CDI settings sections"
    }

    async fn run(&self, page: &Page, base_url: &str) -> Result<Vec<PathBuf>> {
        let timing = page.timing().clone();
        let mut shots = Vec::with_capacity(2);

        page.goto(&root_url(base_url)?).await?;
        // hydration
        page.settle(timing.page_settle()).await;

        page.expect_visible(
            &selectors::simulator_title(),
            "Simulator title",
            timing.initial_render_timeout(),
        )
        .await?;

        // graph layout
        page.settle(timing.render_settle()).await;
        shots.push(page.screenshot(SIMULATION_SCREENSHOT).await?);

        tracing::info!("Switching to Settings");
        page.click_first(&selectors::settings_button(), "Settings button")
            .await?;
        page.expect_visible_default(&selectors::settings_title(), "IDMC CDI Settings title")
            .await?;

        for (heading, what) in selectors::settings_headings() {
            page.expect_visible_default(&heading, what).await?;
        }

        shots.push(page.screenshot(SETTINGS_SCREENSHOT).await?);
        Ok(shots)
    }
}
