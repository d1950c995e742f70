//! Collection settings flow
//!
//! Settings → Data Hub → "Publications (Collection)" → Topic → toggle the
//! real-time trigger checkbox, then screenshot.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::browser::{Page, Selector};
use crate::core::{Result, VerifyError};
use crate::scenarios::Scenario;

pub const SCREENSHOT: &str = "collection_settings.png";

const COLLECTION_HEADER: &str = "Publications (Collection)";
const REALTIME_CHECKBOX: &str = "Trigger Subscriptions Immediately (Real-time)";

/// Element queries used by the flow
pub mod selectors {
    use super::*;

    /// Top navigation "Settings", English or Japanese label
    pub fn settings_button() -> Selector {
        Selector::any_of([
            Selector::has_text("button", "Settings"),
            Selector::has_text("button", "設定"),
        ])
    }

    pub fn data_hub_tab() -> Selector {
        Selector::has_text("button", "Data Hub")
    }

    pub fn collection_header() -> Selector {
        Selector::has_text("h3", COLLECTION_HEADER)
    }

    /// The element wrapping the header and its form controls
    pub fn collection_container() -> Selector {
        collection_header().parent()
    }

    pub fn topic_label() -> Selector {
        collection_container()
            .within(&Selector::has_text("label", "Topic"))
            .first()
    }

    pub fn realtime_checkbox() -> Selector {
        collection_container().within(&Selector::has_text("label", REALTIME_CHECKBOX))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionSettings;

#[async_trait]
impl Scenario for CollectionSettings {
    fn name(&self) -> &'static str {
        "collection"
    }

    fn description(&self) -> &'static str {
        "Data Hub collection settings: select Topic and toggle the real-time trigger"
    }

    async fn run(&self, page: &Page, base_url: &str) -> Result<Vec<PathBuf>> {
        let timing = page.timing().clone();

        page.goto(base_url).await?;
        page.settle(timing.page_settle()).await;

        tracing::info!("Clicking Settings tab (top nav)");
        page.click_first(&selectors::settings_button(), "Settings button")
            .await?;
        page.settle(timing.step_settle()).await;

        tracing::info!("Clicking Data Hub tab");
        page.click_first(&selectors::data_hub_tab(), "Data Hub tab")
            .await?;
        page.settle(timing.step_settle()).await;

        tracing::info!("Waiting for '{}'", COLLECTION_HEADER);
        page.scroll_into_view(&selectors::collection_header(), "Collection header")
            .await?;
        tracing::info!("Found header");

        tracing::info!("Looking for Topic radio button");
        page.click_first(&selectors::topic_label(), "Topic label")
            .await?;
        tracing::info!("Clicked Topic radio button");
        page.settle(timing.step_settle()).await;

        tracing::info!("Checking for checkbox");
        let checkbox = selectors::realtime_checkbox();
        page.require(&checkbox, "Realtime trigger checkbox").await?;
        if !page.is_visible(&checkbox).await? {
            return Err(VerifyError::NotVisible {
                what: "Realtime trigger checkbox".to_string(),
                selector: checkbox.to_string(),
                timeout: std::time::Duration::ZERO,
            });
        }
        tracing::info!("Checkbox found");
        page.click_first(&checkbox, "Realtime trigger checkbox")
            .await?;

        let shot = page.screenshot(SCREENSHOT).await?;
        Ok(vec![shot])
    }
}
