//! Browser automation module
//!
//! Wraps the agent-browser CLI behind a driver trait and exposes a page
//! handle with bounded waits.

mod driver;
mod executor;
mod page;
mod selector;

pub use driver::BrowserDriver;
pub use executor::AgentBrowser;
pub use page::Page;
pub use selector::Selector;
