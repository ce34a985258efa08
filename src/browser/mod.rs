use crate::Result;
use crate::models::PageOptions;
use async_trait::async_trait;
use std::path::PathBuf;

pub mod cdp;
pub mod js;
pub mod setup;

pub use cdp::{CdpPage, LaunchedBrowser, launch};

/// The page operations the state machines and the session controller drive.
///
/// The production implementation is [`CdpPage`]; tests substitute a scripted
/// double. Every waiting operation is bounded by the uniform per-step
/// timeout of the implementation.
#[async_trait]
pub trait AutomationPage: Send + Sync {
    /// Applies user agent, viewport, script execution, and the automation
    /// masking override. Must run before the first navigation.
    async fn configure(&self, options: &PageOptions) -> Result<()>;

    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Awaits an already in-flight navigation (e.g. a post-login redirect).
    async fn wait_for_navigation(&self) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Clicks and returns only once the navigation the click triggers has
    /// settled. Post-condition: the page location differs from the location
    /// observed before the click, or the call fails.
    async fn click_and_await_navigation(&self, selector: &str) -> Result<()>;

    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    async fn wait_for_visible(&self, selector: &str) -> Result<()>;

    async fn wait_for_enabled(&self, selector: &str) -> Result<()>;

    /// Visible text of every element matching `selector`, in DOM order.
    async fn menu_labels(&self, selector: &str) -> Result<Vec<String>>;

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()>;

    /// Submits all files to a single file input in one operation.
    async fn set_input_files(&self, selector: &str, files: &[PathBuf]) -> Result<()>;

    async fn count_elements(&self, selector: &str) -> Result<usize>;

    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;

    async fn evaluate(&self, script: &str) -> Result<()>;

    /// Full-page PNG of the current view.
    async fn screenshot(&self) -> Result<Vec<u8>>;
}
