use crate::browser::{AutomationPage, js, setup};
use crate::models::{BrowserOptions, PageOptions};
use crate::timeouts::{ms, secs};
use crate::{PublishError, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A launched browser whose CDP event loop runs in a background task.
/// Owned by exactly one session; [`LaunchedBrowser::close`] releases it.
pub struct LaunchedBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

pub async fn launch(options: &BrowserOptions) -> Result<LaunchedBrowser> {
    let chrome_path = match options.chrome_path {
        Some(ref path) => path.clone(),
        None => find_chrome_executable()?,
    };

    let mut builder = BrowserConfig::builder()
        .chrome_executable(&chrome_path)
        .request_timeout(Duration::from_secs(secs::REQUEST));

    if options.headless {
        builder = builder.arg("--headless=new");
    } else {
        builder = builder.with_head();
    }

    for arg in &options.launch_args {
        builder = builder.arg(arg.as_str());
    }

    let config = builder.build().map_err(PublishError::LaunchFailed)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| PublishError::LaunchFailed(e.to_string()))?;

    let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

    Ok(LaunchedBrowser {
        browser,
        handler_task,
    })
}

impl LaunchedBrowser {
    pub async fn new_page(&self, options: &BrowserOptions) -> Result<CdpPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PublishError::Browser(format!("failed to open page: {}", e)))?;

        Ok(CdpPage::new(
            Arc::new(page),
            Duration::from_millis(options.slow_mo_ms),
        ))
    }

    /// Closes the browser and stops the event loop. Dropping the browser
    /// kills the Chrome child process, so this also covers the panic path.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {}", e);
        }
        self.handler_task.abort();
    }
}

/// chromiumoxide-backed [`AutomationPage`]. Every wait is bounded by the
/// uniform per-step timeout; every action is followed by the configured
/// slow-mo delay.
pub struct CdpPage {
    page: Arc<Page>,
    action_delay: Duration,
}

impl CdpPage {
    pub fn new(page: Arc<Page>, action_delay: Duration) -> Self {
        Self { page, action_delay }
    }

    fn step_timeout() -> Duration {
        Duration::from_secs(secs::STEP)
    }

    async fn pace(&self) {
        if !self.action_delay.is_zero() {
            tokio::time::sleep(self.action_delay).await;
        }
    }

    async fn find(&self, selector: &str) -> Result<chromiumoxide::element::Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| PublishError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    async fn eval_bool(&self, script: String) -> bool {
        match self.page.evaluate(script).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn wait_until(&self, script: impl Fn() -> String, on_timeout: PublishError) -> Result<()> {
        let deadline = tokio::time::Instant::now() + Self::step_timeout();
        loop {
            if self.eval_bool(script()).await {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(on_timeout);
            }
            tokio::time::sleep(Duration::from_millis(ms::POLL_INTERVAL)).await;
        }
    }

    async fn wait_for_load(&self) -> Result<()> {
        tokio::time::timeout(Self::step_timeout(), async {
            let mut stable = 0;
            loop {
                let state = self
                    .page
                    .evaluate("document.readyState")
                    .await
                    .ok()
                    .and_then(|r| r.into_value::<String>().ok())
                    .unwrap_or_default();

                if state == "complete" {
                    stable += 1;
                    if stable >= 2 {
                        return;
                    }
                } else {
                    stable = 0;
                }

                tokio::time::sleep(Duration::from_millis(ms::POLL_INTERVAL)).await;
            }
        })
        .await
        .map_err(|_| PublishError::NavigationTimeout(secs::STEP))
    }

    async fn click_element(&self, selector: &str) -> Result<()> {
        let _ = self.page.evaluate(js::scroll_into_view(selector)).await;
        tokio::time::sleep(Duration::from_millis(ms::SETTLE)).await;

        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| PublishError::Browser(format!("click failed for {}: {}", selector, e)))?;
        Ok(())
    }
}

#[async_trait]
impl AutomationPage for CdpPage {
    async fn configure(&self, options: &PageOptions) -> Result<()> {
        setup::apply(&self.page, options).await
    }

    async fn goto(&self, url: &str) -> Result<()> {
        tokio::time::timeout(Self::step_timeout(), self.page.goto(url))
            .await
            .map_err(|_| PublishError::NavigationTimeout(secs::STEP))?
            .map_err(|e| PublishError::Browser(format!("navigation to {} failed: {}", url, e)))?;

        self.wait_for_load().await?;
        self.pace().await;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| PublishError::Browser(e.to_string()))?
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        tokio::time::timeout(Self::step_timeout(), self.page.wait_for_navigation())
            .await
            .map_err(|_| PublishError::NavigationTimeout(secs::STEP))?
            .map_err(|e| PublishError::Browser(format!("navigation wait failed: {}", e)))?;

        self.wait_for_load().await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;
        self.click_element(selector).await?;
        self.pace().await;
        Ok(())
    }

    async fn click_and_await_navigation(&self, selector: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;

        // The post-click poll compares against the location captured before
        // the click, so a navigation that commits immediately still
        // registers as a change.
        let before = self.current_url().await?;
        self.click_element(selector).await?;

        let deadline = tokio::time::Instant::now() + Self::step_timeout();
        loop {
            let url = self.page.url().await.ok().flatten().unwrap_or_default();
            if !url.is_empty() && url != before {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(PublishError::NavigationTimeout(secs::STEP));
            }
            tokio::time::sleep(Duration::from_millis(ms::POLL_INTERVAL)).await;
        }

        self.wait_for_load().await?;
        self.pace().await;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;

        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| PublishError::Browser(format!("focus failed for {}: {}", selector, e)))?;
        element
            .type_str(text)
            .await
            .map_err(|e| PublishError::Browser(format!("typing failed for {}: {}", selector, e)))?;

        self.pace().await;
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &str) -> Result<()> {
        self.wait_until(
            || js::is_visible(selector),
            PublishError::ElementNotFound {
                selector: selector.to_string(),
            },
        )
        .await
    }

    async fn wait_for_enabled(&self, selector: &str) -> Result<()> {
        self.wait_until(
            || js::is_enabled(selector),
            PublishError::ElementNotInteractable {
                selector: selector.to_string(),
            },
        )
        .await
    }

    async fn menu_labels(&self, selector: &str) -> Result<Vec<String>> {
        let result = self
            .page
            .evaluate(js::item_labels(selector))
            .await
            .map_err(|e| PublishError::EvaluationFailed(e.to_string()))?;

        result
            .into_value::<Vec<String>>()
            .map_err(|e| PublishError::EvaluationFailed(format!("menu labels: {}", e)))
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|_| PublishError::ElementNotFound {
                selector: selector.to_string(),
            })?;

        let element = elements
            .get(index)
            .ok_or_else(|| PublishError::ElementNotFound {
                selector: format!("{} (item {})", selector, index),
            })?;

        element
            .click()
            .await
            .map_err(|e| PublishError::Browser(format!("click failed for {}: {}", selector, e)))?;

        self.pace().await;
        Ok(())
    }

    async fn set_input_files(&self, selector: &str, files: &[PathBuf]) -> Result<()> {
        let element = self.find(selector).await?;

        // Chrome requires absolute paths for file inputs.
        let files: Vec<String> = files
            .iter()
            .map(|p| {
                std::path::absolute(p)
                    .unwrap_or_else(|_| p.clone())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        let mut params = SetFileInputFilesParams::new(files);
        params.backend_node_id = Some(element.backend_node_id);

        self.page
            .execute(params)
            .await
            .map_err(|e| PublishError::Browser(format!("file upload failed: {}", e)))?;

        self.pace().await;
        Ok(())
    }

    async fn count_elements(&self, selector: &str) -> Result<usize> {
        let result = self
            .page
            .evaluate(js::count_matches(selector))
            .await
            .map_err(|e| PublishError::EvaluationFailed(e.to_string()))?;

        result
            .into_value::<u64>()
            .map(|n| n as usize)
            .map_err(|e| PublishError::EvaluationFailed(format!("element count: {}", e)))
    }

    async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(width as i64)
            .height(height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(PublishError::Browser)?;

        self.page
            .execute(params)
            .await
            .map_err(|e| PublishError::Browser(format!("failed to set viewport: {}", e)))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<()> {
        self.page
            .evaluate(script.to_string())
            .await
            .map_err(|e| PublishError::EvaluationFailed(e.to_string()))?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(true)
            .build();

        self.page
            .screenshot(params)
            .await
            .map_err(|e| PublishError::ScreenshotFailed(e.to_string()))
    }
}

pub fn find_chrome_executable() -> Result<PathBuf> {
    if let Some(path) = find_in_standard_locations() {
        return Ok(path);
    }

    if let Some(path) = find_in_path() {
        return Ok(path);
    }

    Err(PublishError::LaunchFailed(
        "Could not find Chrome/Chromium executable. Set browser.chrome_path".into(),
    ))
}

#[cfg(target_os = "macos")]
fn find_in_standard_locations() -> Option<PathBuf> {
    let paths = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
    ];

    paths.iter().map(Path::new).find(|p| p.exists()).map(Path::to_path_buf)
}

#[cfg(target_os = "linux")]
fn find_in_standard_locations() -> Option<PathBuf> {
    let paths = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    paths.iter().map(Path::new).find(|p| p.exists()).map(Path::to_path_buf)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn find_in_standard_locations() -> Option<PathBuf> {
    None
}

fn find_in_path() -> Option<PathBuf> {
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}
