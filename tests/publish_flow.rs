use ad_publisher::browser::AutomationPage;
use ad_publisher::config::{AppConfig, AutomationConfig, ScreenshotConfig};
use ad_publisher::models::{AdData, Credentials, PageOptions, PublishStatus};
use ad_publisher::session::SessionController;
use ad_publisher::{PublishError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const LOGIN_URL: &str = "https://admin.seminuevos.com/login";
const REDIRECT_URL: &str = "https://admin.seminuevos.com/redirect";
const HOME_URL: &str = "https://www.seminuevos.com/";
const DETAILS_PAGE_URL: &str = "https://www.seminuevos.com/wizard/extras";
const TERMINAL_URL: &str = "https://www.seminuevos.com/myvehicle/98765/plans";

/// Scripted in-memory stand-in for a real browser page. Navigation is
/// modeled as URL state; cascading menus are served in wizard order.
struct FakePage {
    state: Mutex<PageState>,
}

#[derive(Default)]
struct PageState {
    url: String,
    menus: VecDeque<Vec<String>>,
    reject_login: bool,
    uploads_complete: bool,
    uploaded_visible: usize,
    nav_transitions: Vec<(String, String)>,
}

fn wizard_menus() -> VecDeque<Vec<String>> {
    let menus: [&[&str]; 7] = [
        &["Motos", "Autos", "Camiones"],
        &["Acura", "Audi", "BMW"],
        &["ILX", "MDX", "RDX"],
        &["Convertible", "Coupé", "Hatchback", "Sedán"],
        &["2020", "2019", "2018", "2017"],
        &["Jalisco", "Nuevo León", "Sonora"],
        &["  Monterrey ", "San Pedro", "Apodaca"],
    ];
    menus
        .iter()
        .map(|m| m.iter().map(|s| s.to_string()).collect())
        .collect()
}

impl FakePage {
    fn publishing() -> Self {
        Self {
            state: Mutex::new(PageState {
                menus: wizard_menus(),
                uploads_complete: true,
                ..Default::default()
            }),
        }
    }

    fn rejecting_login() -> Self {
        Self {
            state: Mutex::new(PageState {
                reject_login: true,
                ..Default::default()
            }),
        }
    }

    fn stalled_upload() -> Self {
        Self {
            state: Mutex::new(PageState {
                menus: wizard_menus(),
                uploads_complete: false,
                ..Default::default()
            }),
        }
    }

    fn nav_transitions(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().nav_transitions.clone()
    }
}

#[async_trait]
impl AutomationPage for FakePage {
    async fn configure(&self, _options: &PageOptions) -> Result<()> {
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        self.state.lock().unwrap().url = HOME_URL.to_string();
        Ok(())
    }

    async fn click(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    async fn click_and_await_navigation(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.url.clone();

        if state.url == LOGIN_URL {
            if state.reject_login {
                return Err(PublishError::NavigationTimeout(30));
            }
            state.url = REDIRECT_URL.to_string();
        } else if selector == ".next-button" {
            state.url = DETAILS_PAGE_URL.to_string();
        } else {
            state.url = TERMINAL_URL.to_string();
        }

        let after = state.url.clone();
        state.nav_transitions.push((before, after));
        Ok(())
    }

    async fn type_text(&self, _selector: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn wait_for_visible(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    async fn wait_for_enabled(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    async fn menu_labels(&self, _selector: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .menus
            .front()
            .cloned()
            .unwrap_or_default())
    }

    async fn click_nth(&self, _selector: &str, _index: usize) -> Result<()> {
        self.state.lock().unwrap().menus.pop_front();
        Ok(())
    }

    async fn set_input_files(&self, _selector: &str, files: &[PathBuf]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.uploads_complete {
            state.uploaded_visible = files.len();
        }
        Ok(())
    }

    async fn count_elements(&self, _selector: &str) -> Result<usize> {
        Ok(self.state.lock().unwrap().uploaded_visible)
    }

    async fn set_viewport(&self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> Result<()> {
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

fn controller(dir: &Path, upload_timeout_secs: u64) -> SessionController {
    let screenshots = ScreenshotConfig {
        dir: dir.to_path_buf(),
    };
    let automation = AutomationConfig {
        upload_timeout_secs,
        upload_poll_ms: 10,
    };
    SessionController::new(&screenshots, automation, None)
}

fn credentials() -> Credentials {
    Credentials {
        email: "user@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

fn ad() -> AdData {
    AppConfig::default().ad_data("350000".to_string(), "Vendo mi auto...".to_string())
}

fn assert_gap_free(screenshots: &[ad_publisher::models::ScreenshotRecord]) {
    for (i, record) in screenshots.iter().enumerate() {
        assert_eq!(record.sequence_index, i + 1, "gap at {}", record.step_name);
    }
}

#[tokio::test]
async fn test_successful_run_publishes_listing() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::publishing();

    let result = controller(dir.path(), 60)
        .run_on_page(&page, &credentials(), &ad(), &PageOptions::default())
        .await;

    assert_eq!(result.status, PublishStatus::Published);
    assert_eq!(result.publication_id.as_deref(), Some("98765"));
    assert_eq!(
        result.publication_url.as_deref(),
        Some("https://www.seminuevos.com/myvehicle/98765")
    );
    assert!(result.session_id.chars().all(|c| c.is_ascii_digit()));

    assert!(!result.screenshots.is_empty());
    assert_gap_free(&result.screenshots);

    let steps: Vec<&str> = result
        .screenshots
        .iter()
        .map(|s| s.step_name.as_str())
        .collect();
    assert!(steps.contains(&"goto_login_page"));
    assert!(steps.contains(&"photos_uploaded"));
    assert!(steps.contains(&"final_page"));
    assert!(steps.iter().all(|s| !s.starts_with("error_")));
}

#[tokio::test]
async fn test_combined_click_navigation_always_changes_location() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::publishing();

    let result = controller(dir.path(), 60)
        .run_on_page(&page, &credentials(), &ad(), &PageOptions::default())
        .await;
    assert_eq!(result.status, PublishStatus::Published);

    let transitions = page.nav_transitions();
    // Login submit plus the two wizard advances.
    assert_eq!(transitions.len(), 3);
    for (before, after) in transitions {
        assert_ne!(before, after);
    }
}

#[tokio::test]
async fn test_rejected_login_yields_error_result() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::rejecting_login();

    let result = controller(dir.path(), 60)
        .run_on_page(&page, &credentials(), &ad(), &PageOptions::default())
        .await;

    assert_eq!(result.status, PublishStatus::Error);
    assert!(result.publication_id.is_none());
    assert!(result.publication_url.is_none());
    assert!(!result.session_id.is_empty());

    assert!(result.screenshots.len() >= 2);
    assert_gap_free(&result.screenshots);
    assert!(
        result
            .screenshots
            .iter()
            .any(|s| s.step_name.starts_with("error_"))
    );
}

#[tokio::test]
async fn test_stalled_upload_times_out_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::stalled_upload();

    let result = controller(dir.path(), 1)
        .run_on_page(&page, &credentials(), &ad(), &PageOptions::default())
        .await;

    assert_eq!(result.status, PublishStatus::Error);
    assert!(result.publication_id.is_none());
    assert!(
        result
            .screenshots
            .iter()
            .any(|s| s.step_name.starts_with("error_"))
    );

    // The failure happened before the upload checkpoint was ever reached.
    assert!(
        result
            .screenshots
            .iter()
            .all(|s| s.step_name != "photos_uploaded")
    );
}

#[tokio::test]
async fn test_screenshot_files_are_namespaced_by_session() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::publishing();

    let result = controller(dir.path(), 60)
        .run_on_page(&page, &credentials(), &ad(), &PageOptions::default())
        .await;
    assert_eq!(result.status, PublishStatus::Published);

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert_eq!(entries.len(), result.screenshots.len());
    let prefix = format!("{}_001_", result.session_id);
    assert!(entries.iter().any(|name| name.starts_with(&prefix)));
    assert!(entries.iter().all(|name| name.ends_with(".png")));
}
