use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Login identity for the classifieds site. Supplied once per session and
/// never persisted; the password is kept out of Debug output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable input to the submission state machine. Price and description
/// are the only caller-supplied fields; the rest is deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdData {
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub subtype: String,
    pub year: String,
    pub province: String,
    pub city: String,
    pub mileage: String,
    pub price: String,
    pub description: String,
    pub photo_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserOptions {
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Artificial delay applied after every page action.
    #[serde(default = "default_slow_mo")]
    pub slow_mo_ms: u64,
    #[serde(default = "default_launch_args")]
    pub launch_args: Vec<String>,
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            slow_mo_ms: default_slow_mo(),
            launch_args: default_launch_args(),
            chrome_path: None,
        }
    }
}

fn default_headless() -> bool {
    true
}

fn default_slow_mo() -> u64 {
    30
}

fn default_launch_args() -> Vec<String> {
    vec![
        "--disable-notifications".to_string(),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOptions {
    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_javascript_enabled")]
    pub javascript_enabled: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            viewport: Viewport::default(),
            javascript_enabled: default_javascript_enabled(),
        }
    }
}

fn default_user_agent() -> Option<String> {
    Some(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/129.0.0.0 Safari/537.36"
            .to_string(),
    )
}

fn default_javascript_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 900,
        }
    }
}

/// Browser-level and page-level tuning for one session.
#[derive(Debug, Clone, Default)]
pub struct AutomationOptions {
    pub browser: BrowserOptions,
    pub page: PageOptions,
}

/// One entry of the visual audit trail. Indices are 1-based, monotonically
/// increasing and gap-free within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRecord {
    pub sequence_index: usize,
    pub step_name: String,
    /// Base64-encoded PNG, suitable for inline transport.
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Published,
    Error,
}

/// Identifier and canonical URL of a submitted listing, recovered from the
/// terminal page location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub id: String,
    pub url: String,
}

/// The sole value crossing the core's outward boundary. Constructed exactly
/// once per session, by the success path or by the error handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResult {
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_url: Option<String>,
    pub screenshots: Vec<ScreenshotRecord>,
    pub session_id: String,
}

impl PublicationResult {
    pub fn published(
        publication: Publication,
        screenshots: Vec<ScreenshotRecord>,
        session_id: String,
    ) -> Self {
        Self {
            status: PublishStatus::Published,
            publication_id: Some(publication.id),
            publication_url: Some(publication.url),
            screenshots,
            session_id,
        }
    }

    pub fn error(screenshots: Vec<ScreenshotRecord>, session_id: String) -> Self {
        Self {
            status: PublishStatus::Error,
            publication_id: None,
            publication_url: None,
            screenshots,
            session_id,
        }
    }
}
