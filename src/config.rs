use crate::models::{AdData, AutomationOptions, BrowserOptions, Credentials, PageOptions};
use crate::timeouts::{ms, secs};
use crate::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub browser: BrowserOptions,
    #[serde(default)]
    pub page: PageOptions,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub screenshots: ScreenshotConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed vehicle attributes for this deployment. Price and description come
/// from the caller; everything else is configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_subtype")]
    pub subtype: String,
    #[serde(default = "default_year")]
    pub year: String,
    #[serde(default = "default_province")]
    pub province: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_mileage")]
    pub mileage: String,
    #[serde(default = "default_photo_paths")]
    pub photo_paths: Vec<PathBuf>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            vehicle_type: default_vehicle_type(),
            brand: default_brand(),
            model: default_model(),
            subtype: default_subtype(),
            year: default_year(),
            province: default_province(),
            city: default_city(),
            mileage: default_mileage(),
            photo_paths: default_photo_paths(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScreenshotConfig {
    #[serde(default = "default_screenshot_dir")]
    pub dir: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: default_screenshot_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutomationConfig {
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
    #[serde(default = "default_upload_poll")]
    pub upload_poll_ms: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            upload_timeout_secs: default_upload_timeout(),
            upload_poll_ms: default_upload_poll(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_vehicle_type() -> String {
    "Autos".to_string()
}

fn default_brand() -> String {
    "Acura".to_string()
}

fn default_model() -> String {
    "ilx".to_string()
}

fn default_subtype() -> String {
    "sedán".to_string()
}

fn default_year() -> String {
    "2018".to_string()
}

fn default_province() -> String {
    "nuevo león".to_string()
}

fn default_city() -> String {
    "monterrey".to_string()
}

fn default_mileage() -> String {
    "20000".to_string()
}

fn default_photo_paths() -> Vec<PathBuf> {
    [
        "resources/img/accura_mdx_2018_back_1.jpg",
        "resources/img/accura_mdx_2018_back_2.jpg",
        "resources/img/accura_mdx_2018_back_3.jpg",
        "resources/img/accura_mdx_2018_front_1.jpg",
        "resources/img/accura_mdx_2018_front_2.jpg",
        "resources/img/accura_mdx_2018_front_3.jpg",
        "resources/img/accura_mdx_2018_interior_1.jpg",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("resources/screenshots")
}

fn default_upload_timeout() -> u64 {
    secs::UPLOAD
}

fn default_upload_poll() -> u64 {
    ms::UPLOAD_POLL
}

impl AppConfig {
    /// Loads the TOML file (explicit path, or `ad-publisher.toml` when
    /// present), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => {
                let default_path = Path::new("ad-publisher.toml");
                if default_path.exists() {
                    let content = std::fs::read_to_string(default_path)?;
                    toml::from_str(&content)?
                } else {
                    Self::default()
                }
            }
        };

        config.load_from_env();
        Ok(config)
    }

    fn load_from_env(&mut self) {
        if let Ok(email) = std::env::var("AD_PUBLISHER_EMAIL") {
            self.credentials.email = email;
        }
        if let Ok(password) = std::env::var("AD_PUBLISHER_PASSWORD") {
            self.credentials.password = password;
        }
        if let Ok(origin) = std::env::var("AD_PUBLISHER_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Ok(port) = std::env::var("AD_PUBLISHER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }
        if let Ok(headless) = std::env::var("AD_PUBLISHER_HEADLESS") {
            self.browser.headless = headless == "true" || headless == "1";
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.credentials.email.is_empty() || self.credentials.password.is_empty() {
            return Err(PublishError::ConfigError(
                "credentials.email and credentials.password must be set".into(),
            ));
        }

        if self.listing.photo_paths.is_empty() {
            return Err(PublishError::ConfigError(
                "listing.photo_paths must contain at least one photo".into(),
            ));
        }

        if self.page.viewport.width == 0 || self.page.viewport.height == 0 {
            return Err(PublishError::ConfigError(
                "page.viewport dimensions must be greater than 0".into(),
            ));
        }

        if self.automation.upload_timeout_secs == 0 {
            return Err(PublishError::ConfigError(
                "automation.upload_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.credentials.email.clone(),
            password: self.credentials.password.clone(),
        }
    }

    pub fn options(&self) -> AutomationOptions {
        AutomationOptions {
            browser: self.browser.clone(),
            page: self.page.clone(),
        }
    }

    /// Combines the fixed deployment attributes with the caller-supplied
    /// price and description.
    pub fn ad_data(&self, price: String, description: String) -> AdData {
        AdData {
            vehicle_type: self.listing.vehicle_type.clone(),
            brand: self.listing.brand.clone(),
            model: self.listing.model.clone(),
            subtype: self.listing.subtype.clone(),
            year: self.listing.year.clone(),
            province: self.listing.province.clone(),
            city: self.listing.city.clone(),
            mileage: self.listing.mileage.clone(),
            price,
            description,
            photo_paths: self.listing.photo_paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.browser.headless);
        assert_eq!(config.browser.slow_mo_ms, 30);
        assert_eq!(config.listing.brand, "Acura");
        assert_eq!(config.listing.photo_paths.len(), 7);
        assert_eq!(config.automation.upload_timeout_secs, 60);
        assert_eq!(config.page.viewport.width, 1800);
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let mut config = AppConfig::default();
        config.credentials.email = "user@example.com".to_string();
        config.credentials.password = "hunter2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_photo_set() {
        let mut config = AppConfig::default();
        config.credentials.email = "user@example.com".to_string();
        config.credentials.password = "hunter2".to_string();
        config.listing.photo_paths.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ad_data_merges_caller_fields() {
        let config = AppConfig::default();
        let ad = config.ad_data("350000".to_string(), "Vendo mi auto".to_string());
        assert_eq!(ad.price, "350000");
        assert_eq!(ad.description, "Vendo mi auto");
        assert_eq!(ad.vehicle_type, "Autos");
        assert_eq!(ad.mileage, "20000");
        assert_eq!(ad.photo_paths.len(), 7);
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [credentials]
            email = "user@example.com"
            password = "hunter2"

            [browser]
            headless = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.browser.headless);
        assert_eq!(config.listing.city, "monterrey");
        assert_eq!(config.server.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[listing]"));

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.listing.brand, config.listing.brand);
    }
}
