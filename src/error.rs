use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Browser command failed: {0}")]
    Browser(String),

    #[error("Navigation timeout after {0}s")]
    NavigationTimeout(u64),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Element never became interactable: {selector}")]
    ElementNotInteractable { selector: String },

    #[error("No menu option labeled '{label}' for {field}")]
    OptionNotFound { field: String, label: String },

    #[error("Photo upload incomplete after {0}s")]
    UploadTimeout(u64),

    #[error("No publication id in terminal URL: {0}")]
    PublicationIdNotFound(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
