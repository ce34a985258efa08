pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod flows;
pub mod models;
pub mod server;
pub mod session;
pub mod timeouts;

pub use config::AppConfig;
pub use error::PublishError;

pub type Result<T> = std::result::Result<T, PublishError>;
