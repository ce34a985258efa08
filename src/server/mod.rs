use crate::Result;
use crate::config::AppConfig;
use crate::models::{PublicationResult, PublishStatus};
use crate::session::SessionController;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Seam between the HTTP boundary and the automation core, so the router
/// can be exercised without launching a browser.
#[async_trait::async_trait]
pub trait PublishService: Send + Sync {
    async fn publish(&self, price: String, description: String) -> Result<PublicationResult>;
}

/// Production service: fixed listing attributes from configuration plus the
/// caller-supplied price and description, run through the session controller.
pub struct ConfiguredPublisher {
    config: Arc<AppConfig>,
    controller: SessionController,
}

impl ConfiguredPublisher {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let controller =
            SessionController::new(&config.screenshots, config.automation.clone(), None);
        Self { config, controller }
    }
}

#[async_trait::async_trait]
impl PublishService for ConfiguredPublisher {
    async fn publish(&self, price: String, description: String) -> Result<PublicationResult> {
        let credentials = self.config.credentials();
        let ad = self.config.ad_data(price, description);
        let options = self.config.options();
        self.controller.run(&credentials, &ad, &options).await
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<dyn PublishService>,
}

#[derive(Debug, Deserialize)]
struct PublishRequest {
    price: Option<Price>,
    description: Option<String>,
}

/// The original client sends the price as either a JSON number or a string;
/// both are stringified before entering the core.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Price {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Price {
    fn into_string(self) -> String {
        match self {
            Price::Integer(n) => n.to_string(),
            Price::Float(n) => n.to_string(),
            Price::Text(s) => s,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Price::Text(s) if s.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    status: PublishStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    screenshot: Option<String>,
    session_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

pub fn router(service: Arc<dyn PublishService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/publish-ad", post(publish_ad))
        .layer(cors)
        .with_state(AppState { service })
}

pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let cors = cors_layer(&config.server.cors_origin);
    let service: Arc<dyn PublishService> = Arc::new(ConfiguredPublisher::new(Arc::clone(&config)));
    let app = router(service, cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("invalid CORS origin {:?}, allowing any", origin);
            CorsLayer::permissive()
        }
    }
}

async fn publish_ad(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Response {
    let (price, description) = match (request.price, request.description) {
        (Some(price), Some(description))
            if !price.is_empty() && !description.trim().is_empty() =>
        {
            (price, description)
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    message: "Price and description are required.".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.service.publish(price.into_string(), description).await {
        Ok(result) => {
            // Every completed run answers 200; the status field carries the
            // business outcome, with the last screenshot for diagnosis.
            let message = match result.status {
                PublishStatus::Published => "Ad published successfully",
                PublishStatus::Error => "Failed to publish ad",
            };
            let screenshot = result.screenshots.last().map(|s| s.image.clone());

            (
                StatusCode::OK,
                Json(PublishResponse {
                    status: result.status,
                    message: message.to_string(),
                    publication_id: result.publication_id,
                    publication_url: result.publication_url,
                    screenshot,
                    session_id: result.session_id,
                }),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                message: format!("Failed to publish ad: {}", err),
            }),
        )
            .into_response(),
    }
}
