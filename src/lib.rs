//! AgroMine Backend
//!
//! A stateless backend that composes a weather/air-quality provider, a
//! reverse-geocoding service and a generative-language API to produce
//! agronomic and water-quality assessments over a conversational API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{GeminiClient, GeocodingClient, WeatherClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherClient,
    pub geocoder: GeocodingClient,
    pub gemini: GeminiClient,
}

impl AppState {
    /// Build the shared state, constructing one client per provider
    pub fn new(config: Config) -> Self {
        let weather = WeatherClient::new(
            config.weather.api_key.clone(),
            config.weather.base_url.clone(),
        );
        let geocoder = GeocodingClient::new(
            config.geocoding.base_url.clone(),
            config.geocoding.user_agent.clone(),
        );
        let gemini = GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.base_url.clone(),
            config.gemini.model.clone(),
        );

        Self {
            config: Arc::new(config),
            weather,
            geocoder,
            gemini,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgroMine Backend API v0.1"
}
