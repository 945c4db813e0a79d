//! Route definitions for the AgroMine backend

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Weather aggregation (current + air quality + forecast + crops)
        .route("/weather", get(handlers::get_weather))
        // Conversational assessments
        .route("/chat-water", post(handlers::chat_water))
        .route("/chat-planting", post(handlers::chat_planting))
}
