//! HTTP handlers for the chat endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::chat::{ChatMessage, ChatOrchestrator, PlantingWeather, WaterParameters};
use crate::AppState;

/// Request body for the water-quality chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterChatRequest {
    pub message: String,
    pub water_parameters: WaterParameters,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// Request body for the planting chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingChatRequest {
    pub message: String,
    pub weather_data: PlantingWeather,
    pub crops: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// Assistant reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Answer a water-quality question
pub async fn chat_water(
    State(state): State<AppState>,
    Json(request): Json<WaterChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let orchestrator = ChatOrchestrator::new(state.gemini.clone());
    let parameters = request.water_parameters.into_prompt_block();

    let response = orchestrator
        .reply_water(&request.message, &parameters, &request.conversation_history)
        .await?;

    Ok(Json(ChatResponse { response }))
}

/// Answer a planting question
pub async fn chat_planting(
    State(state): State<AppState>,
    Json(request): Json<PlantingChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let orchestrator = ChatOrchestrator::new(state.gemini.clone());

    let response = orchestrator
        .reply_planting(
            &request.message,
            &request.weather_data,
            &request.crops,
            &request.location,
            &request.conversation_history,
        )
        .await?;

    Ok(Json(ChatResponse { response }))
}
