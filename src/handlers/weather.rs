//! HTTP handler for the weather aggregation endpoint

use axum::{extract::Query, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::location::LocationService;
use crate::services::weather::{ForecastEntry, WeatherAggregator};
use crate::AppState;

/// Query parameters for the weather endpoint
///
/// Coordinates arrive as raw strings so that missing and non-numeric
/// values can both be reported as a 400 with a descriptive message.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Combined weather, location and crop payload
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub weather: String,
    pub temp: f64,
    pub air_quality: i64,
    pub no2: f64,
    pub pm10: f64,
    pub pm2_5: f64,
    pub co2_prediction: String,
    pub location: String,
    pub crops: &'static [&'static str],
    pub forecast: Vec<ForecastEntry>,
    pub alerts: Vec<String>,
}

/// Aggregate weather, air quality, forecast, location and crops
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<WeatherResponse>> {
    let latitude = parse_coordinate(query.lat.as_deref(), "lat")?;
    let longitude = parse_coordinate(query.lon.as_deref(), "lon")?;

    let aggregator = WeatherAggregator::new(state.weather.clone());
    let locations = LocationService::new(state.geocoder.clone());

    // The two fetches are independent; geocoding failures degrade to a
    // sentinel label inside the service, so only the aggregate can fail
    let (report, profile) = tokio::join!(
        aggregator.aggregate(latitude, longitude),
        locations.profile(latitude, longitude),
    );
    let report = report?;

    Ok(Json(WeatherResponse {
        weather: report.snapshot.description,
        temp: report.snapshot.temp,
        air_quality: report.snapshot.air_quality,
        no2: report.snapshot.no2,
        pm10: report.snapshot.pm10,
        pm2_5: report.snapshot.pm2_5,
        co2_prediction: report.snapshot.co2_prediction,
        location: profile.location,
        crops: profile.crops,
        forecast: report.forecast,
        alerts: report.alerts,
    }))
}

fn parse_coordinate(value: Option<&str>, field: &str) -> AppResult<f64> {
    let value = value.ok_or_else(|| AppError::Validation {
        field: field.to_string(),
        message: format!("Query parameter '{}' is required", field),
    })?;

    value.parse::<f64>().map_err(|_| AppError::Validation {
        field: field.to_string(),
        message: format!("Query parameter '{}' must be a number", field),
    })
}
