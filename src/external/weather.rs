//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap for current conditions, air pollution
//! and forecasts. Temperatures are returned in Kelvin (no `units`
//! parameter is sent); downstream consumers convert where needed.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap response for current weather
#[derive(Debug, Deserialize)]
pub struct OwmCurrentResponse {
    pub main: OwmMain,
    pub weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct OwmWeather {
    pub main: String,
    pub description: String,
}

/// OpenWeatherMap response for air pollution
#[derive(Debug, Deserialize)]
pub struct OwmAirPollutionResponse {
    pub list: Vec<OwmAirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OwmAirPollutionEntry {
    pub main: OwmAirQualityIndex,
    pub components: OwmAirComponents,
}

#[derive(Debug, Deserialize)]
pub struct OwmAirQualityIndex {
    /// Air-quality index, ordinal 1 (good) to 5 (very poor)
    pub aqi: i64,
}

#[derive(Debug, Deserialize)]
pub struct OwmAirComponents {
    pub no2: f64,
    pub pm10: f64,
    pub pm2_5: f64,
}

/// OpenWeatherMap response for the 3-hourly forecast
#[derive(Debug, Deserialize)]
pub struct OwmForecastResponse {
    pub list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
pub struct OwmForecastItem {
    /// Human-readable timestamp label, e.g. "2024-05-01 12:00:00"
    pub dt_txt: String,
    pub main: OwmMain,
    pub weather: Vec<OwmWeather>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn get_current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<OwmCurrentResponse> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}",
            self.base_url, latitude, longitude, self.api_key
        );
        self.fetch_json(&url, "weather").await
    }

    /// Fetch current air pollution data by GPS coordinates
    pub async fn get_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<OwmAirPollutionResponse> {
        let url = format!(
            "{}/air_pollution?lat={}&lon={}&appid={}",
            self.base_url, latitude, longitude, self.api_key
        );
        self.fetch_json(&url, "air pollution").await
    }

    /// Fetch the 3-hourly forecast covering `days` days (8 samples/day)
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> AppResult<OwmForecastResponse> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&cnt={}",
            self.base_url,
            latitude,
            longitude,
            self.api_key,
            days * 8
        );
        self.fetch_json(&url, "forecast").await
    }

    /// Issue a GET and deserialize the JSON body, mapping all failure
    /// modes to a single external-service error
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("{} request failed: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "{} API error: {} - {}",
                what, status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse {} response: {}", what, e))
        })
    }
}
