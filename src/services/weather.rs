//! Weather aggregation service
//!
//! Fetches current weather, air quality and the multi-day forecast
//! concurrently, derives the CO2 narrative from the air-quality index and
//! extracts significant-event alerts from the forecast.

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::external::weather::{OwmForecastResponse, WeatherClient};

/// Forecast window: 8 days at 8 samples/day (3-hourly)
const FORECAST_DAYS: u32 = 8;

/// Forecast conditions that warrant an alert, matched case-sensitively
/// against the provider's category taxonomy
const ALERT_CONDITIONS: &[&str] = &["Rain", "Snow", "Extreme"];

/// Weather aggregation service
#[derive(Clone)]
pub struct WeatherAggregator {
    client: WeatherClient,
}

/// Current conditions enriched with air-quality data
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    /// Temperature in Kelvin, as delivered by the provider
    pub temp: f64,
    pub description: String,
    /// Air-quality index, ordinal 1-5
    pub air_quality: i64,
    pub no2: f64,
    pub pm10: f64,
    pub pm2_5: f64,
    pub co2_prediction: String,
}

/// One entry of the 3-hourly forecast window
#[derive(Debug, Clone, Serialize)]
pub struct ForecastEntry {
    pub timestamp: String,
    pub temp: f64,
    pub condition: String,
    pub description: String,
}

/// Combined result of one aggregation call
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
    pub alerts: Vec<String>,
}

impl WeatherAggregator {
    /// Create a new WeatherAggregator instance
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    /// Fetch and merge all weather data for a coordinate pair
    ///
    /// The three provider calls run concurrently and join fail-fast: the
    /// first error aborts the combined result, there is no partial
    /// aggregate.
    pub async fn aggregate(&self, latitude: f64, longitude: f64) -> AppResult<WeatherReport> {
        let (current, air_quality, forecast) = tokio::try_join!(
            self.client.get_current_weather(latitude, longitude),
            self.client.get_air_quality(latitude, longitude),
            self.client.get_forecast(latitude, longitude, FORECAST_DAYS),
        )?;

        let conditions = current
            .weather
            .first()
            .ok_or_else(|| AppError::ExternalService("Weather response had no conditions".to_string()))?;

        let air = air_quality
            .list
            .first()
            .ok_or_else(|| AppError::ExternalService("Air pollution response was empty".to_string()))?;

        let snapshot = WeatherSnapshot {
            temp: current.main.temp,
            description: conditions.description.clone(),
            air_quality: air.main.aqi,
            no2: air.components.no2,
            pm10: air.components.pm10,
            pm2_5: air.components.pm2_5,
            co2_prediction: co2_narrative(air.main.aqi).to_string(),
        };

        let forecast = convert_forecast(forecast);
        let alerts = extract_alerts(&forecast);

        Ok(WeatherReport {
            snapshot,
            forecast,
            alerts,
        })
    }
}

/// Derive a CO2-level narrative from the air-quality index
///
/// Total over all inputs: indices outside 1-4 (including the provider's
/// own 5) collapse into the "dangerous" bucket. This is intentional
/// monotonic extrapolation, not clamping.
pub fn co2_narrative(aqi: i64) -> &'static str {
    match aqi {
        1 => "Low CO2 levels (350-400 ppm)",
        2 => "Moderate CO2 levels (400-450 ppm)",
        3 => "High CO2 levels (450-500 ppm)",
        4 => "Very high CO2 levels (500-600 ppm)",
        _ => "Dangerous CO2 levels (>600 ppm)",
    }
}

/// Extract significant-event alerts from the forecast, in forecast order
///
/// One alert per qualifying entry; no dedup, no cap.
pub fn extract_alerts(forecast: &[ForecastEntry]) -> Vec<String> {
    forecast
        .iter()
        .filter(|entry| ALERT_CONDITIONS.contains(&entry.condition.as_str()))
        .map(|entry| format!("{} on {}", entry.description, entry.timestamp))
        .collect()
}

fn convert_forecast(data: OwmForecastResponse) -> Vec<ForecastEntry> {
    data.list
        .into_iter()
        .map(|item| {
            let weather = item.weather.into_iter().next();
            let (condition, description) = match weather {
                Some(w) => (w.main, w.description),
                None => (String::new(), String::new()),
            };
            ForecastEntry {
                timestamp: item.dt_txt,
                temp: item.main.temp,
                condition,
                description,
            }
        })
        .collect()
}
