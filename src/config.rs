//! Configuration management for the AgroMine backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// OpenWeatherMap configuration
    pub weather: WeatherConfig,

    /// Generative-language API configuration
    pub gemini: GeminiConfig,

    /// Reverse-geocoding configuration
    pub geocoding: GeocodingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,

    /// API base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Generative-language API key
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// API base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub base_url: String,

    /// Client-identifying User-Agent required by Nominatim
    pub user_agent: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.base_url", "https://api.openweathermap.org/data/2.5")?
            .set_default("gemini.model", "gemini-2.0-flash-exp")?
            .set_default(
                "gemini.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("geocoding.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.user_agent", "AgroMine/2.0")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
