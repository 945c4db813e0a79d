//! External API integrations

pub mod gemini;
pub mod geocoding;
pub mod weather;

pub use gemini::GeminiClient;
pub use geocoding::GeocodingClient;
pub use weather::WeatherClient;
