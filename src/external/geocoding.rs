//! Reverse-geocoding client backed by Nominatim (OpenStreetMap)
//!
//! Location is non-essential context, so this client never fails the
//! caller: every failure mode degrades to the "unknown location" sentinel.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Sentinel label returned when the location cannot be resolved
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Reverse-geocoding client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl GeocodingClient {
    /// Create a new GeocodingClient
    ///
    /// Nominatim's usage policy requires a client-identifying User-Agent.
    pub fn new(base_url: String, user_agent: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            user_agent,
        }
    }

    /// Resolve coordinates to a "city, country" label
    ///
    /// Returns the sentinel label on any HTTP, network or parse failure.
    pub async fn locate(&self, latitude: f64, longitude: f64) -> String {
        match self.try_locate(latitude, longitude).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    async fn try_locate(&self, latitude: f64, longitude: f64) -> Result<String, reqwest::Error> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Reverse geocoding returned {}", response.status());
            return Ok(UNKNOWN_LOCATION.to_string());
        }

        let data: NominatimResponse = response.json().await?;
        Ok(format_label(data))
    }
}

/// Build the display label from a geocoding response
fn format_label(data: NominatimResponse) -> String {
    let address = match data.address {
        Some(address) => address,
        None => return UNKNOWN_LOCATION.to_string(),
    };

    let country = address
        .country
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    let settlement = address.city.or(address.town).or(address.village);

    match settlement {
        Some(city) if !city.is_empty() => format!("{}, {}", city, country),
        _ => country,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(
        country: Option<&str>,
        city: Option<&str>,
        town: Option<&str>,
        village: Option<&str>,
    ) -> NominatimResponse {
        NominatimResponse {
            address: Some(NominatimAddress {
                country: country.map(String::from),
                city: city.map(String::from),
                town: town.map(String::from),
                village: village.map(String::from),
            }),
        }
    }

    #[test]
    fn test_label_with_city_and_country() {
        let label = format_label(address(Some("Mexico"), Some("Oaxaca"), None, None));
        assert_eq!(label, "Oaxaca, mexico");
    }

    #[test]
    fn test_label_prefers_city_over_town_and_village() {
        let label = format_label(address(
            Some("France"),
            Some("Lyon"),
            Some("Vieux Lyon"),
            Some("Hameau"),
        ));
        assert_eq!(label, "Lyon, france");
    }

    #[test]
    fn test_label_falls_back_to_town_then_village() {
        let label = format_label(address(Some("Italy"), None, Some("Greve"), None));
        assert_eq!(label, "Greve, italy");

        let label = format_label(address(Some("Italy"), None, None, Some("Montefioralle")));
        assert_eq!(label, "Montefioralle, italy");
    }

    #[test]
    fn test_label_country_only() {
        let label = format_label(address(Some("Peru"), None, None, None));
        assert_eq!(label, "peru");
    }

    #[test]
    fn test_label_without_address() {
        let label = format_label(NominatimResponse { address: None });
        assert_eq!(label, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_label_without_country() {
        let label = format_label(address(None, None, None, None));
        assert_eq!(label, "unknown");
    }
}
