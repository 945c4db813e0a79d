//! Location profile service
//!
//! Combines reverse geocoding with the crop reference table. Geocoding
//! failures degrade to a sentinel label, so building a profile is
//! infallible.

use serde::Serialize;

use crate::external::GeocodingClient;
use crate::services::crops;

/// Location profile service
#[derive(Clone)]
pub struct LocationService {
    geocoder: GeocodingClient,
}

/// Resolved location label and the crops common to that region
#[derive(Debug, Clone, Serialize)]
pub struct LocationProfile {
    pub location: String,
    pub crops: &'static [&'static str],
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(geocoder: GeocodingClient) -> Self {
        Self { geocoder }
    }

    /// Resolve coordinates to a display label and regional crop list
    pub async fn profile(&self, latitude: f64, longitude: f64) -> LocationProfile {
        let location = self.geocoder.locate(latitude, longitude).await;
        let crops = crops::crops_for(&location);

        LocationProfile { location, crops }
    }
}
