use anyhow::Context;
use async_trait::async_trait;
use tracing::warn;

/// Reverse geocoding backend.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> anyhow::Result<AddressParts>;
}

/// The `address` object of a Nominatim `jsonv2` reverse lookup, limited to
/// the fields the viewer shows.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct AddressParts {
    pub city: Option<String>,
    pub state: Option<String>,
    pub road: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ReverseResponse {
    address: AddressParts,
}

impl AddressParts {
    /// `locality, road, postcode` with absent or empty parts skipped.
    pub fn format(&self) -> String {
        fn present(part: &Option<String>) -> Option<&str> {
            part.as_deref().filter(|s| !s.is_empty())
        }
        let locality = present(&self.city).or_else(|| present(&self.state));
        [locality, present(&self.road), present(&self.postcode)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Best effort lookup: every failure is logged and becomes an empty address.
pub async fn resolve(geocoder: &dyn Geocoder, latitude: f64, longitude: f64) -> String {
    match geocoder.reverse(latitude, longitude).await {
        Ok(parts) => parts.format(),
        Err(e) => {
            warn!("error fetching address for ({latitude}, {longitude}): {e:#}");
            String::new()
        }
    }
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> NominatimGeocoder {
        NominatimGeocoder { client, url: url.into() }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> anyhow::Result<AddressParts> {
        let response = self.client
            .get(&self.url)
            .query(&[("format", "jsonv2".to_string()), ("lat", latitude.to_string()), ("lon", longitude.to_string())])
            .send()
            .await
            .context("reverse geocoding request failed")?
            .error_for_status()?;
        let body = response.json::<ReverseResponse>().await.context("malformed reverse geocoding response")?;
        Ok(body.address)
    }
}
