use citymap_shared::models::Candidate;
use citymap_shared::search::{GeocodeError, Geocoder};
use serde::Serialize;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Where and how to geocode. Provided to the component tree as context.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub limit: u32,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            limit: 1,
        }
    }
}

/// Query string of a free-text search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams<'a> {
    pub q: &'a str,
    pub format: &'static str,
    pub limit: u32,
}

pub fn build_search_params(query: &str, limit: u32) -> SearchParams<'_> {
    SearchParams {
        q: query,
        format: "json",
        limit,
    }
}

/// Any non-2xx status is a fault, whatever the body says.
pub fn check_status(status: u16) -> Result<(), GeocodeError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(GeocodeError::Status(status))
    }
}

/// Decode a search response body into candidates.
pub fn parse_search_response(body: &str) -> Result<Vec<Candidate>, GeocodeError> {
    serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))
}

/// Nominatim-compatible geocoder over HTTP.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, GeocodeError> {
        tracing::debug!(query, endpoint = %self.config.endpoint, "geocoding");

        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&build_search_params(query, self.config.limit))
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        check_status(resp.status().as_u16())?;

        let body = resp
            .text()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        parse_search_response(&body)
    }
}
