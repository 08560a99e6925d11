use serde::{Deserialize, Serialize};

/// A resolved point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// One result record as returned by the geocoding provider.
///
/// Nominatim encodes both coordinates as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub lat: String,
    pub lon: String,
}

/// Stroke/fill styling for a circular overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub color: String,
    pub fill_opacity: f64,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            fill_opacity: 0.2,
        }
    }
}
