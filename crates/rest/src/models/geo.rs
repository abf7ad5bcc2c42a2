use serde::{Deserialize, Serialize};

/// A geocoded address stored as a GeoJSON point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    /// Always `Point`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`.
    pub coordinates: Vec<f64>,
    /// `street, city, state zipcode, country`.
    pub formatted_address: String,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zipcode: String,
    /// Country code.
    pub country: String,
}

impl Location {
    /// GeoJSON geometry type used for every location.
    pub const POINT: &'static str = "Point";

    /// Builds a point location from its address parts.
    pub fn point(
        latitude: f64,
        longitude: f64,
        street: &str,
        city: &str,
        state: &str,
        zipcode: &str,
        country: &str,
    ) -> Self {
        Self {
            kind: Self::POINT.to_string(),
            coordinates: vec![longitude, latitude],
            formatted_address: format!("{}, {}, {} {}, {}", street, city, state, zipcode, country),
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zipcode: zipcode.to_string(),
            country: country.to_string(),
        }
    }
}
