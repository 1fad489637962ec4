use crate::{error::ClientError, model::PlaceCandidate};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Current-conditions variables requested for every lookup.
pub const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "precipitation",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "pressure_msl",
];

/// Daily variables requested for every lookup.
pub const DAILY_FIELDS: &[&str] = &["sunrise", "sunset"];

/// Let the provider pick the timezone from the coordinates.
pub const AUTO_TIMEZONE: &str = "auto";

/// Free-text place search.
#[async_trait]
pub trait GeocodeClient: Send + Sync + Debug {
    /// Returns an empty list, not an error, when nothing matches.
    async fn search(
        &self,
        name: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<PlaceCandidate>, ClientError>;
}

/// Current conditions and sun times for a coordinate pair.
#[async_trait]
pub trait ConditionsClient: Send + Sync + Debug {
    async fn fetch(&self, request: &ConditionsRequest) -> Result<ConditionsResponse, ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub current: Vec<String>,
    pub daily: Vec<String>,
    pub timezone: String,
}

impl ConditionsRequest {
    /// The standard request for a resolved place.
    pub fn for_place(place: &PlaceCandidate) -> Self {
        Self {
            latitude: place.latitude,
            longitude: place.longitude,
            current: CURRENT_FIELDS.iter().map(|f| f.to_string()).collect(),
            daily: DAILY_FIELDS.iter().map(|f| f.to_string()).collect(),
            timezone: AUTO_TIMEZONE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub weather_code: i32,
    pub cloud_cover: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub pressure_msl: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySunTimes {
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionsResponse {
    pub current: CurrentConditions,
    pub daily: DailySunTimes,
    pub timezone: String,
}
