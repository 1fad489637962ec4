use serde::{Deserialize, Serialize};

use crate::{client::ConditionsResponse, error::ClientError};

/// A geocoding match, in the provider's relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub population: Option<u64>,
}

impl PlaceCandidate {
    /// "Name, Region, Country", region omitted when unknown.
    pub fn label(&self) -> String {
        match self.admin1.as_deref() {
            Some(admin1) if !admin1.is_empty() => {
                format!("{}, {}, {}", self.name, admin1, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// What a lookup starts from: typed text, or a suggestion that already has coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTarget {
    Query(String),
    Place(PlaceCandidate),
}

impl From<&str> for LookupTarget {
    fn from(value: &str) -> Self {
        LookupTarget::Query(value.to_owned())
    }
}

impl From<String> for LookupTarget {
    fn from(value: String) -> Self {
        LookupTarget::Query(value)
    }
}

impl From<PlaceCandidate> for LookupTarget {
    fn from(value: PlaceCandidate) -> Self {
        LookupTarget::Place(value)
    }
}

/// Everything the result panel shows, already resolved to one place and one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherViewModel {
    pub location_label: String,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction_degrees: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    pub precipitation: f64,
    pub weather_code: i32,
    pub sunrise: String,
    pub sunset: String,
    pub timezone: String,
}

impl WeatherViewModel {
    /// Combine a resolved place with its conditions. Only today's sun times are used.
    pub fn from_parts(
        place: &PlaceCandidate,
        response: ConditionsResponse,
    ) -> Result<Self, ClientError> {
        let ConditionsResponse { current, daily, timezone } = response;

        let sunrise = daily.sunrise.into_iter().next().ok_or(ClientError::MissingField {
            endpoint: "forecast",
            field: "daily.sunrise",
        })?;
        let sunset = daily.sunset.into_iter().next().ok_or(ClientError::MissingField {
            endpoint: "forecast",
            field: "daily.sunset",
        })?;

        Ok(Self {
            location_label: place.label(),
            temperature: current.temperature_2m,
            apparent_temperature: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            wind_direction_degrees: current.wind_direction_10m,
            pressure: current.pressure_msl,
            cloud_cover: current.cloud_cover,
            precipitation: current.precipitation,
            weather_code: current.weather_code,
            sunrise,
            sunset,
            timezone,
        })
    }
}

/// The single state the result panel renders. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Success(WeatherViewModel),
    Failed(String),
}

impl LookupStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupStatus::Loading)
    }
}
