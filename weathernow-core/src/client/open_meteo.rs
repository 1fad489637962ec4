use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{config::Config, error::ClientError, model::PlaceCandidate};

use super::{ConditionsClient, ConditionsRequest, ConditionsResponse, GeocodeClient};

const GEOCODING: &str = "geocoding";
const FORECAST: &str = "forecast";

type QueryParams = Vec<(&'static str, String)>;

/// Open-Meteo geocoding + forecast APIs. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, geocoding_url: String, forecast_url: String) -> Self {
        Self {
            http,
            geocoding_url,
            forecast_url,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(concat!("weathernow/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            http,
            config.endpoints.geocoding.clone(),
            config.endpoints.forecast.clone(),
        ))
    }

    async fn get(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, ClientError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Request { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ClientError::Request { endpoint, source })?;

        check_status(endpoint, status, body)
    }
}

fn geocoding_query(name: &str, count: u32, language: &str) -> QueryParams {
    vec![
        ("name", name.to_owned()),
        ("count", count.to_string()),
        ("language", language.to_owned()),
        ("format", "json".to_owned()),
    ]
}

fn forecast_query(request: &ConditionsRequest) -> QueryParams {
    vec![
        ("latitude", request.latitude.to_string()),
        ("longitude", request.longitude.to_string()),
        ("current", request.current.join(",")),
        ("daily", request.daily.join(",")),
        ("timezone", request.timezone.clone()),
    ]
}

/// Pass the body through on success; anything else is an error, whatever the body holds.
fn check_status(
    endpoint: &'static str,
    status: StatusCode,
    body: String,
) -> Result<String, ClientError> {
    if !status.is_success() {
        return Err(ClientError::Status {
            endpoint,
            status,
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<PlaceCandidate>>,
}

fn parse_geocoding(body: &str) -> Result<Vec<PlaceCandidate>, ClientError> {
    let parsed: GeocodingResponse =
        serde_json::from_str(body).map_err(|source| ClientError::Parse {
            endpoint: GEOCODING,
            source,
        })?;

    Ok(parsed.results.unwrap_or_default())
}

fn parse_conditions(body: &str) -> Result<ConditionsResponse, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Parse {
        endpoint: FORECAST,
        source,
    })
}

#[async_trait]
impl GeocodeClient for OpenMeteoClient {
    #[instrument(skip(self), level = "debug")]
    async fn search(
        &self,
        name: &str,
        count: u32,
        language: &str,
    ) -> Result<Vec<PlaceCandidate>, ClientError> {
        let query = geocoding_query(name, count, language);
        let body = self.get(GEOCODING, &self.geocoding_url, &query).await?;

        let candidates = parse_geocoding(&body)?;
        debug!(found = candidates.len(), "geocoding finished");
        Ok(candidates)
    }
}

#[async_trait]
impl ConditionsClient for OpenMeteoClient {
    #[instrument(
        skip(self, request),
        fields(lat = request.latitude, lon = request.longitude),
        level = "debug"
    )]
    async fn fetch(&self, request: &ConditionsRequest) -> Result<ConditionsResponse, ClientError> {
        let query = forecast_query(request);
        let body = self.get(FORECAST, &self.forecast_url, &query).await?;

        parse_conditions(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
