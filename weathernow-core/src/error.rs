use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to one of the remote providers.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to send request to {endpoint}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

/// The two user-visible ways a lookup can fail.
///
/// The `Display` text is exactly what the result panel shows.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("City not found. Please try another city.")]
    NotFound,

    #[error("Failed to fetch weather data. Please try again.")]
    Transport(#[from] ClientError),
}
