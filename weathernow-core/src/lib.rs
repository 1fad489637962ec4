//! Core library for the `weathernow` tool.
//!
//! This crate defines:
//! - Clients for the geocoding and current-conditions providers
//! - Debounced city suggestions and keyboard selection over them
//! - The resolve-then-fetch lookup sequence and its view model
//! - Pure formatting helpers and on-disk configuration
//!
//! It is used by `weathernow-cli`, but nothing here depends on a terminal.

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod present;
pub mod selection;
pub mod session;
pub mod suggest;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ConditionsClient, GeocodeClient, OpenMeteoClient};
pub use config::Config;
pub use error::{ClientError, LookupError};
pub use lookup::{LookupOutcome, LookupTicket, WeatherLookupOrchestrator};
pub use model::{LookupStatus, LookupTarget, PlaceCandidate, WeatherViewModel};
pub use selection::{Action, Key};
pub use session::WeatherSession;
pub use suggest::{SuggestionBatch, SuggestionController, SuggestionSettings, SuggestionState};
