//! Resolve a place, fetch its conditions, build the view model.
//!
//! A lookup is split into [`WeatherLookupOrchestrator::begin`], the
//! spawnable [`LookupTicket::run`] and [`WeatherLookupOrchestrator::finish`],
//! so the caller can keep handling input while the network calls are in
//! flight. Only the outcome of the most recently begun lookup is applied.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    client::{ConditionsClient, ConditionsRequest, GeocodeClient},
    error::LookupError,
    model::{LookupStatus, LookupTarget, PlaceCandidate, WeatherViewModel},
};

#[derive(Debug)]
pub struct WeatherLookupOrchestrator {
    geocoder: Arc<dyn GeocodeClient>,
    conditions: Arc<dyn ConditionsClient>,
    language: String,
    status: LookupStatus,
    generation: u64,
}

/// One lookup, detached from the orchestrator so it can run on its own task.
#[derive(Debug)]
pub struct LookupTicket {
    generation: u64,
    target: LookupTarget,
    geocoder: Arc<dyn GeocodeClient>,
    conditions: Arc<dyn ConditionsClient>,
    language: String,
}

#[derive(Debug)]
pub struct LookupOutcome {
    pub generation: u64,
    pub result: Result<WeatherViewModel, LookupError>,
}

impl WeatherLookupOrchestrator {
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        conditions: Arc<dyn ConditionsClient>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            geocoder,
            conditions,
            language: language.into(),
            status: LookupStatus::Idle,
            generation: 0,
        }
    }

    pub fn status(&self) -> &LookupStatus {
        &self.status
    }

    /// Enter `Loading`, dropping whatever was shown before.
    pub fn begin(&mut self, target: impl Into<LookupTarget>) -> LookupTicket {
        self.generation += 1;
        self.status = LookupStatus::Loading;

        LookupTicket {
            generation: self.generation,
            target: target.into(),
            geocoder: Arc::clone(&self.geocoder),
            conditions: Arc::clone(&self.conditions),
            language: self.language.clone(),
        }
    }

    /// Apply an outcome unless a newer lookup has begun since. Returns whether it was applied.
    pub fn finish(&mut self, outcome: LookupOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "dropping superseded lookup"
            );
            return false;
        }

        self.status = match outcome.result {
            Ok(view) => LookupStatus::Success(view),
            Err(err) => {
                warn!(error = ?err, "weather lookup failed");
                LookupStatus::Failed(err.to_string())
            }
        };
        true
    }

    /// Run a whole lookup in place.
    pub async fn resolve(&mut self, target: impl Into<LookupTarget>) -> &LookupStatus {
        let outcome = self.begin(target).run().await;
        self.finish(outcome);
        &self.status
    }
}

impl LookupTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target(&self) -> &LookupTarget {
        &self.target
    }

    pub async fn run(self) -> LookupOutcome {
        let result = self.lookup().await;
        LookupOutcome {
            generation: self.generation,
            result,
        }
    }

    async fn lookup(&self) -> Result<WeatherViewModel, LookupError> {
        let place = match &self.target {
            LookupTarget::Place(place) => place.clone(),
            LookupTarget::Query(query) => self.geocode(query).await?,
        };
        debug!(
            place = %place.label(),
            lat = place.latitude,
            lon = place.longitude,
            "fetching conditions"
        );

        let response = self.conditions.fetch(&ConditionsRequest::for_place(&place)).await?;
        Ok(WeatherViewModel::from_parts(&place, response)?)
    }

    async fn geocode(&self, query: &str) -> Result<PlaceCandidate, LookupError> {
        debug!(%query, "resolving city");
        let candidates = self.geocoder.search(query, 1, &self.language).await?;
        candidates.into_iter().next().ok_or(LookupError::NotFound)
    }
}
