//! In-memory stand-ins for the remote providers.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    client::{ConditionsClient, ConditionsRequest, ConditionsResponse, GeocodeClient},
    error::ClientError,
    model::PlaceCandidate,
};

#[derive(Debug, Clone)]
enum Reply {
    Places(Vec<PlaceCandidate>),
    Fail,
}

/// Geocoder answering from a table, with an optional per-query delay.
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    replies: Mutex<HashMap<String, (Duration, Reply)>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, query: &str, places: Vec<PlaceCandidate>) {
        self.reply_after(query, Duration::ZERO, places);
    }

    pub fn reply_after(&self, query: &str, delay: Duration, places: Vec<PlaceCandidate>) {
        self.replies.lock().unwrap().insert(query.to_owned(), (delay, Reply::Places(places)));
    }

    pub fn fail(&self, query: &str) {
        self.replies.lock().unwrap().insert(query.to_owned(), (Duration::ZERO, Reply::Fail));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn counts(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, c)| *c).collect()
    }
}

#[async_trait]
impl GeocodeClient for FakeGeocoder {
    async fn search(
        &self,
        name: &str,
        count: u32,
        _language: &str,
    ) -> Result<Vec<PlaceCandidate>, ClientError> {
        self.calls.lock().unwrap().push((name.to_owned(), count));
        let reply = self.replies.lock().unwrap().get(name).cloned();

        let Some((delay, reply)) = reply else {
            return Ok(Vec::new());
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Places(places) => Ok(places.into_iter().take(count as usize).collect()),
            Reply::Fail => Err(ClientError::Status {
                endpoint: "geocoding",
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            }),
        }
    }
}

/// Conditions provider returning the same response for any coordinates.
#[derive(Debug)]
pub struct FakeConditions {
    response: Mutex<Option<ConditionsResponse>>,
    delays: Mutex<Vec<Duration>>,
    calls: Mutex<Vec<ConditionsRequest>>,
}

impl FakeConditions {
    pub fn returning(response: ConditionsResponse) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(response)),
            delays: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(None),
            delays: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Delays consumed one per call, in call order.
    pub fn with_delays(&self, delays: &[Duration]) {
        *self.delays.lock().unwrap() = delays.to_vec();
    }

    pub fn calls(&self) -> Vec<ConditionsRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConditionsClient for FakeConditions {
    async fn fetch(&self, request: &ConditionsRequest) -> Result<ConditionsResponse, ClientError> {
        self.calls.lock().unwrap().push(request.clone());
        let delay = {
            let mut delays = self.delays.lock().unwrap();
            if delays.is_empty() { Duration::ZERO } else { delays.remove(0) }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or(ClientError::MissingField {
                endpoint: "forecast",
                field: "current",
            })
    }
}
