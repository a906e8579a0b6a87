use std::time::Duration;

use async_trait::async_trait;
use log::*;
use serde::Deserialize;
use thiserror::Error;

use super::{SearchCriteria, TripRecord};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to fetch trips: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to fetch trips: server returned HTTP {status}")]
    Status { status: u16, message: Option<String> },
    #[error("failed to fetch trips: malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("failed to fetch trips: server reported failure")]
    Rejected { message: Option<String> },
}

impl FeedError {
    /// The server's own message when it sent one, otherwise the error text.
    pub fn user_message(&self) -> String {
        match self {
            FeedError::Status {
                message: Some(message),
                ..
            }
            | FeedError::Rejected {
                message: Some(message),
            } => message.clone(),
            _ => self.to_string(),
        }
    }
}

#[async_trait]
pub trait TripSource {
    async fn fetch_trips(&self, criteria: &SearchCriteria) -> Result<Vec<TripRecord>, FeedError>;
}

#[derive(Deserialize)]
struct TripsEnvelope {
    success: bool,
    #[serde(default)]
    trips: Vec<TripRecord>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Turn a raw trips response into records or a classified failure.
pub fn decode_envelope(status: u16, body: &str) -> Result<Vec<TripRecord>, FeedError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| non_blank(b.message));
        return Err(FeedError::Status { status, message });
    }

    let envelope: TripsEnvelope = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(FeedError::Rejected {
            message: non_blank(envelope.message),
        });
    }
    Ok(envelope.trips)
}

pub struct HttpTripSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTripSource {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTripSource { client, endpoint })
    }
}

#[async_trait]
impl TripSource for HttpTripSource {
    async fn fetch_trips(&self, criteria: &SearchCriteria) -> Result<Vec<TripRecord>, FeedError> {
        let mut request = self.client.get(&self.endpoint);
        if !criteria.is_empty() {
            request = request.query(&criteria.query_pairs());
        }

        info!("Requesting trips from {}.", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("Received {} byte trips response with status {}.", body.len(), status);

        let trips = decode_envelope(status.as_u16(), &body)?;
        info!("Fetched {} trips.", trips.len());
        Ok(trips)
    }
}
