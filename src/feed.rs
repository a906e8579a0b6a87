//! Trip discovery: fetch, normalize and publish trips for display.

use log::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;

use crate::services::{trips::TripSource, SearchCriteria, TripRecord};

pub const DEFAULT_AVATAR: &str = "/images/default-avatar.png";
pub const PLACEHOLDER_RATING: f32 = 4.8;
/// Number of trips shown by the landing-page teaser.
pub const TEASER_LIMIT: usize = 3;

/// Display-ready projection of a [`TripRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripView {
    pub id: String,
    pub departure: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: Decimal,
    pub seats: u32,
    pub driver_name: String,
    pub driver_photo: String,
    pub verified: bool,
    pub rating: f32,
    pub description: String,
    pub vehicle: String,
}

impl TripView {
    pub fn is_full(&self) -> bool {
        self.seats == 0
    }
}

pub fn normalize_trip(record: &TripRecord) -> TripView {
    let driver_photo = record
        .driver
        .photo
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_AVATAR)
        .to_string();

    TripView {
        id: record.id.clone(),
        departure: record.departure.clone(),
        destination: record.destination.clone(),
        date: record.date.clone(),
        time: record.time.clone(),
        price: record.price,
        seats: record.available_seats,
        driver_name: record.driver.to_string(),
        driver_photo,
        verified: record.driver.verified,
        rating: PLACEHOLDER_RATING,
        description: record.description.clone(),
        vehicle: record.vehicle.clone(),
    }
}

/// One view per record, in source order. Nothing is filtered out.
pub fn normalize_trips(records: &[TripRecord]) -> Vec<TripView> {
    records.iter().map(normalize_trip).collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<TripView>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn trips(&self) -> Option<&[TripView]> {
        match self {
            FetchState::Success(trips) => Some(trips.as_slice()),
            _ => None,
        }
    }

    /// A successful fetch that found nothing. Not an error.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FetchState::Success(trips) if trips.is_empty())
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Resets the feed to `Idle` if a fetch cycle is dropped before it settles.
struct InFlight<'a> {
    state: &'a watch::Sender<FetchState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, next: FetchState) {
        self.settled = true;
        // Receivers may be gone by now; send_replace stores regardless.
        self.state.send_replace(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Trip load dropped before settling, back to Idle.");
            self.state.send_replace(FetchState::Idle);
        }
    }
}

pub struct TripFeed<S> {
    source: S,
    limit: Option<usize>,
    state: watch::Sender<FetchState>,
}

impl<S: TripSource> TripFeed<S> {
    pub fn new(source: S) -> Self {
        TripFeed {
            source,
            limit: None,
            state: watch::Sender::new(FetchState::Idle),
        }
    }

    /// A feed that only ever exposes the first `limit` trips.
    pub fn bounded(source: S, limit: usize) -> Self {
        TripFeed {
            limit: Some(limit),
            ..TripFeed::new(source)
        }
    }

    pub fn teaser(source: S) -> Self {
        TripFeed::bounded(source, TEASER_LIMIT)
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Run one fetch cycle and return the state it settled in.
    ///
    /// While a cycle is in flight further calls issue no request and just
    /// report `Loading`.
    pub async fn load(&self, criteria: &SearchCriteria) -> FetchState {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = FetchState::Loading;
                true
            }
        });
        if !started {
            debug!("Trip load requested while already loading, ignoring.");
            return FetchState::Loading;
        }
        debug!("Trip feed entered Loading.");
        let in_flight = InFlight {
            state: &self.state,
            settled: false,
        };

        let next = match self.source.fetch_trips(criteria).await {
            Ok(records) => {
                let mut views = normalize_trips(&records);
                if let Some(limit) = self.limit {
                    views.truncate(limit);
                }
                debug!("Trip feed entered Success with {} trips.", views.len());
                FetchState::Success(views)
            }
            Err(why) => {
                warn!("Trip fetch failed: {}", why);
                FetchState::Error(why.user_message())
            }
        };

        in_flight.settle(next.clone());
        next
    }

    /// Start a fresh fetch cycle, typically after an error.
    pub async fn retry(&self, criteria: &SearchCriteria) -> FetchState {
        trace!("Retrying trip load.");
        self.load(criteria).await
    }
}
