use thiserror::Error;

pub mod config;
pub mod feed;
pub mod loyalty;
pub mod services;

pub use config::Config;
pub use feed::{FetchState, TripFeed, TripView};
pub use loyalty::{LoyaltyError, LoyaltyStatus, RewardTier, TierTable};
pub use services::{
    trips::{FeedError, HttpTripSource, TripSource},
    Driver, SearchCriteria, TripRecord,
};

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid value for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}
