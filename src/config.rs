use std::{fmt::Display, str::FromStr, time::Duration};

use log::*;

use crate::{loyalty::TierTable, AppError, GenericError};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub trips_endpoint: String,
    pub request_timeout: Duration,
    pub tiers: TierTable,
    pub points_balance: u64,
}

impl Config {
    /// Read settings from the environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, GenericError> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GenericError> {
        let trips_endpoint = lookup("TRIPS_ENDPOINT").ok_or(AppError::InvalidSetting {
            key: "TRIPS_ENDPOINT",
            reason: "not set".into(),
        })?;

        let timeout_secs = parse_or(
            "TRIPS_TIMEOUT_SECS",
            lookup("TRIPS_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let points_balance = parse_or("POINTS_BALANCE", lookup("POINTS_BALANCE"), 0)?;

        let tiers = match lookup("LOYALTY_TIERS_FILE") {
            Some(path) => {
                trace!("Loading tier table from {}.", path);
                TierTable::from_json(&std::fs::read_to_string(&path)?)?
            }
            None => TierTable::standard(),
        };

        Ok(Config {
            trips_endpoint,
            request_timeout: Duration::from_secs(timeout_secs),
            tiers,
            points_balance,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| AppError::InvalidSetting {
            key,
            reason: e.to_string(),
        }),
        None => {
            debug!("{} not set, using default.", key);
            Ok(default)
        }
    }
}
