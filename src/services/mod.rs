use derive_more::Display;
use rust_decimal::Decimal;
use serde::Deserialize;

pub mod trips;

/// One ride offering as returned by the trips endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub departure: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: Decimal,
    #[serde(alias = "seats")]
    pub available_seats: u32,
    pub driver: Driver,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vehicle: String,
}

/// Displays as the driver's full name, `"first last"`.
#[derive(Debug, Clone, PartialEq, Display, Deserialize)]
#[serde(rename_all = "camelCase")]
#[display(fmt = "{} {}", first_name, last_name)]
pub struct Driver {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Search-form inputs. Empty fields are not forwarded to the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("departure", &self.departure),
            ("destination", &self.destination),
            ("date", &self.date),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}
