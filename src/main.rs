use log::*;

use rideshare_feed::{
    feed::FetchState, Config, GenericError, HttpTripSource, LoyaltyStatus, SearchCriteria,
    TripFeed,
};

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    env_logger::Builder::new()
        .filter_module("rideshare_feed", log::LevelFilter::Trace)
        .parse_default_env()
        .init();
    trace!("Logger init with level TRACE.");

    let config = Config::from_env()?;
    trace!("Read config from env.");

    let source = HttpTripSource::new(config.trips_endpoint.clone(), config.request_timeout)?;
    let feed = TripFeed::new(source);
    let criteria = SearchCriteria {
        departure: dotenv::var("SEARCH_DEPARTURE").ok(),
        destination: dotenv::var("SEARCH_DESTINATION").ok(),
        date: dotenv::var("SEARCH_DATE").ok(),
    };

    let mut state = feed.load(&criteria).await;
    if let FetchState::Error(why) = &state {
        warn!("First load failed ({}), retrying once.", why);
        state = feed.retry(&criteria).await;
    }

    match state {
        FetchState::Success(trips) if trips.is_empty() => println!("No trips found."),
        FetchState::Success(trips) => {
            for trip in trips {
                println!(
                    "{} -> {} on {} at {} | {} | {} seats | {}{}",
                    trip.departure,
                    trip.destination,
                    trip.date,
                    trip.time,
                    trip.price,
                    trip.seats,
                    trip.driver_name,
                    if trip.verified { " (verified)" } else { "" },
                );
            }
        }
        FetchState::Error(message) => println!("Could not load trips: {}", message),
        FetchState::Idle | FetchState::Loading => {}
    }

    let status = LoyaltyStatus::compute(config.points_balance, &config.tiers);
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
