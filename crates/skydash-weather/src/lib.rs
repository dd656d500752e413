//! Weather lookups for Skydash
//!
//! Provides current weather via the OpenWeatherMap API, looked up by city
//! name or by geographic coordinates, plus IP-based geolocation for the
//! current-position card.

pub mod client;
pub mod location;
pub mod types;

pub use client::WeatherClient;
pub use location::{IpApiLocator, LocationProvider};
pub use types::*;
