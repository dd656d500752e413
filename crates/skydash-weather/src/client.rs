//! OpenWeatherMap current-conditions client.
//!
//! Success is signalled by the `cod` field in the response body, not the
//! transport status; error bodies carry `cod` as a string (e.g. `"404"`).

use crate::types::{CityWeather, Coordinates, Weather, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for current-weather lookups by city name or coordinates
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: OPENWEATHER_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different API root (tests use a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Current weather for a free-text city/region string
    pub async fn current_by_name(&self, city: &str) -> Result<Weather, WeatherError> {
        tracing::debug!("Fetching weather for {}", city);

        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let conditions: CurrentConditions = response.json().await?;
        conditions.into_weather()
    }

    /// Current weather at a coordinate pair; the response supplies the
    /// display name of the place
    pub async fn current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<CityWeather, WeatherError> {
        tracing::debug!(
            "Fetching weather at {}, {}",
            coords.latitude,
            coords.longitude
        );

        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let conditions: CurrentConditions = response.json().await?;
        conditions.into_located()
    }
}

/// `cod` arrives as a number on success and a string on API errors
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiCode {
    Number(i64),
    Text(String),
}

impl ApiCode {
    fn value(&self) -> i64 {
        match self {
            ApiCode::Number(n) => *n,
            ApiCode::Text(s) => s.parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    cod: ApiCode,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    main: Option<MainReadings>,
    #[serde(default)]
    weather: Option<Vec<ConditionEntry>>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
    icon: String,
}

impl CurrentConditions {
    fn into_weather(self) -> Result<Weather, WeatherError> {
        let code = self.cod.value();
        if code != 200 {
            return Err(WeatherError::Api {
                code,
                message: self
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let main = self
            .main
            .ok_or_else(|| WeatherError::Parse("missing main readings".to_string()))?;
        let entry = self
            .weather
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| WeatherError::Parse("missing weather conditions".to_string()))?;

        Ok(Weather {
            temperature: main.temp.round() as i32,
            description: entry.description,
            icon: entry.icon,
        })
    }

    fn into_located(mut self) -> Result<CityWeather, WeatherError> {
        let name = self.name.take();
        let weather = self.into_weather()?;
        let name =
            name.ok_or_else(|| WeatherError::Parse("missing location name".to_string()))?;
        Ok(CityWeather { name, weather })
    }
}
