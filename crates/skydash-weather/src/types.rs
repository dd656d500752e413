use serde::{Deserialize, Serialize};

/// A current-weather snapshot for one place. Immutable once fetched;
/// re-fetching replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    /// Temperature in °C, rounded to the nearest integer
    pub temperature: i32,
    /// Human-readable condition, e.g. "scattered clouds"
    pub description: String,
    /// OpenWeatherMap icon id, e.g. "04d"
    pub icon: String,
}

impl Weather {
    /// URL of the condition icon image for this snapshot
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// Weather for a named place. `name` is the unique key within a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWeather {
    pub name: String,
    pub weather: Weather,
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API error ({code}): {message}")]
    Api { code: i64, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_url_format() {
        let weather = Weather {
            temperature: 18,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        };
        assert_eq!(
            weather.icon_url(),
            "https://openweathermap.org/img/wn/01d@2x.png"
        );
    }

    #[test]
    fn test_city_weather_serialization() {
        let city = CityWeather {
            name: "Lisbon, PT".to_string(),
            weather: Weather {
                temperature: 22,
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
            },
        };

        let json = serde_json::to_string(&city).unwrap();
        assert!(json.contains("Lisbon, PT"));
        assert!(json.contains("\"temperature\":22"));

        let back: CityWeather = serde_json::from_str(&json).unwrap();
        assert_eq!(back, city);
    }

    #[test]
    fn test_location_error_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
        assert!(LocationError::Other("no adapter".to_string())
            .to_string()
            .contains("no adapter"));
    }
}
