//! Current-position lookup.
//!
//! `LocationProvider` is the seam the dashboard depends on; the production
//! implementation geolocates by IP via ipapi.co (free, no API key), so a
//! permission prompt never occurs. Providers backed by an OS location
//! service can surface `PermissionDenied`.

use crate::types::{Coordinates, LocationError};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const IPAPI_URL: &str = "https://ipapi.co/json/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One-shot source of the device's current position
pub trait LocationProvider {
    /// Request the current position. No continuous tracking.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// IP-based geolocation via ipapi.co
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: Arc<Client>,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl IpApiLocator {
    pub fn new() -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LocationError::Other(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: IPAPI_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl LocationProvider for IpApiLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocationError::Timeout
                } else {
                    LocationError::ServiceUnavailable
                }
            })?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        if body.error {
            return Err(LocationError::Other(
                body.reason.unwrap_or_else(|| "geolocation failed".to_string()),
            ));
        }

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => {
                tracing::info!("Got location: {}, {}", latitude, longitude);
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(LocationError::ServiceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_current_position_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 38.72,
                "longitude": -9.14,
                "city": "Lisbon"
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::new().unwrap().with_endpoint(server.uri());
        let coords = locator.current_position().await.unwrap();

        assert_eq!(coords.latitude, 38.72);
        assert_eq!(coords.longitude, -9.14);
    }

    #[tokio::test]
    async fn test_missing_coordinates_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "Lisbon"
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::new().unwrap().with_endpoint(server.uri());
        let err = locator.current_position().await.unwrap_err();

        assert!(matches!(err, LocationError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn test_upstream_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": true,
                "reason": "RateLimited"
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::new().unwrap().with_endpoint(server.uri());
        let err = locator.current_position().await.unwrap_err();

        match err {
            LocationError::Other(reason) => assert_eq!(reason, "RateLimited"),
            other => panic!("expected Other, got {:?}", other),
        }
    }
}
