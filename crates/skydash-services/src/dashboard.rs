//! The selection/sync state machine behind the dashboard.
//!
//! Owns the in-memory list of selected cities with their last-fetched
//! weather, orchestrates fetch-on-load and fetch-on-add, and keeps the
//! persisted name list in step with the in-memory selection. The
//! current-location flow is independent of the selection and has its own
//! result slot, so a geolocation failure never clobbers a selection error
//! (and vice versa).

use crate::store::KeyValueStore;
use skydash_weather::{
    CityWeather, LocationError, LocationProvider, WeatherClient, WeatherError,
};
use thiserror::Error;

/// Fixed storage key for the persisted city-name list (JSON array of strings).
pub const SELECTED_CITIES_KEY: &str = "selectedCities";

/// Fixed catalog of cities offered for selection.
pub const AVAILABLE_CITIES: [&str; 6] = [
    "Los Angeles, CA, US",
    "San Francisco, CA, US",
    "Austin, TX, US",
    "Lisbon, PT",
    "Auckland, NZ",
    "Columbus, Ohio",
];

/// Errors surfaced through the dashboard's result slots.
///
/// The `Display` strings are the user-facing messages; the rendering layer
/// shows them verbatim and nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// A single city lookup failed (during startup load or an add).
    #[error("Failed to fetch weather for {city}")]
    LookupFailed { city: String },

    /// The startup batch load failed without a specific city to blame.
    #[error("Failed to load saved cities")]
    BatchLoadFailed,

    #[error("Geolocation is not available on this system")]
    GeolocationUnavailable,

    #[error("Unable to access your location")]
    GeolocationDenied,

    /// Transport-level failure talking to the weather service.
    #[error("Error fetching weather data: {0}")]
    Network(String),
}

/// Per-flow load state. A new `Loading` may re-enter from `Ready` or
/// `Failed`; only the most recent completed operation is reflected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(DashboardError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    /// The error of the most recent failed operation, if any.
    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// The dashboard state machine.
///
/// All mutating operations take `&mut self` and run to completion
/// (including their persistence side effect) before the next begins; the
/// only internal concurrency is the startup fan-out in [`initialize`].
///
/// [`initialize`]: Dashboard::initialize
pub struct Dashboard<S, L> {
    store: S,
    client: WeatherClient,
    locator: L,
    selection: Vec<CityWeather>,
    current_location: Option<CityWeather>,
    sync_state: LoadState,
    location_state: LoadState,
}

impl<S: KeyValueStore, L: LocationProvider> Dashboard<S, L> {
    pub fn new(store: S, client: WeatherClient, locator: L) -> Self {
        Self {
            store,
            client,
            locator,
            selection: Vec::new(),
            current_location: None,
            sync_state: LoadState::Idle,
            location_state: LoadState::Idle,
        }
    }

    /// Populate the selection from the persisted name list.
    ///
    /// An empty or absent list completes immediately with an empty
    /// selection and no network calls. Otherwise one lookup per name runs
    /// concurrently and all of them are joined: a failed lookup does not
    /// cancel its siblings, but any failure fails the whole batch and the
    /// selection stays empty - already-resolved results are discarded.
    pub async fn initialize(&mut self) {
        let names = self.load_persisted_names();
        if names.is_empty() {
            self.sync_state = LoadState::Ready;
            return;
        }

        self.sync_state = LoadState::Loading;
        tracing::info!("Loading weather for {} saved cities", names.len());

        let mut handles = Vec::with_capacity(names.len());
        for name in names {
            let client = self.client.clone();
            handles.push(tokio::spawn(async move {
                match client.current_by_name(&name).await {
                    Ok(weather) => Ok(CityWeather { name, weather }),
                    Err(err) => Err(lookup_error(&name, err)),
                }
            }));
        }

        let mut fetched = Vec::with_capacity(handles.len());
        let mut first_failure: Option<DashboardError> = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(city)) => fetched.push(city),
                Ok(Err(err)) => {
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
                Err(err) => {
                    tracing::error!("City lookup task failed: {}", err);
                    if first_failure.is_none() {
                        first_failure = Some(DashboardError::BatchLoadFailed);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => self.sync_state = LoadState::Failed(err),
            None => {
                self.selection = fetched;
                self.sync_state = LoadState::Ready;
            }
        }
    }

    /// Add a city to the selection.
    ///
    /// Idempotent: a name already present is a no-op with no network call
    /// and no state change. On success the city is appended at the end and
    /// the name list is persisted; on failure the selection and the
    /// persisted list are left untouched.
    pub async fn add_city(&mut self, name: &str) {
        if self.selection.iter().any(|city| city.name == name) {
            tracing::debug!("{} already selected", name);
            return;
        }

        self.sync_state = LoadState::Loading;
        match self.client.current_by_name(name).await {
            Ok(weather) => {
                self.selection.push(CityWeather {
                    name: name.to_string(),
                    weather,
                });
                self.persist_selection();
                self.sync_state = LoadState::Ready;
            }
            Err(err) => {
                self.sync_state = LoadState::Failed(lookup_error(name, err));
            }
        }
    }

    /// Remove a city from the selection and persist the updated name list.
    ///
    /// Always succeeds (removing an absent name is a no-op) and does not
    /// touch either load/error slot.
    pub fn remove_city(&mut self, name: &str) {
        self.selection.retain(|city| city.name != name);
        self.persist_selection();
    }

    /// Fetch weather for the device's current position.
    ///
    /// Independent of the selection flow; the outcome lands in its own
    /// slot. On any failure (geolocation unavailable or denied, lookup
    /// failure) the current-location card stays unset.
    pub async fn load_current_location(&mut self) {
        self.location_state = LoadState::Loading;

        let coords = match self.locator.current_position().await {
            Ok(coords) => coords,
            Err(err) => {
                self.location_state = LoadState::Failed(location_error(err));
                return;
            }
        };

        match self.client.current_by_coords(coords).await {
            Ok(city) => {
                self.current_location = Some(city);
                self.location_state = LoadState::Ready;
            }
            Err(err) => {
                self.location_state = LoadState::Failed(lookup_error("your location", err));
            }
        }
    }

    /// Catalog cities not currently selected, in catalog order.
    /// Computed on demand; the selection is the single source of truth.
    pub fn available_to_add(&self) -> Vec<&'static str> {
        AVAILABLE_CITIES
            .iter()
            .copied()
            .filter(|name| !self.selection.iter().any(|city| city.name == *name))
            .collect()
    }

    pub fn selection(&self) -> &[CityWeather] {
        &self.selection
    }

    pub fn current_location(&self) -> Option<&CityWeather> {
        self.current_location.as_ref()
    }

    pub fn sync_state(&self) -> &LoadState {
        &self.sync_state
    }

    pub fn location_state(&self) -> &LoadState {
        &self.location_state
    }

    fn load_persisted_names(&self) -> Vec<String> {
        let raw = match self.store.get(SELECTED_CITIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!("Failed to read saved city list: {}", err);
                return Vec::new();
            }
        };

        let names: Vec<String> = match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!("Ignoring malformed saved city list: {}", err);
                return Vec::new();
            }
        };

        // Names are unique within a selection; drop duplicates we didn't write.
        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    }

    fn persist_selection(&self) {
        let names: Vec<&str> = self
            .selection
            .iter()
            .map(|city| city.name.as_str())
            .collect();

        match serde_json::to_string(&names) {
            Ok(json) => {
                // Storage writes are best-effort; the in-memory selection
                // stays authoritative.
                if let Err(err) = self.store.set(SELECTED_CITIES_KEY, &json) {
                    tracing::warn!("Failed to persist city selection: {}", err);
                }
            }
            Err(err) => {
                tracing::warn!("Failed to encode city selection: {}", err);
            }
        }
    }
}

fn lookup_error(city: &str, err: WeatherError) -> DashboardError {
    match err {
        WeatherError::Network(e) => DashboardError::Network(e.to_string()),
        WeatherError::Api { .. } | WeatherError::Parse(_) => DashboardError::LookupFailed {
            city: city.to_string(),
        },
    }
}

fn location_error(err: LocationError) -> DashboardError {
    match err {
        LocationError::PermissionDenied => DashboardError::GeolocationDenied,
        LocationError::ServiceUnavailable | LocationError::Timeout | LocationError::Other(_) => {
            DashboardError::GeolocationUnavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteKvStore;
    use skydash_weather::Coordinates;

    struct NoLocation;

    impl LocationProvider for NoLocation {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::ServiceUnavailable)
        }
    }

    fn empty_dashboard() -> Dashboard<SqliteKvStore, NoLocation> {
        let store = SqliteKvStore::in_memory().unwrap();
        let client = WeatherClient::new("test-key").unwrap();
        Dashboard::new(store, client, NoLocation)
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DashboardError::LookupFailed {
                city: "Lisbon, PT".to_string()
            }
            .to_string(),
            "Failed to fetch weather for Lisbon, PT"
        );
        assert_eq!(
            DashboardError::GeolocationDenied.to_string(),
            "Unable to access your location"
        );
        assert_eq!(
            DashboardError::GeolocationUnavailable.to_string(),
            "Geolocation is not available on this system"
        );
    }

    #[test]
    fn test_load_state_accessors() {
        assert_eq!(LoadState::default(), LoadState::Idle);
        assert!(LoadState::Loading.is_loading());
        assert!(LoadState::Ready.is_ready());
        assert_eq!(LoadState::Ready.error(), None);

        let failed = LoadState::Failed(DashboardError::BatchLoadFailed);
        assert_eq!(failed.error(), Some(&DashboardError::BatchLoadFailed));
    }

    #[test]
    fn test_available_to_add_starts_with_full_catalog() {
        let dashboard = empty_dashboard();
        assert_eq!(dashboard.available_to_add(), AVAILABLE_CITIES.to_vec());
    }

    #[test]
    fn test_location_error_mapping() {
        assert_eq!(
            location_error(LocationError::PermissionDenied),
            DashboardError::GeolocationDenied
        );
        assert_eq!(
            location_error(LocationError::Timeout),
            DashboardError::GeolocationUnavailable
        );
    }

    #[tokio::test]
    async fn test_initialize_with_empty_store_is_ready_without_network() {
        let mut dashboard = empty_dashboard();
        dashboard.initialize().await;

        assert!(dashboard.sync_state().is_ready());
        assert!(dashboard.selection().is_empty());
    }

    #[tokio::test]
    async fn test_current_location_unavailable_sets_own_slot_only() {
        let mut dashboard = empty_dashboard();
        dashboard.load_current_location().await;

        assert_eq!(
            dashboard.location_state().error(),
            Some(&DashboardError::GeolocationUnavailable)
        );
        assert!(dashboard.current_location().is_none());
        // The selection flow is untouched.
        assert_eq!(dashboard.sync_state(), &LoadState::Idle);
    }
}
