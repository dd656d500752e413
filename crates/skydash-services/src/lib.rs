pub mod dashboard;
pub mod store;

pub use dashboard::{Dashboard, DashboardError, LoadState, AVAILABLE_CITIES, SELECTED_CITIES_KEY};
pub use store::{KeyValueStore, SqliteKvStore, StoreError};
