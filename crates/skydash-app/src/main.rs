mod render;

use anyhow::{Context, Result};
use skydash_core::Config;
use skydash_services::{Dashboard, SqliteKvStore, AVAILABLE_CITIES};
use skydash_weather::{IpApiLocator, WeatherClient};

#[tokio::main]
async fn main() -> Result<()> {
    skydash_core::init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();

    // The catalog is static; no config or network needed to list it.
    if args.first().map(String::as_str) == Some("cities") {
        println!("Available cities:");
        for name in AVAILABLE_CITIES {
            println!("  {}", name);
        }
        return Ok(());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Config error: {}", err);
            anyhow::bail!("{}", err.user_message());
        }
    };

    let store = SqliteKvStore::open(config.selection_db_path())
        .context("Failed to open the selection store")?;
    let client = WeatherClient::new(config.weather.api_key.as_str())
        .context("Failed to create the weather client")?;
    let locator = IpApiLocator::new().context("Failed to create the location client")?;
    let mut dashboard = Dashboard::new(store, client, locator);

    match args.first().map(String::as_str) {
        None => {
            dashboard.initialize().await;
            dashboard.load_current_location().await;
            render::print_dashboard(&dashboard);
        }
        Some("add") => {
            let city = args.get(1).context("Usage: skydash add <city>")?;
            dashboard.initialize().await;
            if let Some(err) = dashboard.sync_state().error() {
                println!("{}", err);
                return Ok(());
            }
            if dashboard.selection().iter().any(|c| c.name == *city) {
                println!("{} is already selected.", city);
                return Ok(());
            }
            dashboard.add_city(city).await;
            match dashboard.sync_state().error() {
                Some(err) => println!("{}", err),
                None => println!("Added {}.", city),
            }
        }
        Some("remove") => {
            let city = args.get(1).context("Usage: skydash remove <city>")?;
            dashboard.initialize().await;
            if let Some(err) = dashboard.sync_state().error() {
                println!("{}", err);
                return Ok(());
            }
            dashboard.remove_city(city);
            println!("Removed {}.", city);
        }
        Some(other) => {
            anyhow::bail!(
                "Unknown command '{}'. Commands: add <city>, remove <city>, cities",
                other
            );
        }
    }

    Ok(())
}
