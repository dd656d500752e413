//! Plain-text rendering of the dashboard state.

use skydash_services::{Dashboard, KeyValueStore};
use skydash_weather::{CityWeather, LocationProvider};

/// One weather card: place name, temperature, condition, icon URL.
pub fn city_card(city: &CityWeather) -> String {
    format!(
        "{}\n  Temperature: {}°C\n  {}\n  {}",
        city.name,
        city.weather.temperature,
        city.weather.description,
        city.weather.icon_url()
    )
}

pub fn print_dashboard<S: KeyValueStore, L: LocationProvider>(dashboard: &Dashboard<S, L>) {
    println!("Weather Dashboard");
    println!("=================");

    if let Some(err) = dashboard.location_state().error() {
        println!("\n{}", err);
    }
    if let Some(current) = dashboard.current_location() {
        println!("\nCurrent location");
        println!("{}", city_card(current));
    }

    println!("\nYour Cities");
    if let Some(err) = dashboard.sync_state().error() {
        println!("{}", err);
    } else if dashboard.selection().is_empty() {
        println!("No cities selected yet.");
    }
    for city in dashboard.selection() {
        println!("{}", city_card(city));
    }

    println!("\nAdd a City");
    let available = dashboard.available_to_add();
    if available.is_empty() {
        println!("All available cities are selected.");
    } else {
        for name in available {
            println!("  {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skydash_weather::Weather;

    #[test]
    fn test_city_card_layout() {
        let card = city_card(&CityWeather {
            name: "Auckland, NZ".to_string(),
            weather: Weather {
                temperature: 14,
                description: "scattered clouds".to_string(),
                icon: "03d".to_string(),
            },
        });

        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "Auckland, NZ");
        assert_eq!(lines[1], "  Temperature: 14°C");
        assert_eq!(lines[2], "  scattered clouds");
        assert_eq!(lines[3], "  https://openweathermap.org/img/wn/03d@2x.png");
    }
}
