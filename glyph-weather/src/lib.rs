//! Weather Item for Glyph
//!
//! Provides:
//! - `WeatherItem`: current temperature and sky condition for a city
//! - OpenWeatherMap response parsing

mod response;
mod weather;

use glyph_plugin::Manifest;

pub use response::WeatherResponse;
pub use weather::{WeatherItem, WeatherUnits, BASE_URL};

/// Load the weather item into a manifest
pub fn load_weather_items(manifest: Manifest) -> Manifest {
    manifest.with_item::<WeatherItem>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_plugin::{discover, DiscoveryOptions};

    #[test]
    fn test_weather_item_is_discovered() {
        let manifest = load_weather_items(Manifest::new());
        let items = discover(&manifest, "", &DiscoveryOptions::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items["WeatherItem"].module(), "glyph_weather::weather");
    }
}
