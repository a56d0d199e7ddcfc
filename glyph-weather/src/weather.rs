//! Weather item

use crate::response::WeatherResponse;
use glyph_plugin::prelude::*;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Temperature scale, named the way users write it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherUnits {
    Kelvin,
    Metric,
    Imperial,
}

impl WeatherUnits {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kelvin" => Some(Self::Kelvin),
            "metric" => Some(Self::Metric),
            "imperial" => Some(Self::Imperial),
            _ => None,
        }
    }

    /// Value of the `units` query parameter
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Kelvin => "standard",
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

#[derive(Debug)]
pub struct WeatherItem {
    api_key: String,
    city_name: String,
    state_code: Option<String>,
    country_code: Option<String>,
    units: WeatherUnits,
    temperature: bool,
    condition: bool,
    timeout: Duration,
}

static WEATHER_OPTIONS: [OptionMeta; 8] = [
    OptionMeta::required("api_key", OptionKind::Text, "OpenWeatherMap API key"),
    OptionMeta::required("city_name", OptionKind::Text, "City to report on"),
    OptionMeta::optional("state_code", OptionKind::Text, "State code; requires country_code", "none"),
    OptionMeta::optional("country_code", OptionKind::Text, "ISO 3166 country code", "none"),
    OptionMeta::optional("units", OptionKind::Text, "kelvin, metric or imperial", "imperial"),
    OptionMeta::optional("temperature", OptionKind::Bool, "Show the temperature", "true"),
    OptionMeta::optional("condition", OptionKind::Bool, "Show the sky condition", "true"),
    OptionMeta::optional("timeout", OptionKind::Int, "Request timeout in seconds", "5"),
];

impl WeatherItem {
    /// `q` parameter: city, optionally followed by state and country
    pub fn location(&self) -> String {
        let mut q = self.city_name.clone();
        if let Some(state) = &self.state_code {
            q.push(',');
            q.push_str(state);
        }
        if let Some(country) = &self.country_code {
            q.push(',');
            q.push_str(country);
        }
        q
    }

    pub fn request_url(&self) -> Result<Url, ItemError> {
        Url::parse_with_params(
            BASE_URL,
            &[
                ("q", self.location()),
                ("appid", self.api_key.clone()),
                ("units", self.units.api_name().to_string()),
            ],
        )
        .map_err(|e| ItemError::external("building weather request", e))
    }

    fn fetch(&self) -> Result<WeatherResponse, ItemError> {
        let url = self.request_url()?;
        debug!(location = %self.location(), units = self.units.api_name(), "requesting weather");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ItemError::external("building http client", e))?;
        client
            .get(url)
            .send()
            .map_err(|e| ItemError::external("weather request failed", e))?
            .json::<WeatherResponse>()
            .map_err(|e| ItemError::external("invalid weather response", e))
    }
}

impl Item for WeatherItem {
    fn get(&self) -> Result<Value, ItemError> {
        let response = self.fetch()?;
        Ok(Value::Map(response.summarize(self.temperature, self.condition)?))
    }

    fn render(&self) -> String {
        match self.get() {
            Ok(report) => ["temperature", "condition"]
                .iter()
                .filter_map(|key| report.get(key).and_then(Value::as_text))
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                debug!(error = %e, "weather unavailable");
                String::new()
            }
        }
    }
}

impl ItemPlugin for WeatherItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "WeatherItem",
            description: "Current weather from OpenWeatherMap",
            extends: ITEM_MARKER,
            options: &WEATHER_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        let units_name = options.text_or("units", "imperial")?;
        let units = WeatherUnits::from_name(&units_name).ok_or_else(|| {
            ConfigError::invalid("units", format!("'{units_name}' is not one of kelvin, metric, imperial"))
        })?;

        let state_code = options.optional_text("state_code")?;
        let country_code = options.optional_text("country_code")?;
        if state_code.is_some() && country_code.is_none() {
            return Err(ConfigError::invalid("state_code", "requires country_code"));
        }

        let timeout = options.int_or("timeout", 5)?;
        if timeout <= 0 {
            return Err(ConfigError::invalid("timeout", "must be a positive number of seconds"));
        }

        Ok(Self {
            api_key: options.required_text("api_key")?,
            city_name: options.required_text("city_name")?,
            state_code,
            country_code,
            units,
            temperature: options.bool_or("temperature", true)?,
            condition: options.bool_or("condition", true)?,
            timeout: Duration::from_secs(timeout as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ItemOptions {
        ItemOptions::new()
            .with("api_key", "secret")
            .with("city_name", "Austin")
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let item = WeatherItem::from_options(&options()).unwrap();
        assert_eq!(item.units, WeatherUnits::Imperial);
        assert_eq!(item.timeout, Duration::from_secs(5));
        assert!(item.temperature && item.condition);
    }

    #[test]
    fn test_request_url() {
        let opts = options()
            .with("state_code", "TX")
            .with("country_code", "US")
            .with("units", "kelvin");
        let url = WeatherItem::from_options(&opts).unwrap().request_url().unwrap();
        assert_eq!(url.host_str(), Some("api.openweathermap.org"));
        assert_eq!(url.path(), "/data/2.5/weather");
        assert_eq!(
            query(&url),
            vec![
                ("q".to_string(), "Austin,TX,US".to_string()),
                ("appid".to_string(), "secret".to_string()),
                ("units".to_string(), "standard".to_string()),
            ]
        );
    }

    #[test]
    fn test_country_without_state() {
        let item = WeatherItem::from_options(&options().with("country_code", "US")).unwrap();
        assert_eq!(item.location(), "Austin,US");
    }

    #[test]
    fn test_city_name_is_encoded() {
        let opts = ItemOptions::new().with("api_key", "k").with("city_name", "São Paulo");
        let url = WeatherItem::from_options(&opts).unwrap().request_url().unwrap();
        assert_eq!(query(&url)[0].1, "São Paulo");
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_state_requires_country() {
        let err = WeatherItem::from_options(&options().with("state_code", "TX")).unwrap_err();
        assert_eq!(err.option(), "state_code");
    }

    #[test]
    fn test_unknown_units() {
        let err = WeatherItem::from_options(&options().with("units", "rankine")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_timeout() {
        let err = WeatherItem::from_options(&options().with("timeout", Value::Int(0))).unwrap_err();
        assert_eq!(err.option(), "timeout");
    }

    #[test]
    fn test_missing_api_key() {
        let opts = ItemOptions::new().with("city_name", "Austin");
        assert_eq!(WeatherItem::from_options(&opts).unwrap_err(), ConfigError::missing("api_key"));
    }
}
