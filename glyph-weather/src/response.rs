//! OpenWeatherMap response body

use glyph_core::Value;
use glyph_plugin::ItemError;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    /// 200 on success; `"404"` (a string) for an unknown city
    pub cod: serde_json::Value,
    #[serde(default)]
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub main: String,
}

impl WeatherResponse {
    pub fn is_not_found(&self) -> bool {
        match &self.cod {
            serde_json::Value::String(code) => code == "404",
            serde_json::Value::Number(code) => code.as_i64() == Some(404),
            _ => false,
        }
    }

    /// Requested parts of the report; empty for an unknown city.
    pub fn summarize(&self, temperature: bool, condition: bool) -> Result<BTreeMap<String, Value>, ItemError> {
        let mut parts = BTreeMap::new();
        if self.is_not_found() {
            return Ok(parts);
        }
        if temperature {
            let main = self
                .main
                .as_ref()
                .ok_or_else(|| ItemError::unavailable("response has no temperature"))?;
            parts.insert("temperature".to_string(), Value::Text(format!("{}º", main.temp.round())));
        }
        if condition {
            let first = self
                .weather
                .first()
                .ok_or_else(|| ItemError::unavailable("response has no conditions"))?;
            parts.insert("condition".to_string(), Value::Text(first.main.clone()));
        }
        Ok(parts)
    }
}
