//! Per-item configuration options
//!
//! `ItemOptions` is the mapping a user writes under an item name in the
//! prompt configuration. The typed readers return the default when a key is
//! absent or explicitly null, and a `ConfigError` when it holds the wrong
//! kind of value.

use crate::{ConfigError, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of value an option accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Bool,
    Int,
    Float,
    Text,
    List,
    Map,
    Any,
}

impl OptionKind {
    pub fn name(&self) -> &'static str {
        match self {
            OptionKind::Bool => "bool",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Text => "text",
            OptionKind::List => "list",
            OptionKind::Map => "map",
            OptionKind::Any => "any",
        }
    }

    /// Null matches every kind; it means "use the default".
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (OptionKind::Any, _) => true,
            (OptionKind::Bool, Value::Bool(_)) => true,
            (OptionKind::Int, Value::Int(_)) => true,
            (OptionKind::Float, Value::Float(_) | Value::Int(_)) => true,
            (OptionKind::Text, Value::Text(_)) => true,
            (OptionKind::List, Value::List(_)) => true,
            (OptionKind::Map, Value::Map(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Options configured for one item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemOptions(BTreeMap<String, Value>);

impl ItemOptions {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder: set an option
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw lookup; null counts as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // ========== Typed Readers ==========

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| ConfigError::wrong_type(key, "bool", v.type_name())),
        }
    }

    pub fn int_or(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_int()
                .ok_or_else(|| ConfigError::wrong_type(key, "int", v.type_name())),
        }
    }

    pub fn text_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.optional_text(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn optional_text(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            Some(v) => Err(ConfigError::wrong_type(key, "text", v.type_name())),
        }
    }

    pub fn required_text(&self, key: &str) -> Result<String, ConfigError> {
        self.optional_text(key)?
            .ok_or_else(|| ConfigError::missing(key))
    }
}

impl FromIterator<(String, Value)> for ItemOptions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for ItemOptions {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}
