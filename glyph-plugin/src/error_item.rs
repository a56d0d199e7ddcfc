//! Error item
//!
//! Stands in for an item that failed to load or construct, so the rest of
//! the prompt still renders.

use crate::{Item, ItemError, ItemMeta, ItemPlugin, OptionMeta, ITEM_MARKER};
use glyph_core::{Color, ConfigError, ItemOptions, OptionKind, Value};

pub struct ErrorItem {
    error: String,
}

static ERROR_OPTIONS: [OptionMeta; 1] = [OptionMeta::required(
    "error",
    OptionKind::Text,
    "The message to display",
)];

impl ErrorItem {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }

    /// Diagnostic for an item that could not be loaded
    pub fn failed_to_load(name: &str) -> Self {
        Self::new(format!("Failed to load {name}"))
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

impl Item for ErrorItem {
    fn get(&self) -> Result<Value, ItemError> {
        Ok(Value::Text(self.error.clone()))
    }

    fn render(&self) -> String {
        self.error.clone()
    }

    fn color(&self) -> Option<Color> {
        Some(Color::Red)
    }
}

impl ItemPlugin for ErrorItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "GlyphErrorItem",
            description: "Display a Glyph error as an item",
            extends: ITEM_MARKER,
            options: &ERROR_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options.required_text("error")?))
    }
}
