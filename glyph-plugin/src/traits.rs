//! Item traits

use crate::ItemError;
use glyph_core::{Color, ConfigError, ItemOptions, OptionKind, Value};
use serde::Serialize;

/// Supertype name recorded by every direct item implementation
pub const ITEM_MARKER: &str = "Item";

/// Metadata about an item option
#[derive(Debug, Clone, Serialize)]
pub struct OptionMeta {
    pub name: &'static str,
    pub kind: OptionKind,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl OptionMeta {
    pub const fn required(name: &'static str, kind: OptionKind, description: &'static str) -> Self {
        Self { name, kind, description, required: true, default: None }
    }

    pub const fn optional(name: &'static str, kind: OptionKind, description: &'static str, default: &'static str) -> Self {
        Self { name, kind, description, required: false, default: Some(default) }
    }
}

/// Metadata for an item plugin
#[derive(Debug, Clone, Serialize)]
pub struct ItemMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Declared supertype: `ITEM_MARKER` or the name of another item
    pub extends: &'static str,
    pub options: &'static [OptionMeta],
}

/// A unit of prompt information
pub trait Item: Send {
    /// Fetch or compute the underlying data.
    fn get(&self) -> Result<Value, ItemError>;

    /// Display text. Never fails; errors from `get` render as empty text.
    fn render(&self) -> String;

    /// Foreground color the prompt applies to non-empty output.
    fn color(&self) -> Option<Color> {
        None
    }
}

/// Construction side of a concrete item type
pub trait ItemPlugin: Item + Sized + 'static {
    fn meta() -> ItemMeta;
    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError>;
}
