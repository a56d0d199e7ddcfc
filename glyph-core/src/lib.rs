//! Glyph Core - Fundamental types
//!
//! This crate provides the core types used throughout Glyph:
//! - `Value`: Structured values returned by items and held by options
//! - `ItemOptions`: The per-item option mapping from the prompt config
//! - `ConfigError`: Why an item rejected its options
//! - `Color`: ANSI foreground colors and the pure `apply` function

mod value;
mod options;
mod error;
pub mod colors;

pub use value::Value;
pub use options::{ItemOptions, OptionKind};
pub use error::ConfigError;
pub use colors::Color;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Color, ConfigError, ItemOptions, OptionKind, Value};
}
