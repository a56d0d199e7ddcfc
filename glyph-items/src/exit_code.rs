//! Exit status of the previous command
//!
//! The shell hook exports it as `$STATUS` before invoking glyph.

use glyph_plugin::prelude::*;

pub const STATUS_VAR: &str = "STATUS";

pub struct ExitCodeItem {
    display_zero: bool,
}

static EXIT_CODE_OPTIONS: [OptionMeta; 1] = [OptionMeta::optional(
    "display_zero",
    OptionKind::Bool,
    "Show the status even when it is 0",
    "false",
)];

impl Item for ExitCodeItem {
    fn get(&self) -> Result<Value, ItemError> {
        let status = std::env::var(STATUS_VAR).unwrap_or_else(|_| "0".to_string());
        Ok(Value::Text(status))
    }

    fn render(&self) -> String {
        match self.get() {
            Ok(value) => format_status(value.as_text().unwrap_or("0"), self.display_zero),
            Err(_) => String::new(),
        }
    }

    fn color(&self) -> Option<Color> {
        Some(Color::Red)
    }
}

impl ItemPlugin for ExitCodeItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "ExitCodeItem",
            description: "Exit code of the previous command",
            extends: ITEM_MARKER,
            options: &EXIT_CODE_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            display_zero: options.bool_or("display_zero", false)?,
        })
    }
}

pub fn format_status(status: &str, display_zero: bool) -> String {
    let status = status.trim();
    if status == "0" && !display_zero {
        String::new()
    } else {
        status.to_string()
    }
}
