//! Active Python virtualenv

use glyph_plugin::prelude::*;
use std::path::Path;

pub struct VenvItem {
    compact: bool,
}

static VENV_OPTIONS: [OptionMeta; 1] = [OptionMeta::optional(
    "compact",
    OptionKind::Bool,
    "Show only the environment directory name",
    "true",
)];

impl Item for VenvItem {
    fn get(&self) -> Result<Value, ItemError> {
        Ok(Value::Text(std::env::var("VIRTUAL_ENV").unwrap_or_default()))
    }

    fn render(&self) -> String {
        match self.get() {
            Ok(value) => format_venv(value.as_text().unwrap_or_default(), self.compact),
            Err(_) => String::new(),
        }
    }
}

impl ItemPlugin for VenvItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "VenvItem",
            description: "Name of the active virtualenv",
            extends: ITEM_MARKER,
            options: &VENV_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            compact: options.bool_or("compact", true)?,
        })
    }
}

pub fn format_venv(path: &str, compact: bool) -> String {
    if !compact {
        return path.to_string();
    }
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_keeps_basename() {
        assert_eq!(format_venv("/home/ada/.venvs/glyph", true), "glyph");
        assert_eq!(format_venv("/home/ada/.venvs/glyph/", true), "glyph");
    }

    #[test]
    fn test_full_path() {
        assert_eq!(format_venv("/home/ada/.venvs/glyph", false), "/home/ada/.venvs/glyph");
    }

    #[test]
    fn test_no_venv() {
        assert_eq!(format_venv("", true), "");
        assert_eq!(format_venv("", false), "");
    }

    #[test]
    fn test_has_no_color() {
        let item = VenvItem::from_options(&ItemOptions::new()).unwrap();
        assert!(item.compact);
        assert_eq!(item.color(), None);
    }
}
