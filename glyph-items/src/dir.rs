//! Current working directory

use glyph_plugin::prelude::*;
use std::path::Path;
use tracing::debug;

pub struct DirItem {
    expand_user: bool,
    compact: bool,
}

static DIR_OPTIONS: [OptionMeta; 2] = [
    OptionMeta::optional("expand_user", OptionKind::Bool, "Show the home directory in full instead of ~", "false"),
    OptionMeta::optional("compact", OptionKind::Bool, "Shorten parent directory names", "true"),
];

impl Item for DirItem {
    fn get(&self) -> Result<Value, ItemError> {
        let cwd = std::env::current_dir()?;
        Ok(Value::Text(cwd.to_string_lossy().into_owned()))
    }

    fn render(&self) -> String {
        match self.get() {
            Ok(value) => {
                let home = dirs::home_dir();
                format_dir(
                    value.as_text().unwrap_or_default(),
                    home.as_deref(),
                    self.expand_user,
                    self.compact,
                )
            }
            Err(e) => {
                debug!(error = %e, "cannot read working directory");
                String::new()
            }
        }
    }

    fn color(&self) -> Option<Color> {
        Some(Color::Green)
    }
}

impl ItemPlugin for DirItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "DirItem",
            description: "The current working directory",
            extends: ITEM_MARKER,
            options: &DIR_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            expand_user: options.bool_or("expand_user", false)?,
            compact: options.bool_or("compact", true)?,
        })
    }
}

/// Display form of `cwd`.
///
/// Unless `expand_user` is set, a path inside `home` starts with `~`. With
/// `compact`, every component but the last is cut to its first character,
/// or its first two when it is a dot-directory.
pub fn format_dir(cwd: &str, home: Option<&Path>, expand_user: bool, compact: bool) -> String {
    let mut display = cwd.to_string();
    if !expand_user {
        if let Some(rest) = home.and_then(|h| Path::new(cwd).strip_prefix(h).ok()) {
            let rest = rest.to_string_lossy();
            display = if rest.is_empty() {
                "~".to_string()
            } else {
                format!("~/{rest}")
            };
        }
    }
    if compact {
        display = shorten_parents(&display);
    }
    display
}

fn shorten_parents(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| if i == last { part.to_string() } else { abbreviate(part) })
        .collect::<Vec<_>>()
        .join("/")
}

fn abbreviate(component: &str) -> String {
    let keep = if component.starts_with('.') { 2 } else { 1 };
    component.chars().take(keep).collect()
}
