//! Prompt configuration
//!
//! The YAML file a user writes: prompt-level settings plus an ordered
//! mapping of item name to item options.

use glyph_core::ItemOptions;
use glyph_plugin::{default_cache_path, DiscoveryOptions, Manifest, Registry, RegistryError};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration compiled into the binary
pub const BUNDLED_CONFIG: &str = include_str!("../glyph.yaml");

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

// ========== Info Location ==========

/// Where the joined item output goes relative to the prompt glyph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InfoLocation {
    Suppressed,
    #[default]
    Above,
    Inline,
}

impl InfoLocation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" | "suppressed" => Some(Self::Suppressed),
            "above" => Some(Self::Above),
            "inline" => Some(Self::Inline),
            _ => None,
        }
    }

    /// Legacy numeric form: 0 off, 1 above, 2 inline
    pub fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Self::Suppressed),
            1 => Some(Self::Above),
            2 => Some(Self::Inline),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for InfoLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocationVisitor;

        impl<'de> Visitor<'de> for LocationVisitor {
            type Value = InfoLocation;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("one of off, above, inline, or 0, 1, 2")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<InfoLocation, E> {
                InfoLocation::from_name(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<InfoLocation, E> {
                InfoLocation::from_index(v).ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<InfoLocation, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(InfoLocation::from_index)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(LocationVisitor)
    }
}

// ========== Item List ==========

/// Item entries in configuration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemList(Vec<(String, ItemOptions)>);

impl ItemList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, name: impl Into<String>, options: ItemOptions) -> Self {
        self.push(name, options);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, options: ItemOptions) {
        self.0.push((name.into(), options));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemOptions)> {
        self.0.iter().map(|(name, options)| (name.as_str(), options))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ItemOptions)> for ItemList {
    fn from_iter<I: IntoIterator<Item = (String, ItemOptions)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ItemList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemListVisitor;

        impl<'de> Visitor<'de> for ItemListVisitor {
            type Value = ItemList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of item names to options")
            }

            fn visit_unit<E: de::Error>(self) -> Result<ItemList, E> {
                Ok(ItemList::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<ItemList, E> {
                Ok(ItemList::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ItemList, A::Error> {
                let mut items = ItemList::new();
                while let Some((name, options)) = map.next_entry::<String, Option<ItemOptions>>()? {
                    items.push(name, options.unwrap_or_default());
                }
                Ok(items)
            }
        }

        deserializer.deserialize_any(ItemListVisitor)
    }
}

// ========== Prompt Config ==========

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub prompt_string: String,
    pub info_separator: String,
    pub info_location: InfoLocation,
    pub colors: bool,
    pub items: ItemList,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            prompt_string: "%".to_string(),
            info_separator: ":".to_string(),
            info_location: InfoLocation::Above,
            colors: true,
            items: ItemList::new(),
        }
    }
}

impl PromptConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigFileError> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn bundled() -> Result<Self, ConfigFileError> {
        Self::parse(BUNDLED_CONFIG, "<bundled>")
    }

    /// Load the first user config that exists, or the bundled one.
    pub fn discover() -> Result<Self, ConfigFileError> {
        Self::discover_in(&search_paths())
    }

    pub fn discover_in(candidates: &[PathBuf]) -> Result<Self, ConfigFileError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => {
                debug!("no user config found, using bundled config");
                Self::bundled()
            }
        }
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigFileError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigFileError::Parse {
            origin: origin.to_string(),
            source,
        })
    }
}

/// `~/.glyph.yaml` then `~/.glyph.yml`
pub fn search_paths() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| vec![home.join(".glyph.yaml"), home.join(".glyph.yml")])
        .unwrap_or_default()
}

// ========== Registry Settings ==========

/// How the item registry is opened
#[derive(Debug, Clone, Default)]
pub struct RegistrySettings {
    /// Snapshot location; `None` means the platform cache directory
    pub cache_path: Option<PathBuf>,
    /// Never read or write the snapshot
    pub no_cache: bool,
    /// Ignore the snapshot and rediscover
    pub rebuild: bool,
    pub discovery: DiscoveryOptions,
}

impl RegistrySettings {
    pub fn effective_cache_path(&self) -> Option<PathBuf> {
        if self.no_cache {
            return None;
        }
        self.cache_path.clone().or_else(default_cache_path)
    }

    pub fn open(&self, manifest: Manifest) -> Result<Registry, RegistryError> {
        let mut builder = Registry::builder()
            .namespace(manifest)
            .cache_path(self.effective_cache_path())
            .options(self.discovery);
        if self.rebuild {
            builder = builder.fresh();
        }
        builder.build()
    }
}
