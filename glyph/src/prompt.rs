//! Prompt assembly
//!
//! Turns a `PromptConfig` into live items through the registry. A name the
//! registry does not know, or options an item rejects, never abort the
//! prompt: the entry is replaced by an error item.

use crate::render::{join_info, layout};
use crate::{InfoLocation, PromptConfig};
use glyph_core::{colors, ItemOptions};
use glyph_plugin::{ErrorItem, Item, ItemDescriptor, Registry, UnknownItemError};
use tracing::{debug, info, trace, warn};

struct PromptItem {
    name: String,
    item: Box<dyn Item>,
}

/// A prompt with its items instantiated
pub struct Prompt {
    location: InfoLocation,
    separator: String,
    glyph: String,
    colors: bool,
    items: Vec<PromptItem>,
}

impl Prompt {
    /// Instantiate every configured item, in order.
    pub fn build(config: &PromptConfig, registry: &mut Registry) -> Self {
        let items = config
            .items
            .iter()
            .map(|(name, options)| PromptItem {
                name: name.to_string(),
                item: instantiate(registry, name, options),
            })
            .collect();

        Self {
            location: config.info_location,
            separator: config.info_separator.clone(),
            glyph: config.prompt_string.clone(),
            colors: config.colors,
            items,
        }
    }

    pub fn render(&self) -> String {
        if self.location == InfoLocation::Suppressed {
            return layout(self.location, &self.glyph, "");
        }

        let segments = self.items.iter().filter_map(|entry| {
            let text = entry.item.render();
            trace!(item = %entry.name, output = %text, "rendered item");
            if text.trim().is_empty() {
                return None;
            }
            match entry.item.color() {
                Some(color) if self.colors => Some(colors::apply(color, &text)),
                _ => Some(text),
            }
        });
        let info = join_info(segments, &self.separator);
        layout(self.location, &self.glyph, &info)
    }

    /// Configured item names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build and render in one step
pub fn render(config: &PromptConfig, registry: &mut Registry) -> String {
    Prompt::build(config, registry).render()
}

fn instantiate(registry: &mut Registry, name: &str, options: &ItemOptions) -> Box<dyn Item> {
    let descriptor = match lookup(registry, name) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!(error = %e, "item not registered");
            return Box::new(ErrorItem::failed_to_load(name));
        }
    };
    match descriptor.construct(options) {
        Ok(item) => {
            debug!(item = name, module = descriptor.module(), "constructed item");
            item
        }
        Err(e) => {
            warn!(item = name, error = %e, "item rejected its options");
            Box::new(ErrorItem::failed_to_load(name))
        }
    }
}

/// Exact lookup, rebuilding once when the registry came from a snapshot
/// that predates the item. A failed rebuild is not retried.
fn lookup<'r>(registry: &'r mut Registry, name: &str) -> Result<&'r ItemDescriptor, UnknownItemError> {
    if !registry.contains(name) && registry.may_be_stale() {
        info!(item = name, "item missing from registry snapshot, rediscovering");
        if let Err(e) = registry.rebuild() {
            warn!(error = %e, "registry rebuild failed");
        }
    }
    registry.get(name)
}
