//! Glyph - Customizable Shell Prompts
//!
//! A prompt is an ordered list of items (directory, git status, weather,
//! ...) looked up by name in a plugin registry, rendered independently and
//! joined around the prompt glyph.

mod config;
mod prompt;
mod render;

pub use config::{
    search_paths, ConfigFileError, InfoLocation, ItemList, PromptConfig, RegistrySettings,
    BUNDLED_CONFIG,
};
pub use prompt::{render, Prompt};
pub use render::{join_info, layout};

use glyph_plugin::Manifest;

/// Manifest with every item shipped in this workspace
pub fn default_manifest() -> Manifest {
    glyph_weather::load_weather_items(glyph_items::standard_manifest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_core::{colors, Color, ConfigError, ItemOptions, OptionKind, Value};
    use glyph_plugin::{
        Item, ItemDescriptor, ItemError, ItemMeta, ItemPlugin, OptionMeta, Registry,
        RegistrySource, ITEM_MARKER,
    };

    /// Renders its `text` option
    struct StaticItem {
        text: String,
        color: Option<Color>,
    }

    static STATIC_OPTIONS: [OptionMeta; 2] = [
        OptionMeta::optional("text", OptionKind::Text, "Fixed output", ""),
        OptionMeta::optional("color", OptionKind::Text, "Color name", "none"),
    ];

    impl Item for StaticItem {
        fn get(&self) -> Result<Value, ItemError> {
            Ok(Value::Text(self.text.clone()))
        }

        fn render(&self) -> String {
            self.text.clone()
        }

        fn color(&self) -> Option<Color> {
            self.color
        }
    }

    impl ItemPlugin for StaticItem {
        fn meta() -> ItemMeta {
            ItemMeta {
                name: "StaticItem",
                description: "Fixed text",
                extends: ITEM_MARKER,
                options: &STATIC_OPTIONS,
            }
        }

        fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
            let color = match options.optional_text("color")? {
                Some(name) => Some(
                    Color::from_name(&name).ok_or_else(|| ConfigError::invalid("color", name.clone()))?,
                ),
                None => None,
            };
            Ok(Self {
                text: options.text_or("text", "")?,
                color,
            })
        }
    }

    fn late_item() -> ItemDescriptor {
        ItemDescriptor::new(
            ItemMeta {
                name: "LateItem",
                description: "Installed after the snapshot was written",
                extends: ITEM_MARKER,
                options: &STATIC_OPTIONS,
            },
            "tests::late",
            |options| Ok(Box::new(StaticItem::from_options(options)?)),
        )
    }

    fn manifest() -> Manifest {
        Manifest::new().with_item_in::<StaticItem>("tests::fixed")
    }

    fn registry() -> Registry {
        Registry::builder().namespace(manifest()).build().unwrap()
    }

    fn text(value: &str) -> ItemOptions {
        ItemOptions::new().with("text", value)
    }

    fn config(location: InfoLocation, items: ItemList) -> PromptConfig {
        PromptConfig {
            info_location: location,
            colors: false,
            items,
            ..PromptConfig::default()
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = PromptConfig::from_yaml("").unwrap();
            assert_eq!(config, PromptConfig::default());
            assert_eq!(config.prompt_string, "%");
            assert_eq!(config.info_separator, ":");
            assert_eq!(config.info_location, InfoLocation::Above);
            assert!(config.colors);
            assert!(config.items.is_empty());
            assert_eq!(PromptConfig::from_yaml("{}").unwrap(), PromptConfig::default());
        }

        #[test]
        fn test_items_keep_file_order() {
            let yaml = r#"
prompt_string: "$"
info_separator: " | "
info_location: inline
colors: false
items:
  GitItem:
    dirty_symbol: "±"
  DirItem:
    compact: false
  ExitCodeItem:
  WeatherItem: ~
"#;
            let config = PromptConfig::from_yaml(yaml).unwrap();
            assert_eq!(config.prompt_string, "$");
            assert_eq!(config.info_separator, " | ");
            assert_eq!(config.info_location, InfoLocation::Inline);
            assert!(!config.colors);
            assert_eq!(
                config.items.names().collect::<Vec<_>>(),
                vec!["GitItem", "DirItem", "ExitCodeItem", "WeatherItem"]
            );
            let (_, git) = config.items.iter().next().unwrap();
            assert_eq!(git.get("dirty_symbol"), Some(&Value::from("±")));
            let (_, dir) = config.items.iter().nth(1).unwrap();
            assert_eq!(dir.get("compact"), Some(&Value::Bool(false)));
            assert!(config.items.iter().skip(2).all(|(_, options)| options.is_empty()));
        }

        #[test]
        fn test_null_items() {
            let config = PromptConfig::from_yaml("items: ~").unwrap();
            assert!(config.items.is_empty());
        }

        #[test]
        fn test_info_location_forms() {
            let parse = |v: &str| PromptConfig::from_yaml(&format!("info_location: {v}")).map(|c| c.info_location);
            assert_eq!(parse("off").unwrap(), InfoLocation::Suppressed);
            assert_eq!(parse("Suppressed").unwrap(), InfoLocation::Suppressed);
            assert_eq!(parse("ABOVE").unwrap(), InfoLocation::Above);
            assert_eq!(parse("inline").unwrap(), InfoLocation::Inline);
            assert_eq!(parse("0").unwrap(), InfoLocation::Suppressed);
            assert_eq!(parse("1").unwrap(), InfoLocation::Above);
            assert_eq!(parse("2").unwrap(), InfoLocation::Inline);
            assert!(parse("3").is_err());
            assert!(parse("below").is_err());
        }

        #[test]
        fn test_parse_error_names_origin() {
            let err = PromptConfig::from_yaml("items: [unclosed").unwrap_err();
            assert!(err.to_string().contains("<inline>"));
        }

        #[test]
        fn test_bundled_config() {
            let config = PromptConfig::bundled().unwrap();
            assert_eq!(
                config.items.names().collect::<Vec<_>>(),
                vec!["DirItem", "GitItem", "VenvItem", "ExitCodeItem"]
            );
        }

        #[test]
        fn test_discover_prefers_first_existing_file() {
            let tmp = tempfile::tempdir().unwrap();
            let yaml = tmp.path().join(".glyph.yaml");
            let yml = tmp.path().join(".glyph.yml");
            std::fs::write(&yml, "prompt_string: '>'").unwrap();

            let candidates = vec![yaml.clone(), yml.clone()];
            assert_eq!(PromptConfig::discover_in(&candidates).unwrap().prompt_string, ">");

            std::fs::write(&yaml, "prompt_string: '$'").unwrap();
            assert_eq!(PromptConfig::discover_in(&candidates).unwrap().prompt_string, "$");
        }

        #[test]
        fn test_discover_falls_back_to_bundled() {
            let tmp = tempfile::tempdir().unwrap();
            let config = PromptConfig::discover_in(&[tmp.path().join("missing.yaml")]).unwrap();
            assert_eq!(config, PromptConfig::bundled().unwrap());
        }

        #[test]
        fn test_load_missing_file() {
            let tmp = tempfile::tempdir().unwrap();
            let err = PromptConfig::load(&tmp.path().join("nope.yaml")).unwrap_err();
            assert!(matches!(err, ConfigFileError::Read { .. }));
        }

        #[test]
        fn test_registry_settings_cache_path() {
            let settings = RegistrySettings {
                cache_path: Some("/tmp/glyph/registry.json".into()),
                ..RegistrySettings::default()
            };
            assert_eq!(
                settings.effective_cache_path(),
                Some(std::path::PathBuf::from("/tmp/glyph/registry.json"))
            );
            let disabled = RegistrySettings { no_cache: true, ..settings };
            assert_eq!(disabled.effective_cache_path(), None);
        }
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_join_skips_blank_segments() {
            let segments = vec!["".to_string(), "git:main".to_string(), "  ".to_string()];
            assert_eq!(join_info(segments, ":"), "git:main");
            assert_eq!(join_info(vec!["a".to_string(), "b".to_string()], " | "), "a | b");
        }

        #[test]
        fn test_layout() {
            assert_eq!(layout(InfoLocation::Inline, "%", "~/proj:main"), " ~/proj:main % ");
            assert_eq!(layout(InfoLocation::Above, "%", "~/proj:main"), " ~/proj:main\n % ");
            assert_eq!(layout(InfoLocation::Suppressed, "%", "~/proj:main"), "% ");
        }

        #[test]
        fn test_above_aligns_glyph_with_info() {
            let rendered = layout(InfoLocation::Above, "$", "git:main");
            let lines: Vec<&str> = rendered.split('\n').collect();
            assert_eq!(lines, vec![" git:main", " $ "]);
        }

        #[test]
        fn test_empty_info_is_just_the_glyph() {
            for location in [InfoLocation::Suppressed, InfoLocation::Above, InfoLocation::Inline] {
                assert_eq!(layout(location, "$", ""), "$ ");
            }
        }
    }

    mod prompt_tests {
        use super::*;
        use glyph_plugin::{DiscoveryError, DiscoveryOptions, ModuleEntry, Namespace};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        #[test]
        fn test_no_items() {
            let mut registry = registry();
            for location in [InfoLocation::Suppressed, InfoLocation::Above, InfoLocation::Inline] {
                assert_eq!(render(&config(location, ItemList::new()), &mut registry), "% ");
            }
        }

        #[test]
        fn test_inline_placement() {
            let items = ItemList::new()
                .with("StaticItem", text("~/proj"))
                .with("StaticItem", text("main"));
            let mut registry = registry();
            assert_eq!(render(&config(InfoLocation::Inline, items.clone()), &mut registry), " ~/proj:main % ");
            assert_eq!(render(&config(InfoLocation::Above, items), &mut registry), " ~/proj:main\n % ");
        }

        #[test]
        fn test_empty_output_is_suppressed() {
            let items = ItemList::new()
                .with("StaticItem", text(""))
                .with("StaticItem", text("git:main"))
                .with("StaticItem", text("   "));
            let rendered = render(&config(InfoLocation::Inline, items), &mut registry());
            assert_eq!(rendered, " git:main % ");
        }

        #[test]
        fn test_all_empty_items() {
            let items = ItemList::new().with("StaticItem", text(""));
            assert_eq!(render(&config(InfoLocation::Above, items), &mut registry()), "% ");
        }

        #[test]
        fn test_suppressed_hides_info() {
            let items = ItemList::new().with("StaticItem", text("main"));
            assert_eq!(render(&config(InfoLocation::Suppressed, items), &mut registry()), "% ");
        }

        #[test]
        fn test_unknown_item_renders_diagnostic() {
            let items = ItemList::new()
                .with("NopeItem", ItemOptions::new())
                .with("StaticItem", text("main"));
            let rendered = render(&config(InfoLocation::Inline, items), &mut registry());
            assert_eq!(rendered, " Failed to load NopeItem:main % ");
        }

        #[test]
        fn test_rejected_options_render_diagnostic() {
            let items = ItemList::new()
                .with("StaticItem", ItemOptions::new().with("bogus", true))
                .with("StaticItem", ItemOptions::new().with("text", Value::Int(3)))
                .with("StaticItem", ItemOptions::new().with("color", "mauve"));
            let prompt = Prompt::build(&config(InfoLocation::Inline, items), &mut registry());
            assert_eq!(
                prompt.render(),
                " Failed to load StaticItem:Failed to load StaticItem:Failed to load StaticItem % "
            );
        }

        #[test]
        fn test_render_is_idempotent() {
            let items = ItemList::new()
                .with("StaticItem", text("a"))
                .with("Missing", ItemOptions::new());
            let prompt = Prompt::build(&config(InfoLocation::Above, items), &mut registry());
            assert_eq!(prompt.len(), 2);
            assert_eq!(prompt.names().collect::<Vec<_>>(), vec!["StaticItem", "Missing"]);
            assert_eq!(prompt.render(), prompt.render());
        }

        #[test]
        fn test_colors() {
            let items = ItemList::new()
                .with("StaticItem", text("main").with("color", "cyan"))
                .with("StaticItem", text("plain"));
            let mut cfg = config(InfoLocation::Inline, items);
            let mut registry = registry();

            let plain = render(&cfg, &mut registry);
            assert_eq!(plain, " main:plain % ");

            cfg.colors = true;
            let colored = render(&cfg, &mut registry);
            assert_eq!(colored, format!(" {}:plain % ", colors::apply(Color::Cyan, "main")));
        }

        #[test]
        fn test_error_item_is_red_when_colored() {
            let items = ItemList::new().with("NopeItem", ItemOptions::new());
            let cfg = PromptConfig { colors: true, ..config(InfoLocation::Inline, items) };
            let rendered = render(&cfg, &mut registry());
            assert_eq!(rendered, format!(" {} % ", colors::apply(Color::Red, "Failed to load NopeItem")));
        }

        #[test]
        fn test_stale_snapshot_is_rebuilt_once() {
            let tmp = tempfile::tempdir().unwrap();
            let cache = tmp.path().join("registry.json");
            Registry::builder()
                .namespace(manifest())
                .cache_path(Some(cache.clone()))
                .build()
                .unwrap();

            let mut registry = Registry::builder()
                .namespace(manifest().with_descriptor(late_item()))
                .cache_path(Some(cache))
                .build()
                .unwrap();
            assert_eq!(registry.source(), RegistrySource::Snapshot);

            let items = ItemList::new()
                .with("LateItem", text("late"))
                .with("StillMissing", ItemOptions::new());
            let rendered = render(&config(InfoLocation::Inline, items), &mut registry);
            assert_eq!(rendered, " late:Failed to load StillMissing % ");
            assert_eq!(registry.source(), RegistrySource::Discovery);
            assert!(registry.contains("LateItem"));
        }

        /// Counts scans of the namespace root, one per discovery run
        struct CountingNamespace {
            inner: Manifest,
            scans: Arc<AtomicUsize>,
        }

        impl Namespace for CountingNamespace {
            fn iter_modules(&self, package: &str) -> Result<Vec<ModuleEntry>, DiscoveryError> {
                if package.is_empty() {
                    self.scans.fetch_add(1, Ordering::SeqCst);
                }
                self.inner.iter_modules(package)
            }

            fn read_module(&self, module: &str) -> Result<Vec<ItemDescriptor>, DiscoveryError> {
                self.inner.read_module(module)
            }
        }

        #[test]
        fn test_failed_rebuild_runs_discovery_once() {
            let tmp = tempfile::tempdir().unwrap();
            let cache = tmp.path().join("registry.json");
            Registry::builder()
                .namespace(manifest())
                .options(DiscoveryOptions::strict())
                .cache_path(Some(cache.clone()))
                .build()
                .unwrap();

            // a second module now declares StaticItem, so strict discovery fails
            let scans = Arc::new(AtomicUsize::new(0));
            let namespace = CountingNamespace {
                inner: manifest().with_item_in::<StaticItem>("tests::copy"),
                scans: Arc::clone(&scans),
            };
            let mut registry = Registry::builder()
                .namespace(namespace)
                .options(DiscoveryOptions::strict())
                .cache_path(Some(cache))
                .build()
                .unwrap();
            assert_eq!(registry.source(), RegistrySource::Snapshot);
            assert_eq!(scans.load(Ordering::SeqCst), 0);

            let items = ItemList::new()
                .with("FirstMissing", ItemOptions::new())
                .with("StaticItem", text("ok"))
                .with("SecondMissing", ItemOptions::new());
            let rendered = render(&config(InfoLocation::Inline, items), &mut registry);
            assert_eq!(rendered, " Failed to load FirstMissing:ok:Failed to load SecondMissing % ");
            assert_eq!(scans.load(Ordering::SeqCst), 1);
            assert!(!registry.may_be_stale());
        }

        #[test]
        fn test_default_manifest_has_every_item() {
            let registry = Registry::builder().namespace(default_manifest()).build().unwrap();
            assert_eq!(
                registry.names().collect::<Vec<_>>(),
                vec!["DirItem", "ExitCodeItem", "GitItem", "GlyphErrorItem", "VenvItem", "WeatherItem"]
            );
        }

        #[test]
        fn test_bundled_config_builds() {
            let mut registry = Registry::builder().namespace(default_manifest()).build().unwrap();
            let prompt = Prompt::build(&PromptConfig::bundled().unwrap(), &mut registry);
            assert_eq!(prompt.len(), 4);
        }
    }
}
