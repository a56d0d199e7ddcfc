//! Glyph Built-in Items

pub mod dir;
pub mod exit_code;
pub mod git;
pub mod venv;

use glyph_plugin::Manifest;

pub use dir::DirItem;
pub use exit_code::ExitCodeItem;
pub use git::GitItem;
pub use venv::VenvItem;

/// Load the built-in items into a manifest
pub fn load_standard_items(manifest: Manifest) -> Manifest {
    manifest
        .with_item::<DirItem>()
        .with_item::<ExitCodeItem>()
        .with_item::<GitItem>()
        .with_item::<VenvItem>()
}

/// Manifest with the error item and the built-in items
pub fn standard_manifest() -> Manifest {
    load_standard_items(Manifest::builtin())
}
