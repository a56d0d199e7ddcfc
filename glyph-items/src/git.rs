//! Git repository status
//!
//! Shells out to the `git` CLI in the current directory. Outside a work
//! tree every command fails and the item renders nothing.

use glyph_plugin::prelude::*;
use std::collections::BTreeMap;
use std::process::Command;
use tracing::debug;

pub struct GitItem {
    branch: bool,
    dirty: bool,
    dirty_symbol: String,
}

static GIT_OPTIONS: [OptionMeta; 3] = [
    OptionMeta::optional("branch", OptionKind::Bool, "Show the current branch", "true"),
    OptionMeta::optional("dirty", OptionKind::Bool, "Mark a dirty working tree", "true"),
    OptionMeta::optional("dirty_symbol", OptionKind::Text, "Marker for a dirty working tree", "*"),
];

// ========== Helpers ==========

/// Run git and return its trimmed stdout, or `None` when it exits non-zero.
fn run_git(args: &[&str]) -> Result<Option<String>, ItemError> {
    let output = Command::new("git").args(args).output()?;
    if !output.status.success() {
        debug!(
            args = ?args,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git exited with failure"
        );
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
}

fn current_branch() -> Result<Option<String>, ItemError> {
    match run_git(&["rev-parse", "--abbrev-ref", "HEAD"])? {
        Some(head) if head == "HEAD" => run_git(&["rev-parse", "--short", "HEAD"]),
        other => Ok(other),
    }
}

// ========== Item ==========

impl Item for GitItem {
    /// Map with `branch` (text) and `dirty` (bool); empty outside a repository.
    fn get(&self) -> Result<Value, ItemError> {
        let mut info = BTreeMap::new();
        let Some(branch) = current_branch()? else {
            return Ok(Value::Map(info));
        };
        if self.branch {
            info.insert("branch".to_string(), Value::Text(branch));
        }
        if self.dirty {
            let changes = run_git(&["status", "--porcelain"])?.unwrap_or_default();
            info.insert("dirty".to_string(), Value::Bool(!changes.is_empty()));
        }
        Ok(Value::Map(info))
    }

    fn render(&self) -> String {
        match self.get() {
            Ok(info) => summarize(&info, &self.dirty_symbol),
            Err(e) => {
                debug!(error = %e, "git status unavailable");
                String::new()
            }
        }
    }

    fn color(&self) -> Option<Color> {
        Some(Color::Cyan)
    }
}

impl ItemPlugin for GitItem {
    fn meta() -> ItemMeta {
        ItemMeta {
            name: "GitItem",
            description: "Current git branch and working tree state",
            extends: ITEM_MARKER,
            options: &GIT_OPTIONS,
        }
    }

    fn from_options(options: &ItemOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            branch: options.bool_or("branch", true)?,
            dirty: options.bool_or("dirty", true)?,
            dirty_symbol: options.text_or("dirty_symbol", "*")?,
        })
    }
}

/// Branch name and dirty marker, space separated
pub fn summarize(info: &Value, dirty_symbol: &str) -> String {
    let mut parts = Vec::new();
    if let Some(branch) = info.get("branch").and_then(Value::as_text) {
        parts.push(branch);
    }
    if info.get("dirty").and_then(Value::as_bool) == Some(true) {
        parts.push(dirty_symbol);
    }
    parts.join(" ").trim().to_string()
}
