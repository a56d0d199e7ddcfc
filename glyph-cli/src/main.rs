//! Glyph CLI
//!
//! Prints the configured prompt to stdout with no trailing newline. Logs go
//! to stderr, filtered by `GLYPH_LOG` (default `error`) or `-v`.
//!
//! Shell hook (zsh):
//! ```text
//! precmd() { export STATUS=$?; PROMPT="$(glyph)" }
//! ```

use clap::Parser;
use glyph::{ConfigFileError, Prompt, PromptConfig, RegistrySettings};
use glyph_plugin::{DiscoveryOptions, Inheritance, Registry, RegistryError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Printed when the real prompt cannot be built, so the shell stays usable
const FALLBACK_PROMPT: &str = "% ";

const LOG_ENV: &str = "GLYPH_LOG";

#[derive(Parser)]
#[command(name = "glyph", version, about = "Render a shell prompt from plugin items")]
struct Cli {
    /// Config file (default: ~/.glyph.yaml, ~/.glyph.yml, then the bundled config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry cache file (default: <cache dir>/glyph/registry.json)
    #[arg(long, conflicts_with = "no_cache")]
    cache: Option<PathBuf>,

    /// Never read or write the registry cache
    #[arg(long)]
    no_cache: bool,

    /// Ignore the registry cache, rediscover items and rewrite it
    #[arg(long)]
    rebuild: bool,

    /// Also discover items that extend another item
    #[arg(long)]
    transitive: bool,

    /// Fail on duplicate item names and unreadable modules
    #[arg(long)]
    strict: bool,

    /// List registered items instead of printing the prompt
    #[arg(long)]
    list: bool,

    /// More logging on stderr (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigFileError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Cli {
    fn registry_settings(&self) -> RegistrySettings {
        let mut discovery = if self.strict {
            DiscoveryOptions::strict()
        } else {
            DiscoveryOptions::default()
        };
        if self.transitive {
            discovery = discovery.with_inheritance(Inheritance::Transitive);
        }
        RegistrySettings {
            cache_path: self.cache.clone(),
            no_cache: self.no_cache,
            rebuild: self.rebuild,
            discovery,
        }
    }

    fn load_config(&self) -> Result<PromptConfig, ConfigFileError> {
        match &self.config {
            Some(path) => PromptConfig::load(path),
            None => PromptConfig::discover(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(false),
        )
        .init();
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let mut registry = cli.registry_settings().open(glyph::default_manifest())?;
    debug!(source = ?registry.source(), count = registry.len(), "registry ready");

    if cli.list {
        return Ok(list_items(&registry));
    }

    let config = cli.load_config()?;
    Ok(Prompt::build(&config, &mut registry).render())
}

fn list_items(registry: &Registry) -> String {
    let mut out = String::new();
    for descriptor in registry.iter() {
        let meta = descriptor.meta();
        out.push_str(&format!("{}  ({})\n", meta.name, descriptor.module()));
        if !meta.description.is_empty() {
            out.push_str(&format!("    {}\n", meta.description));
        }
        for option in meta.options {
            let default = match (option.required, option.default) {
                (true, _) => "required".to_string(),
                (false, Some(value)) => format!("default {value}"),
                (false, None) => "optional".to_string(),
            };
            out.push_str(&format!(
                "    - {}: {}, {}. {}\n",
                option.name, option.kind, default, option.description
            ));
        }
    }
    out
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (output, code) = match run(&cli) {
        Ok(output) => (output, ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "cannot render prompt");
            (FALLBACK_PROMPT.to_string(), ExitCode::FAILURE)
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        error!(error = %e, "failed to write prompt");
        return ExitCode::FAILURE;
    }
    code
}
