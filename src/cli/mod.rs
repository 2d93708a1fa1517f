//! Command-line interface for PanOptions
//!
//! Resolves, checks and describes viewer option documents written in JSON
//! or TOML.

use crate::{
    config::{
        deep_merge, defaults, load_file, CollectingSink, ConfigResolver, ConfigTree,
        ConfigWarning, OptionKey, DEPRECATED_OPTIONS,
    },
    trace_timing, PanOptionsError, Result,
};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// PanOptions command-line interface
#[derive(Parser, Debug)]
#[command(name = "panoptions")]
#[command(about = "Resolve and validate panorama viewer options")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct PanOptionsCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an options file and print the full configuration
    Resolve {
        /// Options file (.json or .toml)
        file: PathBuf,

        /// Override an option, e.g. `minFov=20` or `lang.zoom="Zoom"`
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Pretty-print the resolved configuration
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate an options file and report warnings
    Check {
        /// Options file (.json or .toml)
        file: PathBuf,
    },

    /// Print the default configuration
    Defaults,

    /// List known, read-only and deprecated option names
    Keys,
}

/// CLI command executor
pub struct PanOptionsCliExecutor {
    resolver: ConfigResolver,
    warnings: Arc<CollectingSink>,
    json_output: bool,
}

impl PanOptionsCliExecutor {
    /// Create a new CLI executor
    pub fn new(json_output: bool) -> Self {
        let warnings = Arc::new(CollectingSink::new());
        Self {
            resolver: ConfigResolver::with_sink(warnings.clone()),
            warnings,
            json_output,
        }
    }

    /// Execute a CLI command, writing its report to `out`
    pub fn execute(&self, command: Commands, out: &mut dyn Write) -> Result<()> {
        match command {
            Commands::Resolve {
                file,
                overrides,
                pretty,
            } => self.execute_resolve(file, &overrides, pretty, out),
            Commands::Check { file } => self.execute_check(file, out),
            Commands::Defaults => self.execute_defaults(out),
            Commands::Keys => self.execute_keys(out),
        }
    }

    fn execute_resolve(
        &self,
        file: PathBuf,
        overrides: &[String],
        pretty: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut options = load_file(&file).map_err(PanOptionsError::from)?;
        for raw in overrides {
            let (key, value) = parse_override(raw)?;
            debug!(key = %key, "Applying override");
            deep_merge(&mut options, &nest_override(&key, value));
        }

        info!(file = %file.display(), "Resolving options");
        let resolved = trace_timing!("resolve", { self.resolver.resolve(&options) })
            .map_err(PanOptionsError::from)?;

        for warning in self.warnings.take() {
            eprintln!("{}", format_warning(&warning));
        }

        let rendered = if pretty {
            serde_json::to_string_pretty(&resolved)?
        } else {
            serde_json::to_string(&resolved)?
        };
        writeln!(out, "{}", rendered)?;
        Ok(())
    }

    fn execute_check(&self, file: PathBuf, out: &mut dyn Write) -> Result<()> {
        let options = load_file(&file).map_err(PanOptionsError::from)?;
        let outcome = self.resolver.resolve(&options);
        let warnings = self.warnings.take();

        if self.json_output {
            let report = json!({
                "file": file.display().to_string(),
                "valid": outcome.is_ok(),
                "error": outcome.as_ref().err().map(|e| e.to_string()),
                "warnings": warnings,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            match &outcome {
                Ok(_) => writeln!(out, "{}: OK ({} warnings)", file.display(), warnings.len())?,
                Err(e) => writeln!(out, "{}: FAILED: {}", file.display(), e)?,
            }
            for warning in &warnings {
                writeln!(out, "  {}", format_warning(warning))?;
            }
        }

        outcome.map(|_| ()).map_err(|e| PanOptionsError::from(e).into())
    }

    fn execute_defaults(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", serde_json::to_string_pretty(defaults())?)?;
        Ok(())
    }

    fn execute_keys(&self, out: &mut dyn Write) -> Result<()> {
        if self.json_output {
            let options: Vec<Value> = OptionKey::ALL
                .iter()
                .map(|key| {
                    json!({
                        "name": key.as_str(),
                        "readonly": key.is_readonly(),
                        "default": defaults()[key.as_str()],
                    })
                })
                .collect();
            let deprecated: Vec<Value> = DEPRECATED_OPTIONS
                .iter()
                .map(|(name, message)| json!({"name": name, "message": message}))
                .collect();

            let report = json!({"options": options, "deprecated": deprecated});
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            return Ok(());
        }

        writeln!(out, "Options:")?;
        for key in OptionKey::ALL {
            match key.readonly_message() {
                Some(message) => writeln!(out, "  {:<20} read-only ({})", key.as_str(), message)?,
                None => writeln!(out, "  {}", key.as_str())?,
            }
        }

        writeln!(out, "Deprecated:")?;
        for (name, message) in DEPRECATED_OPTIONS {
            writeln!(out, "  {:<20} {}", name, message)?;
        }
        Ok(())
    }
}

/// Split `key=value`; the value is read as JSON, falling back to a plain string
pub fn parse_override(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| PanOptionsError::InvalidOverride(raw.to_string()))?;

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

/// Turn a dotted key such as `lang.zoom` into a nested tree
fn nest_override(key: &str, value: Value) -> ConfigTree {
    let mut parts = key.rsplit('.');
    let leaf = parts.next().unwrap_or(key);

    let mut tree = ConfigTree::new();
    tree.insert(leaf.to_string(), value);
    for parent in parts {
        let mut wrapper = ConfigTree::new();
        wrapper.insert(parent.to_string(), Value::Object(tree));
        tree = wrapper;
    }
    tree
}

/// Render a warning for terminal output
pub fn format_warning(warning: &ConfigWarning) -> String {
    format!("warning [{}]: {}", warning.key(), warning)
}
