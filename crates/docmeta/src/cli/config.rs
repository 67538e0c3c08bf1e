//! Configuration for docmeta
//!
//! All paths are under the docmeta home directory:
//! 1) DOCMETA_HOME
//! 2) ~/.docmeta
//! 3) ./.docmeta
//!
//! Settings come from `<home>/config.toml` when present; command-line flags
//! override them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::error::HelpfulError;

/// Resolve the docmeta home directory.
pub fn docmeta_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("DOCMETA_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".docmeta"))
        .unwrap_or_else(|| PathBuf::from(".").join(".docmeta"))
}

/// Config file: <home>/config.toml
pub fn config_path() -> PathBuf {
    docmeta_home().join("config.toml")
}

/// Logs directory: <home>/logs
pub fn logs_dir() -> PathBuf {
    docmeta_home().join("logs")
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Settings read from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Seed built schemas with the built-in tables
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// Log filter used when RUST_LOG is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Load from the default config path; defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HelpfulError::cannot_read_file(path, &e.to_string()))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| HelpfulError::config_parse_error(path, &e.to_string()))?;
        Ok(settings)
    }
}

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved paths and settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows paths and effective settings
pub fn run(args: ConfigArgs, settings: &Settings) -> Result<()> {
    let home = docmeta_home();
    let config = config_path();
    let logs = logs_dir();

    if args.json {
        let value = serde_json::json!({
            "home": home.to_string_lossy(),
            "config": {
                "path": config.to_string_lossy(),
                "exists": config.exists(),
            },
            "logs": logs.to_string_lossy(),
            "settings": settings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("DOCMETA CONFIGURATION");
        println!("=====================");
        println!();
        println!("Home:     {}", home.display());
        println!(
            "Config:   {} ({})",
            config.display(),
            if config.exists() { "exists" } else { "not found, using defaults" }
        );
        println!("Logs:     {}", logs.display());
        println!();
        println!("include_builtin = {}", settings.include_builtin);
        println!(
            "log_filter      = {}",
            settings.log_filter.as_deref().unwrap_or(docmeta_logging::DEFAULT_LOG_FILTER)
        );
    }

    Ok(())
}
