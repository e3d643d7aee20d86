//! Server configuration: optional TOML file plus environment overrides.
//!
//! # Example
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [intake]
//! max_per_window = 20
//! window_secs = 60
//!
//! [sheets]
//! spreadsheet_id = "1AbC..."
//! tab = "Sheet1"
//! ```
//!
//! Credentials are never read from the file. Environment variables win over
//! file values; `--port` wins over both.

use std::path::Path;

use commission_core::rate_limit::{DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW_SECS};
use commission_core::AdminPolicy;
use commission_sheets::{SheetsConfig, ENV_SPREADSHEET_ID, ENV_TAB};
use serde::Deserialize;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared secret for admin routes; empty or unset disables the check.
pub const ENV_ADMIN_SECRET: &str = "ADMIN_SECRET";

/// Intake submissions allowed per client per window.
pub const ENV_RATE_LIMIT: &str = "COMMISSION_RATE_LIMIT";

// ── File format ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub intake: IntakeSection,
    pub sheets: SheetsSection,
}

/// `[server]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
}

/// `[intake]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeSection {
    pub max_per_window: Option<usize>,
    pub window_secs: Option<u64>,
}

/// `[sheets]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetsSection {
    pub spreadsheet_id: Option<String>,
    pub tab: Option<String>,
}

/// Read and parse a config file from `path`.
pub fn read_config(path: &Path) -> Result<FileConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Where submissions are stored.
#[derive(Debug)]
pub enum Backend {
    /// In-process table, lost on exit.
    Memory,
    Sheets(SheetsConfig),
}

#[derive(Debug)]
pub struct Settings {
    pub port: u16,
    pub max_per_window: usize,
    pub window_secs: u64,
    pub admin: AdminPolicy,
    pub backend: Backend,
}

/// Merge the command line, the file and the environment.
///
/// `env` is the variable lookup, `std::env::var(..).ok()` in production.
pub fn resolve<F>(
    port: Option<u16>,
    memory: bool,
    file: FileConfig,
    env: F,
) -> Result<Settings, String>
where
    F: Fn(&str) -> Option<String>,
{
    let max_per_window = env(ENV_RATE_LIMIT)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .or(file.intake.max_per_window)
        .unwrap_or(DEFAULT_MAX_PER_WINDOW);

    let backend = if memory {
        Backend::Memory
    } else {
        let sheets = file.sheets;
        let lookup = |key: &str| {
            env(key).filter(|v| !v.trim().is_empty()).or_else(|| match key {
                ENV_SPREADSHEET_ID => sheets.spreadsheet_id.clone(),
                ENV_TAB => sheets.tab.clone(),
                _ => None,
            })
        };
        Backend::Sheets(SheetsConfig::from_lookup(lookup).map_err(|e| e.to_string())?)
    };

    Ok(Settings {
        port: port.or(file.server.port).unwrap_or(DEFAULT_PORT),
        max_per_window,
        window_secs: file.intake.window_secs.unwrap_or(DEFAULT_WINDOW_SECS),
        admin: AdminPolicy::from_secret(env(ENV_ADMIN_SECRET)),
        backend,
    })
}
