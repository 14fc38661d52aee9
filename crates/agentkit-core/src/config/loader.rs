//! Settings loader: reads `~/.agentkit/config.json` and fills empty
//! deployment names from the environment.
//!
//! # Loading precedence
//! 1. Defaults (all fields empty)
//! 2. JSON file at `~/.agentkit/config.json`
//! 3. `LL_MODEL` / `EMBEDDING_MODEL` env vars, only where the file left the field empty
//! 4. Built-in deployment defaults
//!
//! Credential fields are left as loaded. Their env fallback happens when a
//! provider adapter is constructed, so an explicit argument can still win.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{
    Settings, DEFAULT_EMBEDDING_MODEL, DEFAULT_LL_MODEL, EMBEDDING_MODEL_ENV, LL_MODEL_ENV,
};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load settings from the default path (or `path`) + env vars.
///
/// Falls back to defaults if the file doesn't exist or can't be parsed.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    let settings = read_settings_file(&config_path);
    apply_env_fallback(settings, |name| std::env::var(name).ok())
}

/// Read the JSON file, or defaults when it is missing or broken.
fn read_settings_file(path: &Path) -> Settings {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Settings::default();
    }

    debug!("Loading settings from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Settings::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to parse config JSON {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

/// Fill empty deployment names from `env`, then from the built-in defaults.
fn apply_env_fallback<F>(mut settings: Settings, env: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    fill_from(&mut settings.ll_model, LL_MODEL_ENV, DEFAULT_LL_MODEL, &env);
    fill_from(
        &mut settings.embedding_model,
        EMBEDDING_MODEL_ENV,
        DEFAULT_EMBEDDING_MODEL,
        &env,
    );
    settings
}

fn fill_from<F>(field: &mut String, env_name: &str, default: &str, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if !field.is_empty() {
        return;
    }
    *field = env(env_name)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
