//! `agentkit status`: show configuration and credential resolution.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use agentkit_core::config::schema::{
    AZURE_OPENAI_API_KEY_ENV, AZURE_OPENAI_API_VERSION_ENV, AZURE_OPENAI_ENDPOINT_ENV,
};
use agentkit_core::config::{get_config_path, load_settings, Settings};
use agentkit_core::utils::mask_secret;
use agentkit_providers::{AzureCredentials, CredentialOverrides, DEFAULT_API_VERSION};

use crate::helpers::status_line;

/// Where a credential value was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Config,
    Env,
    Default,
    Missing,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Source::Config => "config",
            Source::Env => "env",
            Source::Default => "default",
            Source::Missing => "not configured",
        }
    }
}

fn source_of<F>(configured: Option<&str>, env_name: &str, env: &F) -> Source
where
    F: Fn(&str) -> Option<String>,
{
    if configured.is_some() {
        Source::Config
    } else if env(env_name).is_some_and(|v| !v.is_empty()) {
        Source::Env
    } else {
        Source::Missing
    }
}

/// Run the status command.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(get_config_path);
    let settings = load_settings(Some(&config_path));
    let env = |name: &str| std::env::var(name).ok();

    println!();
    println!("{}", "agentkit status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Deployments
    println!("  {:<18} {}", "LLM deployment:".bold(), settings.ll_model);
    println!("  {:<18} {}", "Embedding:".bold(), settings.embedding_model);

    // Credentials
    println!();
    println!("  {}", "Azure OpenAI:".bold());
    for (label, detail) in credential_lines(&settings, &env) {
        println!("    {:<16} {}", label, detail);
    }

    let resolved = AzureCredentials::resolve_with(&CredentialOverrides::default(), &settings, env);
    println!();
    println!(
        "  {:<18} {}",
        "Providers:".bold(),
        match resolved {
            Ok(_) => status_line(true, "ready"),
            Err(e) => status_line(false, &e.to_string()),
        }
    );
    println!();

    Ok(())
}

/// One `(label, detail)` row per credential, key masked.
fn credential_lines<F>(settings: &Settings, env: &F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let key_source = source_of(settings.api_key(), AZURE_OPENAI_API_KEY_ENV, env);
    let endpoint_source = source_of(settings.endpoint(), AZURE_OPENAI_ENDPOINT_ENV, env);
    let version_source = match source_of(settings.api_version(), AZURE_OPENAI_API_VERSION_ENV, env) {
        Source::Missing => Source::Default,
        found => found,
    };

    let value = |configured: Option<&str>, env_name: &str, source: Source| -> Option<String> {
        match source {
            Source::Config => configured.map(String::from),
            Source::Env => env(env_name),
            Source::Default => Some(DEFAULT_API_VERSION.to_string()),
            Source::Missing => None,
        }
    };

    let key = value(settings.api_key(), AZURE_OPENAI_API_KEY_ENV, key_source)
        .map(|k| mask_secret(&k));
    let endpoint = value(settings.endpoint(), AZURE_OPENAI_ENDPOINT_ENV, endpoint_source);
    let version = value(settings.api_version(), AZURE_OPENAI_API_VERSION_ENV, version_source);

    let detail = |v: Option<String>, source: Source| match v {
        Some(v) => status_line(true, &format!("{v} ({})", source.label())),
        None => status_line(false, source.label()),
    };

    vec![
        ("API key", detail(key, key_source)),
        ("Endpoint", detail(endpoint, endpoint_source)),
        ("API version", detail(version, version_source)),
    ]
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
