//! Credential resolution for the Azure OpenAI adapters.
//!
//! Each value is taken from the first source that has a non-empty one:
//! explicit override → [`Settings`] → environment variable → (API version
//! only) [`DEFAULT_API_VERSION`].

use agentkit_core::config::schema::{
    Settings, AZURE_OPENAI_API_KEY_ENV, AZURE_OPENAI_API_VERSION_ENV, AZURE_OPENAI_ENDPOINT_ENV,
};

use crate::error::{Error, Result};

/// API version used when none is configured anywhere.
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Explicit constructor arguments that take precedence over configuration.
#[derive(Clone, Debug, Default)]
pub struct CredentialOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
}

impl CredentialOverrides {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }
}

/// A fully resolved credential set. Both key and endpoint are non-empty.
#[derive(Clone, PartialEq)]
pub struct AzureCredentials {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AzureCredentials {
    /// Resolve against `settings` and the process environment.
    pub fn resolve(overrides: &CredentialOverrides, settings: &Settings) -> Result<Self> {
        Self::resolve_with(overrides, settings, |name| std::env::var(name).ok())
    }

    /// Resolve with a custom environment lookup.
    ///
    /// # Errors
    /// `Error::Configuration` if the API key or endpoint is still missing.
    pub fn resolve_with<F>(overrides: &CredentialOverrides, settings: &Settings, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = pick(
            overrides.api_key.as_deref(),
            settings.api_key(),
            AZURE_OPENAI_API_KEY_ENV,
            &env,
        );
        let endpoint = pick(
            overrides.endpoint.as_deref(),
            settings.endpoint(),
            AZURE_OPENAI_ENDPOINT_ENV,
            &env,
        );
        let api_version = pick(
            overrides.api_version.as_deref(),
            settings.api_version(),
            AZURE_OPENAI_API_VERSION_ENV,
            &env,
        )
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        match (api_key, endpoint) {
            (Some(api_key), Some(endpoint)) => Ok(Self {
                api_key,
                endpoint,
                api_version,
            }),
            _ => Err(Error::configuration(
                "Azure OpenAI API key or endpoint is missing",
            )),
        }
    }
}

/// First non-empty value of explicit → configured → environment.
fn pick<F>(explicit: Option<&str>, configured: Option<&str>, env_name: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|v| !v.is_empty())
        .or(configured.filter(|v| !v.is_empty()))
        .map(String::from)
        .or_else(|| env(env_name).filter(|v| !v.is_empty()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
