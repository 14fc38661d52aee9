//! Settings schema: the configuration source the provider adapters read.
//!
//! JSON on disk uses the same **SCREAMING_SNAKE_CASE** names as the
//! environment variables (`LL_MODEL`, `AZURE_OPENAI_API_KEY`, ...), so a
//! value can be moved between the file and the environment unchanged.

use serde::{Deserialize, Serialize};

/// Environment variable / config key for the default generation deployment.
pub const LL_MODEL_ENV: &str = "LL_MODEL";
/// Environment variable / config key for the default embedding deployment.
pub const EMBEDDING_MODEL_ENV: &str = "EMBEDDING_MODEL";
/// Environment variable / config key for the Azure OpenAI API key.
pub const AZURE_OPENAI_API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";
/// Environment variable / config key for the Azure OpenAI resource endpoint.
pub const AZURE_OPENAI_ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
/// Environment variable / config key for the Azure OpenAI API version.
pub const AZURE_OPENAI_API_VERSION_ENV: &str = "AZURE_OPENAI_API_VERSION";

/// Deployment used for generation when neither the file nor `LL_MODEL` names one.
pub const DEFAULT_LL_MODEL: &str = "gpt-4o-mini";
/// Deployment used for embeddings when neither the file nor `EMBEDDING_MODEL` names one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

// ─────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────

/// Root settings: loaded once at startup from `~/.agentkit/config.json`.
///
/// Every field may be empty. Empty credential fields are resolved later by
/// the provider adapters (environment variable, then built-in default).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct Settings {
    /// Default deployment for text generation.
    pub ll_model: String,
    /// Default deployment for embeddings.
    pub embedding_model: String,
    /// Azure OpenAI API key.
    pub azure_openai_api_key: String,
    /// Azure OpenAI resource endpoint (e.g. `https://my-res.openai.azure.com`).
    pub azure_openai_endpoint: String,
    /// Azure OpenAI REST API version.
    pub azure_openai_api_version: String,
}

impl Settings {
    /// Configured API key, if non-empty.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.azure_openai_api_key)
    }

    /// Configured endpoint, if non-empty.
    pub fn endpoint(&self) -> Option<&str> {
        non_empty(&self.azure_openai_endpoint)
    }

    /// Configured API version, if non-empty.
    pub fn api_version(&self) -> Option<&str> {
        non_empty(&self.azure_openai_api_version)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
