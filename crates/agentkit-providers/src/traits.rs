//! Provider traits: the uniform calling convention every adapter exposes.
//!
//! Generation: prompt in, text out. Embedding: text in, vector out.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// Per-call generation arguments.
///
/// Accepted for signature compatibility with other providers. The Azure
/// adapters log and ignore them; only construction-time options apply.
pub type GenerationArgs = HashMap<String, serde_json::Value>;

/// Trait that all text generation providers implement.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// # Arguments
    /// * `prompt`          - The user input sent to the model.
    /// * `generation_args` - Per-call overrides (may be ignored by the provider).
    ///
    /// # Errors
    /// `Error::Provider` wrapping the vendor failure.
    async fn generate(&self, prompt: &str, generation_args: &GenerationArgs) -> Result<String>;

    /// Deployment this provider sends requests to.
    fn deployment(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

/// Trait that all embedding providers implement.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text. Dimensionality is whatever the model returns.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Deployment this provider sends requests to.
    fn deployment(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
