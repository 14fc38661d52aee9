//! Text generation through an Azure OpenAI deployment (Responses API).
//!
//! Only `temperature` and `top_p` from the construction-time
//! [`GenerationOptions`] reach the vendor. Per-call generation args are
//! logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use agentkit_core::config::Settings;

use crate::client::{run_blocking, AzureOpenAiApi, AzureOpenAiClient, ResponseRequest, DISPLAY_NAME};
use crate::credentials::{AzureCredentials, CredentialOverrides};
use crate::error::{Error, Result};
use crate::traits::{GenerationArgs, Provider};

/// Sampling temperature sent when the options don't set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
/// Nucleus sampling mass sent when the options don't set one.
pub const DEFAULT_TOP_P: f64 = 0.9;

// ─────────────────────────────────────────────
// GenerationOptions
// ─────────────────────────────────────────────

/// Generation options fixed at construction time.
///
/// Deserializes from a plain map. Keys other than `temperature` and `top_p`
/// are kept in `extra` but never sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Temperature actually sent.
    pub fn effective_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// `top_p` actually sent.
    pub fn effective_top_p(&self) -> f64 {
        self.top_p.unwrap_or(DEFAULT_TOP_P)
    }
}

// ─────────────────────────────────────────────
// AzureLlmProvider
// ─────────────────────────────────────────────

/// Generates text with an Azure OpenAI deployment.
///
/// The client handle is shared read-only; nothing here changes after
/// construction, so one instance can serve concurrent callers.
pub struct AzureLlmProvider {
    client: Arc<dyn AzureOpenAiApi>,
    deployment: String,
    opts: GenerationOptions,
    instructions: String,
}

impl std::fmt::Debug for AzureLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureLlmProvider")
            .field("deployment", &self.deployment)
            .field("opts", &self.opts)
            .field("instructions", &self.instructions)
            .finish()
    }
}

impl AzureLlmProvider {
    /// Create a provider from settings.
    ///
    /// # Arguments
    /// * `settings`   - Configuration source (`LL_MODEL`, `AZURE_OPENAI_*`)
    /// * `overrides`  - Explicit credentials, winning over settings and env
    /// * `deployment` - Deployment name; `settings.ll_model` when `None`
    /// * `opts`       - Generation options
    ///
    /// # Errors
    /// `Error::Configuration` if no API key or endpoint resolves, or the
    /// endpoint is not a URL.
    pub fn new(
        settings: &Settings,
        overrides: &CredentialOverrides,
        deployment: Option<&str>,
        opts: GenerationOptions,
    ) -> Result<Self> {
        Self::new_with_env(settings, overrides, deployment, opts, |name| std::env::var(name).ok())
    }

    /// [`Self::new`] with a custom environment lookup.
    pub(crate) fn new_with_env<F>(
        settings: &Settings,
        overrides: &CredentialOverrides,
        deployment: Option<&str>,
        opts: GenerationOptions,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = AzureCredentials::resolve_with(overrides, settings, env)?;
        let deployment = deployment.unwrap_or(settings.ll_model.as_str());
        Self::from_credentials(credentials, deployment, opts)
    }

    /// Create a provider from an already resolved credential set.
    pub fn from_credentials(
        credentials: AzureCredentials,
        deployment: impl Into<String>,
        opts: GenerationOptions,
    ) -> Result<Self> {
        let client = AzureOpenAiClient::new(credentials)?;
        let provider = Self::with_client(Arc::new(client), deployment, opts);

        debug!(
            provider = DISPLAY_NAME,
            deployment = %provider.deployment,
            "Creating generation provider"
        );

        Ok(provider)
    }

    /// Create a provider around any [`AzureOpenAiApi`] implementation.
    pub fn with_client(
        client: Arc<dyn AzureOpenAiApi>,
        deployment: impl Into<String>,
        opts: GenerationOptions,
    ) -> Self {
        Self {
            client,
            deployment: deployment.into(),
            opts,
            instructions: String::new(),
        }
    }

    /// Set the instruction string sent with every request. Empty by default.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    fn build_request(&self, prompt: &str) -> ResponseRequest {
        ResponseRequest {
            model: self.deployment.clone(),
            input: prompt.to_string(),
            instructions: self.instructions.clone(),
            temperature: self.opts.effective_temperature(),
            top_p: self.opts.effective_top_p(),
        }
    }
}

#[async_trait]
impl Provider for AzureLlmProvider {
    async fn generate(&self, prompt: &str, generation_args: &GenerationArgs) -> Result<String> {
        if !generation_args.is_empty() {
            warn!(
                provider = DISPLAY_NAME,
                args = ?generation_args,
                "generation_args not used"
            );
        }

        let request = self.build_request(prompt);

        debug!(
            provider = DISPLAY_NAME,
            deployment = %request.model,
            temperature = request.temperature,
            top_p = request.top_p,
            "Dispatching generation request"
        );

        let client = Arc::clone(&self.client);
        let response = run_blocking(move || client.create_response(&request))
            .await
            .map_err(|e| {
                error!(
                    provider = DISPLAY_NAME,
                    deployment = %self.deployment,
                    error = %e,
                    "Generation request failed"
                );
                Error::Provider {
                    provider: DISPLAY_NAME,
                    action: "generating response",
                    source: e,
                }
            })?;

        let text = response.output_text();
        debug!(provider = DISPLAY_NAME, chars = text.len(), "Generation response received");
        Ok(text)
    }

    fn deployment(&self) -> &str {
        &self.deployment
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
