//! Azure OpenAI REST client: wire types and a blocking HTTP transport.
//!
//! The [`AzureOpenAiApi`] trait is the seam between the adapters and the
//! network. Its calls are **blocking**; adapters always run them on tokio's
//! blocking pool, never on an executor thread.
//!
//! Endpoints used:
//! - `POST {endpoint}/openai/responses?api-version=…`
//! - `POST {endpoint}/openai/deployments/{deployment}/embeddings?api-version=…`

use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::credentials::AzureCredentials;
use crate::error::{Error, Result};

/// Display name used in logs and error messages.
pub const DISPLAY_NAME: &str = "Azure OpenAI";

/// Request timeout, matching the vendor SDK's default.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// A failed vendor call, before translation into [`Error::Provider`].
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("worker thread failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Body of a Responses API call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseRequest {
    /// Deployment name.
    pub model: String,
    pub input: String,
    pub instructions: String,
    pub temperature: f64,
    pub top_p: f64,
}

/// Responses API result. Only the fields the adapters read are modelled.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResponseObject {
    #[serde(default)]
    pub output: Vec<ResponseOutputItem>,
}

/// One item of `output` (a `message`, `reasoning`, …).
#[derive(Clone, Debug, Deserialize)]
pub struct ResponseOutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ResponseContentPart>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResponseContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponseObject {
    /// A response holding a single assistant message with `text`.
    pub fn with_output_text(text: impl Into<String>) -> Self {
        Self {
            output: vec![ResponseOutputItem {
                kind: "message".to_string(),
                content: vec![ResponseContentPart {
                    kind: "output_text".to_string(),
                    text: Some(text.into()),
                }],
            }],
        }
    }

    /// All `output_text` parts of all `message` items, concatenated.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Body of an Embeddings API call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    /// Deployment name.
    pub model: String,
    pub input: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingData {
    pub embedding: Vec<f64>,
}

impl EmbeddingResponse {
    /// The vector of the first result record.
    pub fn into_first_embedding(self) -> std::result::Result<Vec<f64>, VendorError> {
        self.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                VendorError::MalformedResponse("embedding response contained no data".to_string())
            })
    }
}

// ─────────────────────────────────────────────
// Client trait
// ─────────────────────────────────────────────

/// Blocking Azure OpenAI operations used by the adapters.
///
/// Implementations must be safe to share across threads; adapters hold one
/// behind an `Arc` and call it concurrently from the blocking pool.
pub trait AzureOpenAiApi: Send + Sync {
    fn create_response(
        &self,
        request: &ResponseRequest,
    ) -> std::result::Result<ResponseObject, VendorError>;

    fn create_embedding(
        &self,
        request: &EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, VendorError>;
}

/// Run a blocking vendor call on tokio's blocking pool and await it.
///
/// The calling task is suspended, not blocked. A panic inside `call`
/// surfaces as [`VendorError::Worker`].
pub(crate) async fn run_blocking<T, F>(call: F) -> std::result::Result<T, VendorError>
where
    F: FnOnce() -> std::result::Result<T, VendorError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call).await?
}

// ─────────────────────────────────────────────
// AzureOpenAiClient
// ─────────────────────────────────────────────

/// HTTP implementation of [`AzureOpenAiApi`] bound to one credential set.
///
/// The underlying `reqwest::blocking::Client` is built on first use, on the
/// worker thread, because a blocking client cannot be built inside an async
/// executor thread.
pub struct AzureOpenAiClient {
    credentials: AzureCredentials,
    http: OnceLock<reqwest::blocking::Client>,
}

impl std::fmt::Debug for AzureOpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiClient")
            .field("endpoint", &self.credentials.endpoint)
            .field("api_version", &self.credentials.api_version)
            .finish()
    }
}

impl AzureOpenAiClient {
    /// Create a client for `credentials`.
    ///
    /// # Errors
    /// `Error::Configuration` if the endpoint is not an absolute URL.
    pub fn new(credentials: AzureCredentials) -> Result<Self> {
        reqwest::Url::parse(&credentials.endpoint).map_err(|e| {
            Error::configuration(format!(
                "invalid Azure OpenAI endpoint '{}': {}",
                credentials.endpoint, e
            ))
        })?;

        Ok(Self {
            credentials,
            http: OnceLock::new(),
        })
    }

    fn base(&self) -> &str {
        self.credentials.endpoint.trim_end_matches('/')
    }

    fn responses_url(&self) -> String {
        format!("{}/openai/responses", self.base())
    }

    fn embeddings_url(&self, deployment: &str) -> String {
        format!("{}/openai/deployments/{}/embeddings", self.base(), deployment)
    }

    fn http(&self) -> std::result::Result<&reqwest::blocking::Client, VendorError> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(self.http.get_or_init(|| client))
    }

    fn post_json<B, R>(&self, url: &str, body: &B) -> std::result::Result<R, VendorError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!(url = %url, api_version = %self.credentials.api_version, "Calling Azure OpenAI");

        let response = self
            .http()?
            .post(url)
            .query(&[("api-version", self.credentials.api_version.as_str())])
            .header("api-key", &self.credentials.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(VendorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| VendorError::MalformedResponse(e.to_string()))
    }
}

impl AzureOpenAiApi for AzureOpenAiClient {
    fn create_response(
        &self,
        request: &ResponseRequest,
    ) -> std::result::Result<ResponseObject, VendorError> {
        self.post_json(&self.responses_url(), request)
    }

    fn create_embedding(
        &self,
        request: &EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, VendorError> {
        self.post_json(&self.embeddings_url(&request.model), request)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
