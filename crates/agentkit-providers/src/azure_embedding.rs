//! Embeddings through an Azure OpenAI deployment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use agentkit_core::config::Settings;

use crate::client::{run_blocking, AzureOpenAiApi, AzureOpenAiClient, EmbeddingRequest, DISPLAY_NAME};
use crate::credentials::{AzureCredentials, CredentialOverrides};
use crate::error::{Error, Result};
use crate::traits::EmbeddingProvider;

/// Embeds text with an Azure OpenAI deployment.
///
/// Returns the vector of the first result record as-is. Its length is
/// whatever the deployed model produces.
pub struct AzureEmbeddingProvider {
    client: Arc<dyn AzureOpenAiApi>,
    deployment: String,
}

impl std::fmt::Debug for AzureEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureEmbeddingProvider")
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl AzureEmbeddingProvider {
    /// Create a provider from settings; the deployment defaults to
    /// `settings.embedding_model`.
    ///
    /// # Errors
    /// `Error::Configuration` if no API key or endpoint resolves, or the
    /// endpoint is not a URL.
    pub fn new(
        settings: &Settings,
        overrides: &CredentialOverrides,
        deployment: Option<&str>,
    ) -> Result<Self> {
        Self::new_with_env(settings, overrides, deployment, |name| std::env::var(name).ok())
    }

    /// [`Self::new`] with a custom environment lookup.
    pub(crate) fn new_with_env<F>(
        settings: &Settings,
        overrides: &CredentialOverrides,
        deployment: Option<&str>,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = AzureCredentials::resolve_with(overrides, settings, env)?;
        let deployment = deployment.unwrap_or(settings.embedding_model.as_str());
        Self::from_credentials(credentials, deployment)
    }

    pub fn from_credentials(credentials: AzureCredentials, deployment: impl Into<String>) -> Result<Self> {
        let client = AzureOpenAiClient::new(credentials)?;
        let provider = Self::with_client(Arc::new(client), deployment);

        debug!(
            provider = DISPLAY_NAME,
            deployment = %provider.deployment,
            "Creating embedding provider"
        );

        Ok(provider)
    }

    pub fn with_client(client: Arc<dyn AzureOpenAiApi>, deployment: impl Into<String>) -> Self {
        Self {
            client,
            deployment: deployment.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for AzureEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let request = EmbeddingRequest {
            model: self.deployment.clone(),
            input: text.to_string(),
        };

        debug!(
            provider = DISPLAY_NAME,
            deployment = %self.deployment,
            chars = text.len(),
            "Dispatching embedding request"
        );

        let client = Arc::clone(&self.client);
        let vector = run_blocking(move || {
            client
                .create_embedding(&request)
                .and_then(|response| response.into_first_embedding())
        })
        .await
        .map_err(|e| {
            error!(
                provider = DISPLAY_NAME,
                deployment = %self.deployment,
                error = %e,
                "Embedding request failed"
            );
            Error::Provider {
                provider: DISPLAY_NAME,
                action: "generating embedding",
                source: e,
            }
        })?;

        debug!(provider = DISPLAY_NAME, dimensions = vector.len(), "Embedding received");
        Ok(vector)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{EmbeddingResponse, ResponseObject, ResponseRequest, VendorError};
    use crate::testing::FakeClient;
    use std::sync::Mutex;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(endpoint: &str) -> Settings {
        Settings {
            ll_model: "chat-default".to_string(),
            embedding_model: "embed-default".to_string(),
            azure_openai_api_key: "test-key-123".to_string(),
            azure_openai_endpoint: endpoint.to_string(),
            azure_openai_api_version: "2024-05-01-preview".to_string(),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// Panics inside the worker thread.
    struct PanickingClient;

    impl AzureOpenAiApi for PanickingClient {
        fn create_response(&self, _: &ResponseRequest) -> std::result::Result<ResponseObject, VendorError> {
            panic!("vendor client crashed")
        }

        fn create_embedding(
            &self,
            _: &EmbeddingRequest,
        ) -> std::result::Result<EmbeddingResponse, VendorError> {
            panic!("vendor client crashed")
        }
    }

    #[tokio::test]
    async fn test_embed_returns_vector_unchanged() {
        let fake = Arc::new(FakeClient::embedding(vec![0.1, 0.2, 0.3]));
        let provider = AzureEmbeddingProvider::with_client(fake.clone(), "embed");

        let vector = provider.embed("x").await.unwrap();

        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
        let request = fake.last_embedding_request();
        assert_eq!(request.model, "embed");
        assert_eq!(request.input, "x");
    }

    #[tokio::test]
    async fn test_embed_vendor_failure_becomes_provider_error() {
        let fake = Arc::new(FakeClient::failing(401));
        let provider = AzureEmbeddingProvider::with_client(fake, "embed");

        let err = provider.embed("x").await.unwrap_err();

        assert!(matches!(
            err.vendor_error(),
            Some(VendorError::Api { status: 401, .. })
        ));
        assert!(err.to_string().starts_with("Azure OpenAI - error generating embedding"));
    }

    #[tokio::test]
    async fn test_embed_worker_panic_becomes_provider_error() {
        let provider = AzureEmbeddingProvider::with_client(Arc::new(PanickingClient), "embed");

        let err = provider.embed("x").await.unwrap_err();

        assert!(matches!(err.vendor_error(), Some(VendorError::Worker(_))));
    }

    #[tokio::test]
    async fn test_embed_does_not_block_sibling_task() {
        let fake = Arc::new(FakeClient::embedding(vec![1.0]).with_delay(Duration::from_millis(200)));
        let provider = AzureEmbeddingProvider::with_client(fake, "embed");
        let order = Mutex::new(Vec::new());

        let embed = async {
            let vector = provider.embed("x").await.unwrap();
            order.lock().unwrap().push("embed");
            vector
        };
        let sibling = async {
            tokio::task::yield_now().await;
            order.lock().unwrap().push("sibling");
        };

        let (vector, ()) = tokio::join!(embed, sibling);

        assert_eq!(vector, vec![1.0]);
        assert_eq!(*order.lock().unwrap(), vec!["sibling", "embed"]);
    }

    #[test]
    fn test_new_uses_configured_deployment() {
        let provider = AzureEmbeddingProvider::new(
            &settings_for("https://res.openai.azure.com"),
            &CredentialOverrides::default(),
            None,
        )
        .unwrap();

        assert_eq!(provider.deployment(), "embed-default");
        assert_eq!(provider.display_name(), "Azure OpenAI");
    }

    #[test]
    fn test_new_missing_api_key() {
        let settings = Settings {
            azure_openai_api_key: String::new(),
            ..settings_for("https://res.openai.azure.com")
        };

        let err = AzureEmbeddingProvider::new_with_env(
            &settings,
            &CredentialOverrides::default(),
            None,
            no_env,
        )
        .unwrap_err();

        assert!(err.is_configuration());
        assert!(err.vendor_error().is_none());
    }

    #[test]
    fn test_new_missing_endpoint() {
        let err = AzureEmbeddingProvider::new_with_env(
            &settings_for(""),
            &CredentialOverrides::default(),
            None,
            no_env,
        )
        .unwrap_err();

        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_new_explicit_credentials_win() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed-override/embeddings"))
            .and(query_param("api-version", "2024-10-21"))
            .and(header("api-key", "explicit-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": [0.5] }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Settings point elsewhere; only the overrides match the mock.
        let settings = Settings {
            azure_openai_api_key: "config-key".to_string(),
            ..settings_for("not a url")
        };
        let overrides = CredentialOverrides::default()
            .with_api_key("explicit-key")
            .with_endpoint(mock_server.uri())
            .with_api_version("2024-10-21");

        let provider =
            AzureEmbeddingProvider::new_with_env(&settings, &overrides, Some("embed-override"), no_env)
                .unwrap();

        assert_eq!(provider.deployment(), "embed-override");
        assert_eq!(provider.embed("x").await.unwrap(), vec![0.5]);
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_embed_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed-default/embeddings"))
            .and(query_param("api-version", "2024-05-01-preview"))
            .and(header("api-key", "test-key-123"))
            .and(body_json(serde_json::json!({
                "model": "embed-default",
                "input": "hello world"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{ "object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3] }],
                "model": "text-embedding-3-small",
                "usage": { "prompt_tokens": 2, "total_tokens": 2 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = AzureEmbeddingProvider::new(
            &settings_for(&mock_server.uri()),
            &CredentialOverrides::default(),
            None,
        )
        .unwrap();

        let vector = provider.embed("hello world").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_keeps_full_precision() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed-default/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"embedding":[0.1,0.123456789012345,-0.987654321098765]}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = AzureEmbeddingProvider::new(
            &settings_for(&mock_server.uri()),
            &CredentialOverrides::default(),
            None,
        )
        .unwrap();

        let vector = provider.embed("x").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.123456789012345, -0.987654321098765]);
    }

    #[tokio::test]
    async fn test_embed_empty_data_is_provider_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed-default/embeddings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })),
            )
            .mount(&mock_server)
            .await;

        let provider = AzureEmbeddingProvider::new(
            &settings_for(&mock_server.uri()),
            &CredentialOverrides::default(),
            None,
        )
        .unwrap();

        let err = provider.embed("x").await.unwrap_err();
        assert!(matches!(
            err.vendor_error(),
            Some(VendorError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed-default/embeddings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&mock_server)
            .await;

        let provider = AzureEmbeddingProvider::new(
            &settings_for(&mock_server.uri()),
            &CredentialOverrides::default(),
            None,
        )
        .unwrap();

        let err = provider.embed("x").await.unwrap_err();
        assert!(matches!(
            err.vendor_error(),
            Some(VendorError::Api { status: 500, .. })
        ));
    }
}
