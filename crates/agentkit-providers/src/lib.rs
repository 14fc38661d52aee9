//! LLM provider layer for agentkit.
//!
//! Thin adapters over the Azure OpenAI REST API behind a uniform call shape.
//!
//! # Architecture
//!
//! - [`traits::Provider`] / [`traits::EmbeddingProvider`]: prompt in, text or vector out
//! - [`credentials`]: API key / endpoint / API version resolution
//! - [`client`]: wire types and the blocking [`client::AzureOpenAiClient`]
//! - [`azure_llm::AzureLlmProvider`]: text generation (Responses API)
//! - [`azure_embedding::AzureEmbeddingProvider`]: embeddings
//! - [`error`]: the two error kinds every adapter reports

pub mod azure_embedding;
pub mod azure_llm;
pub mod client;
pub mod credentials;
pub mod error;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use azure_embedding::AzureEmbeddingProvider;
pub use azure_llm::{AzureLlmProvider, GenerationOptions};
pub use client::{AzureOpenAiApi, AzureOpenAiClient, VendorError};
pub use credentials::{AzureCredentials, CredentialOverrides, DEFAULT_API_VERSION};
pub use error::{Error, Result};
pub use traits::{EmbeddingProvider, GenerationArgs, Provider};
