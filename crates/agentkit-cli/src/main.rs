//! agentkit CLI: entry point.
//!
//! # Commands
//!
//! - `agentkit generate PROMPT`: one text generation through Azure OpenAI
//! - `agentkit embed TEXT`: embed text, print the vector as JSON
//! - `agentkit status`: show configuration and credential resolution

mod helpers;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use agentkit_core::config::{load_settings, Settings};
use agentkit_providers::{
    AzureEmbeddingProvider, AzureLlmProvider, CredentialOverrides, EmbeddingProvider,
    GenerationArgs, GenerationOptions, Provider,
};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// agentkit: Azure OpenAI generation and embeddings from the command line
#[derive(Parser)]
#[command(name = "agentkit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags overriding the configured Azure OpenAI credentials.
#[derive(Args, Debug, Default)]
struct CredentialArgs {
    /// Azure OpenAI API key
    #[arg(long)]
    api_key: Option<String>,

    /// Azure OpenAI endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Azure OpenAI API version
    #[arg(long)]
    api_version: Option<String>,
}

impl CredentialArgs {
    fn into_overrides(self) -> CredentialOverrides {
        CredentialOverrides {
            api_key: self.api_key,
            endpoint: self.endpoint,
            api_version: self.api_version,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text for a prompt
    Generate {
        /// The user input
        prompt: String,

        /// Deployment name (defaults to LL_MODEL from config)
        #[arg(short, long)]
        deployment: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Nucleus sampling threshold
        #[arg(long)]
        top_p: Option<f64>,

        /// System instructions sent with the request
        #[arg(short, long)]
        instructions: Option<String>,

        #[command(flatten)]
        credentials: CredentialArgs,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Embed text and print the vector as JSON
    Embed {
        /// The text to embed
        text: String,

        /// Deployment name (defaults to EMBEDDING_MODEL from config)
        #[arg(short, long)]
        deployment: Option<String>,

        #[command(flatten)]
        credentials: CredentialArgs,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<String>,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prompt,
            deployment,
            temperature,
            top_p,
            instructions,
            credentials,
            config,
            logs,
        } => {
            init_logging(logs);
            let settings = load(config.as_deref());
            let opts = GenerationOptions {
                temperature,
                top_p,
                ..Default::default()
            };
            run_generate(
                &settings,
                credentials.into_overrides(),
                deployment.as_deref(),
                opts,
                instructions,
                &prompt,
            )
            .await
        }
        Commands::Embed {
            text,
            deployment,
            credentials,
            config,
            logs,
        } => {
            init_logging(logs);
            let settings = load(config.as_deref());
            run_embed(&settings, credentials.into_overrides(), deployment.as_deref(), &text).await
        }
        Commands::Status { config } => {
            init_logging(false);
            let path = config.as_deref().map(agentkit_core::utils::expand_home);
            status::run(path)
        }
    }
}

fn load(config: Option<&str>) -> Settings {
    let path: Option<PathBuf> = config.map(agentkit_core::utils::expand_home);
    load_settings(path.as_deref())
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_generate(
    settings: &Settings,
    overrides: CredentialOverrides,
    deployment: Option<&str>,
    opts: GenerationOptions,
    instructions: Option<String>,
    prompt: &str,
) -> Result<()> {
    let mut provider = AzureLlmProvider::new(settings, &overrides, deployment, opts)
        .context("failed to create Azure OpenAI provider")?;
    if let Some(instructions) = instructions {
        provider = provider.with_instructions(instructions);
    }

    debug!(deployment = %provider.deployment(), "running generate");
    let text = provider
        .generate(prompt, &GenerationArgs::new())
        .await
        .context("generation failed")?;

    helpers::print_generation(&text);
    Ok(())
}

async fn run_embed(
    settings: &Settings,
    overrides: CredentialOverrides,
    deployment: Option<&str>,
    text: &str,
) -> Result<()> {
    let provider = AzureEmbeddingProvider::new(settings, &overrides, deployment)
        .context("failed to create Azure OpenAI embedding provider")?;

    debug!(deployment = %provider.deployment(), "running embed");
    let vector = provider.embed(text).await.context("embedding failed")?;

    helpers::print_embedding(&vector)?;
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("agentkit=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
