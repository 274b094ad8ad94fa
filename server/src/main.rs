//! Binary entry point for the raglite HTTP search service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use raglite_search::{EmbeddingConfig, ProviderType, RankerBackend, SearchConfig, SearchEngine};
use raglite_server::{AppState, app};

/// Semantic search over a directory of Markdown files.
#[derive(Debug, Parser)]
#[command(name = "raglite-server", version)]
struct Cli {
    /// Directory of Markdown files to index.
    #[arg(long, default_value = "docs")]
    docs_dir: PathBuf,

    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8010)]
    port: u16,

    /// Ranking backend.
    #[arg(long, value_enum, default_value_t = BackendArg::BruteForce)]
    backend: BackendArg,

    /// Embedding provider.
    #[arg(long, value_enum, default_value_t = ProviderArg::Hashing)]
    provider: ProviderArg,

    /// Embedding model override.
    #[arg(long)]
    model: Option<String>,

    /// Persist the similarity index at this path (indexed backend only).
    #[arg(long)]
    index_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    BruteForce,
    Indexed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Openai,
    Hashing,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        let backend = match self.backend {
            BackendArg::BruteForce => RankerBackend::BruteForce,
            BackendArg::Indexed => RankerBackend::Indexed,
        };

        let provider = match self.provider {
            ProviderArg::Openai => ProviderType::OpenAI,
            ProviderArg::Hashing => ProviderType::Hashing,
        };

        let mut config = SearchConfig::new(&self.docs_dir)
            .with_backend(backend)
            .with_embedding(EmbeddingConfig {
                provider,
                model: self.model.clone(),
            });

        if let Some(path) = &self.index_path {
            config = config.with_index_path(path);
        }

        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let engine = SearchEngine::new(cli.search_config()).await?;
    let state = Arc::new(AppState { engine });

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("raglite listening on http://{addr}");
    info!("  GET /search?query=<text>&k=<n>");
    info!("  GET /health");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
