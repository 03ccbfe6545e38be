mod cli;
mod config;
mod document;
mod errors;
mod intelligence;
mod models;
mod profiles;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::intelligence::embedding_client::EmbeddingClient;
use crate::intelligence::pipeline::run_analysis;
use crate::intelligence::similarity::{EmbeddingScorer, FallbackScorer, SemanticScorer, TfIdfScorer};
use crate::profiles::fetcher::HttpProfileFetcher;
use crate::profiles::run_profile_analysis;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the CLI summary.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {e:#}"))?;

    let scorer = build_scorer(&config)?;

    match cli.command {
        Command::Analyze {
            resume,
            job_description,
            output_dir,
        } => {
            ensure_input(&resume)?;
            ensure_input(&job_description)?;
            let written = run_analysis(&resume, &job_description, &output_dir, scorer.as_ref())
                .await
                .context("Analysis failed")?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Profiles { resume, output } => {
            ensure_input(&resume)?;
            let fetcher = HttpProfileFetcher::new(&config)?;
            let analysis = run_profile_analysis(&resume, &output, &fetcher)
                .await
                .context("Profile analysis failed")?;
            println!(
                "{} (trust score {:.2}, grade {:?})",
                output.display(),
                analysis.scores.trust_score,
                analysis.grade
            );
        }
        Command::Serve { port } => serve(config, scorer, port).await?,
    }

    Ok(())
}

/// Embedding scorer with TF-IDF fallback when an endpoint is configured, plain TF-IDF otherwise.
fn build_scorer(config: &Config) -> Result<Arc<dyn SemanticScorer>> {
    let Some(url) = &config.embedding_api_url else {
        info!("Similarity backend: tfidf");
        return Ok(Arc::new(TfIdfScorer));
    };
    let client = EmbeddingClient::new(
        url,
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.http_timeout,
    )
    .context("Failed to build embedding client")?;
    info!("Similarity backend: embedding ({}) with tfidf fallback", client.model());
    Ok(Arc::new(FallbackScorer::new(Arc::new(EmbeddingScorer(client)))))
}

/// Fails early on a missing input, listing the sample files that could be used instead.
fn ensure_input(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let samples = sample_files();
    if samples.is_empty() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    anyhow::bail!(
        "Input file not found: {}\nAvailable samples:\n  {}",
        path.display(),
        samples.join("\n  ")
    )
}

fn sample_files() -> Vec<String> {
    let Ok(entries) = std::fs::read_dir("samples") else {
        return Vec::new();
    };
    let mut files: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .map(|p| p.display().to_string())
        .collect();
    files.sort();
    files
}

async fn serve(config: Config, scorer: Arc<dyn SemanticScorer>, port: Option<u16>) -> Result<()> {
    info!("Starting analyzer API v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = Arc::new(HttpProfileFetcher::new(&config)?);
    let port = port.unwrap_or(config.port);
    let state = AppState {
        config,
        scorer,
        fetcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
