//! rustopenalex - OpenAlex document reader
//!
//! Fetches authors or works from OpenAlex and prints or saves the flattened
//! documents.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! rustopenalex authors "Debayan Banerjee" --limit 10
//! rustopenalex works "large language models" --output ./output --format csv
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! rustopenalex serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use clap::{Parser, Subcommand, ValueEnum};
use rustopenalex::{
    config::OpenAlexConfig, export, openalex::OpenAlexClient, AuthorDocumentBuilder, Document,
    ScholarlyMetadataClient, WorkDocumentBuilder, DEFAULT_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// OpenAlex document reader
#[derive(Parser)]
#[command(name = "rustopenalex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Email for the OpenAlex polite pool
    #[arg(long, global = true, env = "OPENALEX_EMAIL")]
    mailto: Option<String>,

    /// OpenAlex API root
    #[arg(long, global = true, env = "OPENALEX_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One document per work of each author matching a name
    Authors {
        /// Author name
        query: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// One document per work matching a free-text query
    Works {
        /// Search keywords
        query: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Read queries from stdin until "exit"
    Repl {
        /// Which builder answers the queries
        #[arg(long, value_enum, default_value_t = Mode::Works)]
        mode: Mode,

        /// Top-level results considered per query
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Top-level results considered
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Detail fetches in flight at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Output directory (prints JSON to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Authors,
    Works,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .init();

    let mut config = OpenAlexConfig::from_env().context("Invalid OpenAlex configuration")?;
    if let Some(mailto) = cli.mailto {
        config.mailto = Some(mailto);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let client: Arc<dyn ScholarlyMetadataClient> =
        Arc::new(OpenAlexClient::new(config).context("Failed to create OpenAlex client")?);

    match cli.command {
        Commands::Authors { query, run } => run_query(client, Mode::Authors, query, run).await,
        Commands::Works { query, run } => run_query(client, Mode::Works, query, run).await,
        Commands::Repl { mode, limit } => run_repl(client, mode, limit).await,
        Commands::Serve { port, host } => run_server(client, host, port).await,
    }
}

async fn build_documents(
    client: Arc<dyn ScholarlyMetadataClient>,
    mode: Mode,
    query: &str,
    limit: usize,
    concurrency: usize,
) -> rustopenalex::Result<Vec<Document>> {
    match mode {
        Mode::Authors => {
            AuthorDocumentBuilder::new(client)
                .with_concurrency(concurrency)
                .build(query, limit)
                .await
        }
        Mode::Works => {
            WorkDocumentBuilder::new(client)
                .with_concurrency(concurrency)
                .build(query, limit)
                .await
        }
    }
}

// ============================================================================
// One-shot Query
// ============================================================================

async fn run_query(
    client: Arc<dyn ScholarlyMetadataClient>,
    mode: Mode,
    query: String,
    run: RunArgs,
) -> Result<()> {
    let documents = build_documents(client, mode, &query, run.limit, run.concurrency)
        .await
        .with_context(|| format!("Query {:?} failed", query))?;

    let Some(output_dir) = run.output else {
        println!(
            "{}",
            serde_json::to_string_pretty(&documents).context("Failed to serialize documents")?
        );
        return Ok(());
    };

    let output_folder = export::output_folder(&output_dir, &query);
    std::fs::create_dir_all(&output_folder).context("Failed to create output directory")?;

    let saved = match run.format {
        Format::Json => export::save_json(&output_folder.join("documents.json"), &documents),
        Format::Csv => export::save_csv(&output_folder.join("documents.csv"), &documents),
    };
    saved.context("Failed to save documents")?;

    println!(
        "Saved {} documents to {}",
        documents.len(),
        output_folder.display()
    );
    Ok(())
}

// ============================================================================
// Interactive Loop
// ============================================================================

async fn run_repl(client: Arc<dyn ScholarlyMetadataClient>, mode: Mode, limit: usize) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") {
            println!("Session ended.");
            break;
        }
        if input.is_empty() {
            continue;
        }

        match build_documents(client.clone(), mode, input, limit, 1).await {
            Ok(documents) => {
                println!("{} documents", documents.len());
                for doc in &documents {
                    println!(
                        "  - {} [{}]",
                        doc.get_str("title").unwrap_or_default(),
                        doc.get_str("venue").unwrap_or_default()
                    );
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(client: Arc<dyn ScholarlyMetadataClient>, host: String, port: u16) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");

    let app_state = Arc::new(AppState { client });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/authors", post(authors_handler))
        .route("/works", post(works_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

struct AppState {
    client: Arc<dyn ScholarlyMetadataClient>,
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Query request body
#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Query response
#[derive(Debug, Serialize)]
struct QueryResponse {
    status: String,
    count: usize,
    documents: Vec<Document>,
}

async fn authors_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<QueryResponse> {
    info!(query = %req.query, limit = req.limit, "Author request");
    respond(build_documents(state.client.clone(), Mode::Authors, &req.query, req.limit, 1).await)
}

async fn works_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<QueryResponse> {
    info!(query = %req.query, limit = req.limit, "Work request");
    respond(build_documents(state.client.clone(), Mode::Works, &req.query, req.limit, 1).await)
}

fn respond(result: rustopenalex::Result<Vec<Document>>) -> Json<QueryResponse> {
    match result {
        Ok(documents) => Json(QueryResponse {
            status: "success".to_string(),
            count: documents.len(),
            documents,
        }),
        Err(e) => {
            error!(error = %e, "Query failed");
            Json(QueryResponse {
                status: format!("error: {}", e),
                count: 0,
                documents: vec![],
            })
        }
    }
}
