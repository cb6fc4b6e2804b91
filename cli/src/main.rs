//! graphload CLI - load a nodes/relationships JSON document into Neo4j
//!
//! Connects over the Neo4j HTTP endpoint, or to an in-memory store with
//! `--dry-run`, and prints the load summary.

use anyhow::{anyhow, Context};
use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use graphload::{ConnectionConfig, GraphIngestor, IngestResult, MemorySink};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "graphload", version, about = "Load a JSON graph document into Neo4j")]
struct Cli {
    /// JSON document with `nodes` and `relationships` arrays
    #[arg(short, long)]
    file: PathBuf,

    /// Neo4j HTTP endpoint [env: NEO4J_URI, default: http://localhost:7474]
    #[arg(short, long)]
    uri: Option<String>,

    /// Neo4j user [env: NEO4J_USER, default: neo4j]
    #[arg(long)]
    user: Option<String>,

    /// Neo4j password [env: NEO4J_PASSWORD]
    #[arg(long)]
    password: Option<String>,

    /// Database name [env: NEO4J_DATABASE, default: neo4j]
    #[arg(long)]
    database: Option<String>,

    /// Use https (also NEO4J_ENCRYPTED=true)
    #[arg(long)]
    secure: bool,

    /// Connect and per-request timeout [env: NEO4J_TIMEOUT_MS, default: 30s]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Load into an in-memory store instead of Neo4j
    #[arg(long)]
    dry_run: bool,

    /// Write the records that failed to this file, in input format
    #[arg(long)]
    failed_out: Option<PathBuf>,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let doc = graphload::read_document_file(&cli.file)?;

    let result = if cli.dry_run {
        info!("Dry run: loading into an in-memory store");
        GraphIngestor::ingest(MemorySink::new(), &doc).await?
    } else {
        let config = connection_config(&cli)?;
        graphload::load(&config, &doc)
            .await
            .with_context(|| format!("loading {} into {}", cli.file.display(), config.endpoint))?
    };

    print_result(&result, &cli.format)?;

    if let Some(path) = &cli.failed_out {
        if result.is_clean() {
            info!("No failed records; not writing {}", path.display());
        } else {
            let subset = result.failed_subset(&doc);
            std::fs::write(path, serde_json::to_string_pretty(&subset)?)
                .with_context(|| format!("writing failed records to {}", path.display()))?;
            warn!("{} failed record(s) written to {}", result.errors.len(), path.display());
        }
    }

    Ok(())
}

/// NEO4J_* environment first, then any flags given on the command line
fn connection_config(cli: &Cli) -> anyhow::Result<ConnectionConfig> {
    let mut config = ConnectionConfig::from_env()?;
    if let Some(uri) = &cli.uri {
        config.endpoint = uri.clone();
    }
    if let Some(user) = &cli.user {
        config.user = user.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(database) = &cli.database {
        config = config.with_database(database.as_str());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if cli.secure {
        config = config.with_encrypted(true);
    }

    if config.password.is_empty() {
        return Err(anyhow!("no password given; use --password or set NEO4J_PASSWORD"));
    }
    Ok(config)
}

fn print_result(result: &IngestResult, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Table => {
            let mut summary = Table::new();
            summary.set_header(vec!["Nodes", "Relationships", "Errors"]);
            summary.add_row(vec![
                result.nodes_created.to_string(),
                result.relationships_created.to_string(),
                result.errors.len().to_string(),
            ]);
            println!("{}", summary);

            if !result.errors.is_empty() {
                let mut errors = Table::new();
                errors.set_content_arrangement(ContentArrangement::Dynamic);
                errors.set_header(vec!["Kind", "Index", "Record", "Cause"]);
                for failure in &result.errors {
                    errors.add_row(vec![
                        failure.kind.to_string(),
                        failure.index.to_string(),
                        failure.identifier.clone().unwrap_or_else(|| "-".to_string()),
                        failure.cause.to_string(),
                    ]);
                }
                println!("{}", errors);
            }
        }
    }
    Ok(())
}
