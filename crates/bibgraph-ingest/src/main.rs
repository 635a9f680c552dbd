//! CLI entry point for the bibgraph ingestion pipeline.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use bibgraph_graph::{GraphClient, GraphConfig};
use bibgraph_ingest::config::PipelineConfig;
use bibgraph_ingest::pipeline;

#[derive(Parser)]
#[command(name = "bibgraph")]
#[command(about = "Load bibliographic CSV extracts into Neo4j and run the fixed lookup queries")]
struct Cli {
    /// Config file prefix (default: bibgraph).
    #[arg(short, long, default_value = "bibgraph")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    // Startup configuration errors are fatal; everything later is per-item.
    let pipeline_config = load_pipeline_config(&cli.config)?;
    let graph_config = load_graph_config(&cli.config)?;

    let graph = GraphClient::connect(&graph_config).await?;

    pipeline::run(&graph, &pipeline_config).await?;
    tracing::info!("Pipeline complete");
    Ok(())
}

fn load_pipeline_config(file_prefix: &str) -> anyhow::Result<PipelineConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("BIBGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let pipeline: PipelineConfig = cfg.get("pipeline")?;
    // Stored values were lower-cased by preprocessing; match them.
    Ok(pipeline.lowercased())
}

fn load_graph_config(file_prefix: &str) -> anyhow::Result<GraphConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("BIBGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let defaults = GraphConfig::default();
    Ok(GraphConfig {
        uri: cfg
            .get_string("neo4j.uri")
            .unwrap_or_else(|_| defaults.uri.clone()),
        user: cfg
            .get_string("neo4j.user")
            .unwrap_or_else(|_| defaults.user.clone()),
        password: cfg
            .get_string("neo4j.password")
            .unwrap_or_else(|_| defaults.password.clone()),
        ..defaults
    })
}
