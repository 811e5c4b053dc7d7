use anyhow::Context;
use clap::Parser;
use nd_cluster::simulate;
use nd_core::{RawArticle, Section};
use nd_pipeline::logging::init_logging;
use nd_pipeline::{PipelineConfig, PipelineManager};
use nd_sections::{classify_with_plan, SectionPlan};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deduplicate, section and store fetched news batches", long_about = None)]
pub struct Cli {
    /// Storage backend: json (default) or memory
    #[arg(long, default_value = "json")]
    storage: String,
    /// Path of the json store
    #[arg(long)]
    store_path: Option<PathBuf>,
    /// Pipeline config file (JSON) with cluster settings and section limits
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured similarity threshold
    #[arg(long)]
    threshold: Option<f64>,
    /// Overrides the configured maximum cluster size
    #[arg(long)]
    max_cluster_size: Option<usize>,
    /// Preferred publisher for representatives; repeat for several
    #[arg(long = "preferred")]
    preferred: Vec<String>,
    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Cluster, classify and merge a fetched batch into the store
    Run {
        /// JSON array of fetched articles
        #[arg(long)]
        input: PathBuf,
        /// Optional JSON object mapping links to section keys
        #[arg(long)]
        plan: Option<PathBuf>,
    },
    /// Cluster a generated batch and report stats and estimated savings
    Simulate {
        #[arg(long, default_value_t = 120)]
        count: usize,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print totals for the stored articles
    Summary,
    /// Print the section each article of a batch would land in
    Classify {
        #[arg(long)]
        input: PathBuf,
    },
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn read_plan(path: &Path) -> anyhow::Result<SectionPlan> {
    let assignments: HashMap<String, String> = read_json(path).await?;
    let mut plan = SectionPlan::new();
    for (link, key) in assignments {
        let section: Section = key.parse()?;
        plan.assign(&link, section);
    }
    Ok(plan)
}

async fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path).await?,
        None => PipelineConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.cluster.similarity_threshold = threshold;
    }
    if let Some(size) = cli.max_cluster_size {
        config.cluster.max_cluster_size = size;
    }
    if !cli.preferred.is_empty() {
        config.cluster.preferred_publishers = cli.preferred.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let config = load_config(&cli).await?;

    match &cli.command {
        Commands::Simulate { count, json } => {
            let report = simulate(*count, &config.cluster)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let stats = report.stats;
                println!("🧪 Simulated {} articles", stats.original_count);
                println!("  after dedupe:     {}", stats.after_dedupe_count);
                println!("  clusters:         {}", stats.cluster_count);
                println!("  representatives:  {}", stats.representative_count);
                println!("  reduction:        {}%", stats.reduction_percent);
                println!(
                    "  est. tokens:      {} -> {} ({}% saved)",
                    report.savings.tokens_before, report.savings.tokens_after, report.savings.percent_saved
                );
            }
        }
        Commands::Classify { input } => {
            let batch: Vec<RawArticle> = read_json(input).await?;
            for article in &batch {
                let classification = classify_with_plan(article, None);
                println!(
                    "{:<14} {:<9} {}",
                    classification.section.key(),
                    format!("{:?}", classification.origin).to_lowercase(),
                    article.title
                );
            }
        }
        Commands::Run { input, plan } => {
            let storage = nd_storage::create_storage(&cli.storage, cli.store_path.as_deref()).await?;
            let manager = PipelineManager::new(storage, config)?;
            let batch: Vec<RawArticle> = read_json(input).await?;
            let plan = match plan {
                Some(path) => Some(read_plan(path).await?),
                None => None,
            };
            info!("📥 Loaded {} articles from {}", batch.len(), input.display());
            let report = manager.run(&batch, plan.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Summary => {
            let storage = nd_storage::create_storage(&cli.storage, cli.store_path.as_deref()).await?;
            let manager = PipelineManager::new(storage, config)?;
            let summary = manager.summary().await?;
            println!("📊 {} articles in {} topics from {} publishers",
                summary.total_articles, summary.total_topics, summary.total_publishers);
        }
    }

    Ok(())
}
