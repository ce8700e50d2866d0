//! Financial Detective - extract a knowledge graph from a financial report.
//!
//! # Usage
//!
//! ```bash
//! # Extract with Groq, save JSON, PNG and Mermaid outputs
//! financial-detective extract -i report.txt --visualize --mermaid
//!
//! # Use OpenAI and a custom output path
//! financial-detective extract -i report.txt -p openai -o out/graph.json
//!
//! # Check an existing graph file
//! financial-detective validate graph_output.json
//!
//! # Re-render an existing graph file
//! financial-detective render graph_output.json --png graph.png --mermaid graph.md
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use extract::{DetectiveConfig, Document, Extractor, Provider};
use graph::{GraphSummary, KnowledgeGraph, PlotConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_PNG: &str = "graph_visualization.png";
const DEFAULT_MERMAID: &str = "graph_mermaid.md";
const SAMPLE_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "financial-detective")]
#[command(about = "Extract entities and relationships from financial documents", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a knowledge graph from a text report using an LLM
    Extract(ExtractArgs),

    /// Validate an existing knowledge graph JSON file
    Validate {
        /// Graph JSON file
        input: PathBuf,
    },

    /// Render an existing knowledge graph JSON file
    Render {
        /// Graph JSON file
        input: PathBuf,

        #[command(flatten)]
        outputs: RenderArgs,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Input text file (.txt or .md)
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "graph_output.json")]
    output: PathBuf,

    /// LLM provider
    #[arg(short, long, value_enum, default_value = "groq")]
    provider: ProviderArg,

    /// API key (or set GROQ_API_KEY / OPENAI_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Override the provider's default model
    #[arg(long)]
    model: Option<String>,

    /// JSON config file (provider, retry settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    outputs: RenderArgs,
}

#[derive(Args)]
struct RenderArgs {
    /// Write a PNG visualization
    #[arg(long = "visualize", alias = "png", num_args = 0..=1, default_missing_value = DEFAULT_PNG)]
    png: Option<PathBuf>,

    /// Write a Mermaid chart (markdown)
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_MERMAID)]
    mermaid: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Groq,
    Openai,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Groq => Provider::Groq,
            ProviderArg::Openai => Provider::OpenAi,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let result = match cli.command {
        Commands::Extract(args) => run_extract(args).await,
        Commands::Validate { input } => run_validate(&input).await,
        Commands::Render { input, outputs } => run_render(&input, &outputs).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &ExtractArgs) -> Result<DetectiveConfig> {
    let provider: Provider = args.provider.into();
    let mut config = match &args.config {
        Some(path) => DetectiveConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => DetectiveConfig::default(),
    };

    // Provider flag wins over the file; keep the file's tuning otherwise
    if config.provider.provider != provider {
        config.provider.provider = provider;
        config.provider.api_url = None;
        config.provider.model = None;
    }
    if args.api_key.is_some() {
        config.provider.api_key = args.api_key.clone();
    }
    if args.model.is_some() {
        config.provider.model = args.model.clone();
    }
    Ok(config)
}

async fn run_extract(args: ExtractArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file {:?} not found", args.input);
    }

    let config = build_config(&args)?;
    let extractor = Extractor::from_config(&config).context("Failed to initialize extractor")?;

    let source = ingest::ingest_file(&args.input).await?;
    println!("Read {} characters from {}", source.char_count(), args.input.display());
    println!("Using {}", extractor.describe());

    let document = extractor
        .extract_from_text(&source.text)
        .await
        .context("Error during extraction")?;

    extract::save_document(&document, &args.output)
        .await
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    println!("Saved knowledge graph to {}", args.output.display());

    let kg = graph::assemble(&document);
    write_renderings(&kg, &args.outputs).await?;

    print_report(&kg);
    Ok(())
}

async fn run_validate(input: &Path) -> Result<()> {
    let document = load(input).await?;
    let kg = graph::assemble(&document);
    println!("{} is a valid knowledge graph", input.display());
    print_report(&kg);
    Ok(())
}

async fn run_render(input: &Path, outputs: &RenderArgs) -> Result<()> {
    let document = load(input).await?;
    let kg = graph::assemble(&document);

    let outputs = if outputs.png.is_none() && outputs.mermaid.is_none() {
        RenderArgs {
            png: Some(PathBuf::from(DEFAULT_PNG)),
            mermaid: Some(PathBuf::from(DEFAULT_MERMAID)),
        }
    } else {
        RenderArgs {
            png: outputs.png.clone(),
            mermaid: outputs.mermaid.clone(),
        }
    };
    write_renderings(&kg, &outputs).await
}

async fn load(input: &Path) -> Result<Document> {
    extract::load_document(input)
        .await
        .with_context(|| format!("{} is not a valid knowledge graph", input.display()))
}

async fn write_renderings(kg: &KnowledgeGraph, outputs: &RenderArgs) -> Result<()> {
    if let Some(path) = &outputs.png {
        graph::render_png(kg, path, &PlotConfig::default())?;
        println!("Saved visualization to {}", path.display());
    }
    if let Some(path) = &outputs.mermaid {
        graph::write_markdown(kg, path).await?;
        println!("Saved Mermaid chart to {}", path.display());
    }
    Ok(())
}

fn print_report(kg: &KnowledgeGraph) {
    let summary = GraphSummary::of(kg);
    for line in report_lines(&summary, &graph::describe_nodes(kg), &graph::describe_edges(kg)) {
        println!("{}", line);
    }
}

fn report_lines(summary: &GraphSummary, nodes: &[String], edges: &[String]) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Entities: {} ({} companies, {} risk factors, {} amounts)",
            summary.total_entities, summary.companies, summary.risk_factors, summary.amounts
        ),
        format!("Relationships: {}", summary.total_relationships),
    ];

    for (title, items) in [("Sample entities:", nodes), ("Sample relationships:", edges)] {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_string());
        for (i, item) in items.iter().take(SAMPLE_LIMIT).enumerate() {
            lines.push(format!("  {}. {}", i + 1, item));
        }
        if items.len() > SAMPLE_LIMIT {
            lines.push(format!("  ... and {} more", items.len() - SAMPLE_LIMIT));
        }
    }
    lines
}
