use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdfquery_chunker::Chunker;
use pdfquery_cli::{ChatClient, PdfQueryConfig};
use pdfquery_indexer::IndexManager;
use pdfquery_vector_store::EmbeddingModel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfquery")]
#[command(about = "Ask questions about a PDF using retrieval-augmented generation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults to ./pdfquery.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or replace an index from a PDF
    Index(IndexArgs),

    /// Ask a question about an indexed PDF
    Query(QueryArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Path to the PDF file to index
    #[arg(long)]
    source: PathBuf,

    /// Index name (used for storage)
    #[arg(long)]
    name: String,

    /// OpenAI API key (overrides OPENAI_API_KEY)
    #[arg(long)]
    key: Option<String>,

    /// Storage directory for indices
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Print build statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// Question to ask about the PDF
    question: String,

    /// Index name to query
    #[arg(long)]
    name: String,

    /// Number of text chunks to retrieve as context
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Chat completion model (overrides [chat] model)
    #[arg(long)]
    model: Option<String>,

    /// OpenAI API key (overrides OPENAI_API_KEY)
    #[arg(long)]
    key: Option<String>,

    /// Storage directory for indices
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Print retrieved chunks without calling the chat model
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON
    if matches!(&cli.command, Commands::Index(args) if args.json) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = PdfQueryConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Index(args) => run_index(args, config)?,
        Commands::Query(args) => run_query(args, config)?,
    }

    Ok(())
}

fn index_manager(config: &PdfQueryConfig) -> Result<IndexManager> {
    let chunker = Chunker::new(config.chunking.clone()).context("Invalid [chunking] settings")?;
    let embedder =
        EmbeddingModel::from_config(&config.embedding).context("Failed to set up embeddings")?;
    Ok(IndexManager::new(
        config.storage_dir.clone(),
        chunker,
        embedder,
    ))
}

fn run_index(args: IndexArgs, mut config: PdfQueryConfig) -> Result<()> {
    config.apply_flags(args.key.as_deref(), args.dir.as_deref());
    let manager = index_manager(&config)?;

    let stats = manager
        .build_index(&args.source, &args.name)
        .with_context(|| format!("Failed to index {}", args.source.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Index '{}' stored in {}/", args.name, stats.index_dir.display());
        eprintln!(
            "Indexed {} pages, {} chunks in {}ms",
            stats.pages, stats.chunks, stats.time_ms
        );
    }
    Ok(())
}

fn run_query(args: QueryArgs, mut config: PdfQueryConfig) -> Result<()> {
    config.apply_flags(args.key.as_deref(), args.dir.as_deref());
    let manager = index_manager(&config)?;

    if args.dry_run {
        let hits = manager.search_index(&args.name, &args.question, args.top_k)?;
        for (i, hit) in hits.iter().enumerate() {
            log::debug!("Chunk {} is {} (score {:.3})", i + 1, hit.page, hit.score);
            println!("\n--- Chunk {} ---\n{}", i + 1, hit.text.trim());
        }
        return Ok(());
    }

    let chunks = manager.query_index(&args.name, &args.question, args.top_k)?;
    let model = args.model.as_deref().unwrap_or(&config.chat.model);
    let client = ChatClient::new(&config.embedding.api_base, config.api_key(), model)?;
    let answer = client.answer(&chunks, &args.question)?;
    println!("{answer}");
    Ok(())
}
