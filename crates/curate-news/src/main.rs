use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use curator::{
    clean_and_deduplicate, io, Config, CurationOutput, GeminiClient, ProgressEvent,
    SemanticCurator,
};

#[derive(Parser)]
#[command(name = "curate-news")]
#[command(about = "Curate collected news items into accepted/rejected briefing input")]
struct Args {
    /// JSON file of raw items ({headline, snippet, url, source, date} objects)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the curation result (defaults to curated.json next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Example store location (defaults to the local data directory)
    #[arg(short, long)]
    examples: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let examples_path = match args.examples {
        Some(path) => path,
        None => io::default_examples_path()?,
    };
    let output_path = args
        .output
        .unwrap_or_else(|| args.input.with_file_name("curated.json"));

    println!("\n📥 Loading raw items from {}...", args.input.display());
    let raw_items = io::load_raw_items(&args.input)?;
    println!("✓ Loaded {} raw items", raw_items.len());

    let items = clean_and_deduplicate(&raw_items);
    let duplicates = raw_items.len() - items.len();
    println!(
        "✓ {} unique items after normalization ({} duplicates removed)",
        items.len(),
        duplicates
    );

    if items.is_empty() {
        println!("Nothing to curate.");
        return Ok(());
    }

    let model = GeminiClient::new(
        config.gemini_api_key,
        config.generation_model,
        Some(config.fallback_model),
        config.embedding_model,
    )?;
    let curator = SemanticCurator::new(Arc::new(model), &examples_path);

    let (relevant, irrelevant) = curator.example_counts().await;
    println!(
        "✓ Example store: {} relevant / {} irrelevant examples",
        relevant, irrelevant
    );

    println!("\n🔍 Curating {} items...", items.len());
    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::Log(message) => println!("  {message}"),
                ProgressEvent::Chunk { completed, total } => {
                    println!("  ✓ Analyzed {completed}/{total} candidates");
                }
            }
        }
    });

    let (accepted, rejected) = curator.curate_batch(items, Some(tx)).await;
    let _ = printer.await;

    println!("\n✓ Accepted {} items, rejected {}", accepted.len(), rejected.len());

    let output = CurationOutput::new(accepted, rejected);
    io::save_output(&output, &output_path)
        .with_context(|| format!("Failed to save curation result to {}", output_path.display()))?;

    println!("\n✅ Curation result saved to: {}", output_path.display());

    Ok(())
}
