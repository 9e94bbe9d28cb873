use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use curator::{io, Config, GeminiClient, SemanticCurator};

#[derive(Parser)]
#[command(name = "record-feedback")]
#[command(about = "Record a user relevance correction as a labeled curation example")]
struct Args {
    /// Headline of the item being corrected
    headline: String,

    /// Mark the headline as a relevant example
    #[arg(long, conflicts_with = "irrelevant")]
    relevant: bool,

    /// Mark the headline as an irrelevant example
    #[arg(long)]
    irrelevant: bool,

    /// Why the item was restored or removed
    #[arg(short, long, default_value = "User feedback")]
    reason: String,

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
    if !args.relevant && !args.irrelevant {
        anyhow::bail!("Specify either --relevant or --irrelevant");
    }
    let is_relevant = args.relevant;

    let config = Config::from_env()?;
    let examples_path = match args.examples {
        Some(path) => path,
        None => io::default_examples_path()?,
    };

    let model = GeminiClient::new(
        config.gemini_api_key,
        config.generation_model,
        Some(config.fallback_model),
        config.embedding_model,
    )?;
    let curator = SemanticCurator::new(Arc::new(model), &examples_path);

    curator
        .add_example(&args.headline, is_relevant, &args.reason)
        .await?;

    let polarity = if is_relevant { "relevant" } else { "irrelevant" };
    println!("✓ Recorded {} example: {}", polarity, args.headline);

    let (relevant, irrelevant) = curator.example_counts().await;
    println!(
        "✓ Example store now holds {} relevant / {} irrelevant examples",
        relevant, irrelevant
    );

    Ok(())
}
