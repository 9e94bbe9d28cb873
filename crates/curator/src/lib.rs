// Briefing curator library
//
// Multi-layered relevance curation for collected news items: headline
// normalization and dedup, example-based semantic scoring, batched AI
// classification with quota-aware degradation, and a feedback loop that
// turns user corrections into new labeled examples.

pub mod config;
pub mod curator;
pub mod error;
pub mod examples;
pub mod gemini;
pub mod io;
pub mod models;
pub mod parser;
pub mod progress;
pub mod retry;
pub mod scorer;

pub use config::Config;
pub use curator::SemanticCurator;
pub use error::{ModelError, ModelResult};
pub use examples::{Example, ExampleStore};
pub use gemini::{GeminiClient, GenerativeModel};
pub use models::{CurationOutput, Decision, NewsItem, RawItem};
pub use parser::{clean_and_deduplicate, clean_headline, generate_id};
pub use progress::ProgressEvent;
pub use retry::RetryPolicy;
