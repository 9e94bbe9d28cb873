use tracing::warn;

use crate::error::{ModelError, ModelResult};
use crate::examples::Example;
use crate::gemini::GenerativeModel;
use crate::retry::RetryPolicy;

/// Differential scores above this are a clear relevant signal; below its
/// negation, a clear irrelevant one. The symmetric band in between is
/// borderline and requires AI judgment.
pub const CLEAR_SIGNAL_BAND: f32 = 0.05;

/// Auto-reject threshold used by the batch pipeline.
pub const BATCH_AUTO_REJECT: f32 = -0.05;

/// Auto-reject threshold used by the single-item legacy path. Kept distinct
/// from the batch threshold on purpose; the two call sites were never
/// reconciled upstream.
pub const SINGLE_ITEM_AUTO_REJECT: f32 = -0.1;

/// In degraded mode (classification unavailable), only items scoring above
/// this are accepted.
pub const DEGRADED_ACCEPT: f32 = 0.3;

/// Provider batch-size limit for embedding requests.
pub const EMBED_CHUNK_SIZE: usize = 100;

/// An example headline with its materialized embedding.
#[derive(Debug, Clone)]
pub struct EmbeddedExample {
    pub headline: String,
    pub reason: String,
    pub embedding: Vec<f32>,
}

/// In-memory embedding cache over the example store, materialized once per
/// process lifetime and appended to incrementally by the feedback loop.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    pub relevant: Vec<EmbeddedExample>,
    pub irrelevant: Vec<EmbeddedExample>,
}

impl EmbeddingCache {
    /// Pairs examples with their embeddings, dropping any example whose
    /// embedding could not be computed.
    pub fn build(
        relevant: &[Example],
        relevant_embs: Vec<Option<Vec<f32>>>,
        irrelevant: &[Example],
        irrelevant_embs: Vec<Option<Vec<f32>>>,
    ) -> Self {
        Self {
            relevant: zip_embedded(relevant, relevant_embs),
            irrelevant: zip_embedded(irrelevant, irrelevant_embs),
        }
    }
}

fn zip_embedded(examples: &[Example], embeddings: Vec<Option<Vec<f32>>>) -> Vec<EmbeddedExample> {
    examples
        .iter()
        .zip(embeddings)
        .filter_map(|(ex, emb)| {
            emb.map(|embedding| EmbeddedExample {
                headline: ex.headline.clone(),
                reason: ex.reason.clone(),
                embedding,
            })
        })
        .collect()
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn best_match<'a>(examples: &'a [EmbeddedExample], embedding: &[f32]) -> (f32, Option<&'a EmbeddedExample>) {
    let mut best_sim = 0.0f32;
    let mut best = None;
    for ex in examples {
        let sim = cosine_similarity(embedding, &ex.embedding);
        if sim > best_sim {
            best_sim = sim;
            best = Some(ex);
        }
    }
    (best_sim, best)
}

/// Differential semantic score for a headline embedding: max similarity to
/// relevant examples minus max similarity to irrelevant ones, with an
/// explanation citing the nearest example when the signal is clear.
pub fn differential_score(cache: &EmbeddingCache, embedding: &[f32]) -> (f32, String) {
    let (relevant_sim, relevant_match) = best_match(&cache.relevant, embedding);
    let (irrelevant_sim, irrelevant_match) = best_match(&cache.irrelevant, embedding);

    let score = relevant_sim - irrelevant_sim;

    let explanation = if score > CLEAR_SIGNAL_BAND {
        match relevant_match {
            Some(ex) => format!(
                "Similar to: '{}' ({})",
                truncate(&ex.headline, 50),
                ex.reason
            ),
            None => "Calculated relevance".to_string(),
        }
    } else if score < -CLEAR_SIGNAL_BAND {
        match irrelevant_match {
            Some(ex) => format!("Rejected: Similar to irrelevant pattern ({})", ex.reason),
            None => "Calculated relevance".to_string(),
        }
    } else {
        "Borderline - requires AI judgment".to_string()
    };

    (score, explanation)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect::<String>() + "..."
    }
}

/// Embeds texts in provider-sized chunks under the retry policy. A chunk
/// whose retries exhaust degrades to `None` for each of its texts instead
/// of aborting the whole computation; quota exhaustion propagates so the
/// caller can enter degraded mode.
pub async fn embed_texts(
    model: &dyn GenerativeModel,
    retry: &RetryPolicy,
    texts: &[String],
) -> ModelResult<Vec<Option<Vec<f32>>>> {
    let mut all = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(EMBED_CHUNK_SIZE) {
        match retry.run(|| model.embed_chunk(chunk)).await {
            Ok(embeddings) => all.extend(embeddings.into_iter().map(Some)),
            Err(ModelError::QuotaExceeded(msg)) => return Err(ModelError::QuotaExceeded(msg)),
            Err(e) => {
                warn!("embedding chunk of {} texts failed: {e}", chunk.len());
                all.extend(std::iter::repeat(None).take(chunk.len()));
            }
        }
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded(headline: &str, reason: &str, embedding: Vec<f32>) -> EmbeddedExample {
        EmbeddedExample {
            headline: headline.to_string(),
            reason: reason.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_differential_score_clear_relevant_cites_example() {
        let cache = EmbeddingCache {
            relevant: vec![embedded(
                "Singtel explores data center sale",
                "Pipeline signal",
                vec![1.0, 0.0],
            )],
            irrelevant: vec![embedded("HDB rental market update", "Domestic social", vec![0.0, 1.0])],
        };

        let (score, reason) = differential_score(&cache, &[1.0, 0.0]);
        assert!(score > CLEAR_SIGNAL_BAND);
        assert!(reason.contains("Singtel"));
        assert!(reason.contains("Pipeline signal"));
    }

    #[test]
    fn test_differential_score_clear_irrelevant() {
        let cache = EmbeddingCache {
            relevant: vec![embedded("Singtel deal", "Pipeline", vec![1.0, 0.0])],
            irrelevant: vec![embedded("HDB rental update", "Domestic social", vec![0.0, 1.0])],
        };

        let (score, reason) = differential_score(&cache, &[0.0, 1.0]);
        assert!(score < -CLEAR_SIGNAL_BAND);
        assert!(reason.contains("irrelevant pattern"));
        assert!(reason.contains("Domestic social"));
    }

    #[test]
    fn test_differential_score_borderline() {
        let cache = EmbeddingCache {
            relevant: vec![embedded("a", "r", vec![1.0, 0.0])],
            irrelevant: vec![embedded("b", "i", vec![0.0, 1.0])],
        };

        // Equidistant from both poles.
        let (score, reason) = differential_score(&cache, &[1.0, 1.0]);
        assert!(score.abs() <= CLEAR_SIGNAL_BAND);
        assert!(reason.contains("Borderline"));
    }

    #[test]
    fn test_empty_cache_scores_zero() {
        let cache = EmbeddingCache::default();
        let (score, _) = differential_score(&cache, &[1.0, 0.0]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_thresholds_stay_distinct() {
        // Two call sites, two constants; never unified upstream.
        assert_eq!(BATCH_AUTO_REJECT, -0.05);
        assert_eq!(SINGLE_ITEM_AUTO_REJECT, -0.1);
    }

    #[test]
    fn test_cache_build_drops_missing_embeddings() {
        let examples = vec![
            Example {
                headline: "a".to_string(),
                reason: "r1".to_string(),
            },
            Example {
                headline: "b".to_string(),
                reason: "r2".to_string(),
            },
        ];
        let cache = EmbeddingCache::build(
            &examples,
            vec![Some(vec![1.0]), None],
            &[],
            vec![],
        );
        assert_eq!(cache.relevant.len(), 1);
        assert_eq!(cache.relevant[0].headline, "a");
    }
}
