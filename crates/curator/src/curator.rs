use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{ModelError, ModelResult};
use crate::examples::ExampleStore;
use crate::gemini::{strip_code_fences, GenerativeModel};
use crate::models::{Decision, NewsItem};
use crate::parser;
use crate::progress::{report, report_chunk, ProgressEvent};
use crate::retry::RetryPolicy;
use crate::scorer::{
    self, differential_score, EmbeddingCache, BATCH_AUTO_REJECT, CLEAR_SIGNAL_BAND,
    DEGRADED_ACCEPT, SINGLE_ITEM_AUTO_REJECT,
};

/// Candidates per classification request.
const JUDGMENT_BATCH_SIZE: usize = 50;

/// Snippet characters forwarded to the classifier.
const SNIPPET_LIMIT: usize = 200;

/// Section assigned when an item is accepted without a real classification.
const PLACEHOLDER_SECTION: &str = "Uncategorized";

/// The multi-layered curation engine: keyword fast path, semantic
/// similarity to curated examples, and batched AI judgment with
/// quota-aware degradation. One instance is constructed by the host
/// process and shared across runs.
pub struct SemanticCurator {
    model: Arc<dyn GenerativeModel>,
    examples: Mutex<ExampleStore>,
    cache: Mutex<Option<EmbeddingCache>>,
    embed_retry: RetryPolicy,
    judgment_retry: RetryPolicy,
    rewrite_retry: RetryPolicy,
    chunk_size: usize,
}

impl SemanticCurator {
    pub fn new(model: Arc<dyn GenerativeModel>, examples_path: &Path) -> Self {
        Self::with_policies(
            model,
            examples_path,
            RetryPolicy::embedding(),
            RetryPolicy::judgment(),
            RetryPolicy::rewrite(),
        )
    }

    pub fn with_policies(
        model: Arc<dyn GenerativeModel>,
        examples_path: &Path,
        embed_retry: RetryPolicy,
        judgment_retry: RetryPolicy,
        rewrite_retry: RetryPolicy,
    ) -> Self {
        let store = ExampleStore::load(examples_path);
        Self {
            model,
            examples: Mutex::new(store),
            cache: Mutex::new(None),
            embed_retry,
            judgment_retry,
            rewrite_retry,
            chunk_size: JUDGMENT_BATCH_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Materializes the example embedding cache exactly once. The cache
    /// lock is held across the computation so concurrent first callers
    /// wait instead of recomputing.
    async fn ensure_cache(&self) -> ModelResult<()> {
        let mut cache = self.cache.lock().await;
        if cache.is_some() {
            return Ok(());
        }

        let (relevant, irrelevant) = {
            let store = self.examples.lock().await;
            (
                store.relevant_examples.clone(),
                store.irrelevant_examples.clone(),
            )
        };

        info!(
            relevant = relevant.len(),
            irrelevant = irrelevant.len(),
            "computing embeddings for relevance examples"
        );

        let relevant_texts: Vec<String> = relevant.iter().map(|e| e.headline.clone()).collect();
        let relevant_embs =
            scorer::embed_texts(self.model.as_ref(), &self.embed_retry, &relevant_texts).await?;

        let irrelevant_texts: Vec<String> = irrelevant.iter().map(|e| e.headline.clone()).collect();
        let irrelevant_embs =
            scorer::embed_texts(self.model.as_ref(), &self.embed_retry, &irrelevant_texts).await?;

        *cache = Some(EmbeddingCache::build(
            &relevant,
            relevant_embs,
            &irrelevant,
            irrelevant_embs,
        ));
        Ok(())
    }

    async fn embed_headlines(&self, headlines: &[String]) -> ModelResult<Vec<Option<Vec<f32>>>> {
        self.ensure_cache().await?;
        scorer::embed_texts(self.model.as_ref(), &self.embed_retry, headlines).await
    }

    /// Curates a batch of deduplicated items into accepted and rejected
    /// partitions. Never fails once started: every error path degrades to
    /// a score-based decision, and results from completed chunks always
    /// survive later failures.
    pub async fn curate_batch(
        &self,
        items: Vec<NewsItem>,
        progress: Option<Sender<ProgressEvent>>,
    ) -> (Vec<NewsItem>, Vec<NewsItem>) {
        let progress = progress.as_ref();
        let mut accepted: Vec<NewsItem> = Vec::new();
        let mut rejected: Vec<NewsItem> = Vec::new();
        let mut candidates: Vec<NewsItem> = Vec::new();

        report(progress, "Pass 1: Screening keywords...").await;

        let mut to_score: Vec<NewsItem> = Vec::new();
        {
            let store = self.examples.lock().await;
            for mut item in items {
                if let Some(kw) = store.check_keywords(&item.headline) {
                    // Keyword hits still go through classification; the
                    // allowlist only guarantees topical relevance.
                    item.semantic_score = 1.0;
                    item.semantic_reason = format!("Contains key entity: {kw}");
                    candidates.push(item);
                } else {
                    to_score.push(item);
                }
            }
        }

        if !to_score.is_empty() {
            report(
                progress,
                format!("Pass 2: Calculating relevance for {} items...", to_score.len()),
            )
            .await;

            let headlines: Vec<String> = to_score.iter().map(|i| i.headline.clone()).collect();
            let embeddings = match self.embed_headlines(&headlines).await {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    report(
                        progress,
                        format!("Warning: semantic scoring failed ({e}). Falling back to AI only."),
                    )
                    .await;
                    vec![None; to_score.len()]
                }
            };

            let cache = self.cache.lock().await;
            for (mut item, embedding) in to_score.into_iter().zip(embeddings) {
                let (score, reason) = match (cache.as_ref(), embedding) {
                    (Some(cache), Some(embedding)) => differential_score(cache, &embedding),
                    _ => (0.0, "Score unavailable".to_string()),
                };
                item.semantic_score = score;
                item.semantic_reason = reason;

                if score < BATCH_AUTO_REJECT {
                    item.is_relevant = Some(false);
                    item.relevance_reason = Some(format!("Low semantic score ({score:.2})"));
                    rejected.push(item);
                } else {
                    candidates.push(item);
                }
            }
        }

        report(
            progress,
            format!("Step 3: AI deep analysis for {} candidates...", candidates.len()),
        )
        .await;

        let total = candidates.len();
        let total_chunks = total.div_ceil(self.chunk_size);
        let chunks: Vec<Vec<NewsItem>> = candidates
            .chunks(self.chunk_size)
            .map(|c| c.to_vec())
            .collect();

        let mut quota_exhausted = false;
        let mut completed = 0usize;

        for (chunk_idx, chunk) in chunks.into_iter().enumerate() {
            let chunk_len = chunk.len();

            if quota_exhausted {
                // Once degraded, the classification capability is not
                // re-contacted for the remainder of this run.
                for mut item in chunk {
                    if resolve_by_score(&mut item, "AI quota limit") {
                        accepted.push(item);
                    } else {
                        rejected.push(item);
                    }
                }
            } else {
                report(
                    progress,
                    format!(
                        "Analyzing batch {}/{} ({} items)...",
                        chunk_idx + 1,
                        total_chunks,
                        chunk_len
                    ),
                )
                .await;

                match self.judgment_retry.run(|| self.judge_chunk(&chunk)).await {
                    Ok(decisions) => {
                        for mut item in chunk {
                            match decisions.get(&item.id) {
                                Some(decision) => {
                                    apply_decision(&mut item, decision);
                                    if decision.is_relevant {
                                        accepted.push(item);
                                    } else {
                                        info!(
                                            reason = %decision.reason,
                                            "AI rejected candidate: {}",
                                            item.headline
                                        );
                                        rejected.push(item);
                                    }
                                }
                                None => {
                                    // Fail-safe default: absent from the
                                    // mapping means rejected, never dropped.
                                    item.is_relevant = Some(false);
                                    item.relevance_reason =
                                        Some("No decision returned for item".to_string());
                                    rejected.push(item);
                                }
                            }
                        }
                    }
                    Err(ModelError::QuotaExceeded(_)) => {
                        report(
                            progress,
                            "Batch AI limit reached. Switching to score-based curation for remaining items.",
                        )
                        .await;
                        quota_exhausted = true;
                        for mut item in chunk {
                            if resolve_by_score(&mut item, "AI quota limit") {
                                accepted.push(item);
                            } else {
                                rejected.push(item);
                            }
                        }
                    }
                    Err(e) => {
                        report(
                            progress,
                            format!(
                                "Batch {} failed: {e}. Recovering strong matches.",
                                chunk_idx + 1
                            ),
                        )
                        .await;
                        for mut item in chunk {
                            if resolve_by_score(&mut item, "AI error recovery") {
                                accepted.push(item);
                            } else {
                                rejected.push(item);
                            }
                        }
                    }
                }
            }

            completed += chunk_len;
            report_chunk(progress, completed.min(total), total).await;
        }

        (accepted, rejected)
    }

    /// One classification call for one chunk of candidates. Returns the
    /// per-id decision mapping.
    async fn judge_chunk(&self, chunk: &[NewsItem]) -> ModelResult<HashMap<String, Decision>> {
        let prompt = batch_prompt(chunk);
        let text = self.model.generate(&prompt).await?;
        let decisions: HashMap<String, Decision> =
            serde_json::from_str(strip_code_fences(&text))?;
        Ok(decisions)
    }

    /// Legacy single-item curation, used for manual re-checks.
    pub async fn curate(&self, headline: &str, snippet: &str) -> Decision {
        let keyword = { self.examples.lock().await.check_keywords(headline) };

        if let Some(kw) = keyword {
            let reason = format!("Contains key entity: {kw}");
            // Keyword match still runs the full judgment; the AI may
            // reject a domestic or high-income-country keyword hit.
            return match self
                .judgment_retry
                .run(|| self.judge_single(headline, snippet, 1.0, &reason))
                .await
            {
                Ok(decision) => decision,
                Err(e) => {
                    error!("AI categorization failed for keyword match: {e}");
                    Decision {
                        is_relevant: true,
                        confidence: 0.8,
                        reason: format!("{reason} (AI unavailable)"),
                        section: Some(PLACEHOLDER_SECTION.to_string()),
                        subsection: None,
                        rewritten_headline: Some(headline.to_string()),
                    }
                }
            };
        }

        let (score, semantic_reason) = self.semantic_score(headline).await;

        if score < SINGLE_ITEM_AUTO_REJECT {
            info!("auto-rejected by semantic score {score:.3}: {headline}");
            return Decision {
                is_relevant: false,
                confidence: 0.9,
                reason: format!("Auto-rejected (semantic score {score:.2}): {semantic_reason}"),
                section: None,
                subsection: None,
                rewritten_headline: Some(headline.to_string()),
            };
        }

        match self
            .judgment_retry
            .run(|| self.judge_single(headline, snippet, score, &semantic_reason))
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                error!("AI final judgment failed after retries: {e}");
                Decision {
                    is_relevant: score > CLEAR_SIGNAL_BAND,
                    confidence: 0.5,
                    reason: format!("AI unavailable. Semantic reason: {semantic_reason}"),
                    section: Some(PLACEHOLDER_SECTION.to_string()),
                    subsection: None,
                    rewritten_headline: Some(headline.to_string()),
                }
            }
        }
    }

    async fn semantic_score(&self, headline: &str) -> (f32, String) {
        match self.embed_headlines(&[headline.to_string()]).await {
            Ok(embeddings) => {
                let cache = self.cache.lock().await;
                match (cache.as_ref(), embeddings.into_iter().next().flatten()) {
                    (Some(cache), Some(embedding)) => differential_score(cache, &embedding),
                    _ => (0.0, "Embedding unavailable".to_string()),
                }
            }
            Err(e) => {
                warn!("semantic scoring unavailable: {e}");
                (0.0, "Embedding unavailable".to_string())
            }
        }
    }

    async fn judge_single(
        &self,
        headline: &str,
        snippet: &str,
        score: f32,
        semantic_reason: &str,
    ) -> ModelResult<Decision> {
        let prompt = single_prompt(headline, snippet, score, semantic_reason);
        let text = self.model.generate(&prompt).await?;
        let decision: Decision = serde_json::from_str(strip_code_fences(&text))?;
        Ok(decision)
    }

    /// Categorizes an item the user restored from the rejected list,
    /// assuming it is relevant.
    pub async fn force_categorize(&self, headline: &str, snippet: &str) -> Decision {
        let prompt = force_prompt(headline, snippet);
        match self
            .rewrite_retry
            .run(|| async { self.model.generate(&prompt).await })
            .await
        {
            Ok(text) => match serde_json::from_str::<Decision>(strip_code_fences(&text)) {
                Ok(mut decision) => {
                    if let Some(rh) = decision.rewritten_headline.take() {
                        decision.rewritten_headline = Some(ensure_period(&rh));
                    }
                    decision
                }
                Err(e) => {
                    error!("force categorization returned malformed output: {e}");
                    fallback_restore_decision(headline)
                }
            },
            Err(e) => {
                error!("force categorization failed: {e}");
                fallback_restore_decision(headline)
            }
        }
    }

    /// Rewrites a single headline to house style. Falls back to the input
    /// unchanged when the model is unavailable.
    pub async fn rewrite_headline(&self, headline: &str) -> String {
        let prompt = rewrite_prompt(headline);
        match self
            .rewrite_retry
            .run(|| async { self.model.generate(&prompt).await })
            .await
        {
            Ok(text) => {
                let mut result = text.trim().to_string();
                if result.len() >= 2 && result.starts_with('"') && result.ends_with('"') {
                    result = result[1..result.len() - 1].to_string();
                }
                ensure_period(&result)
            }
            Err(e) => {
                warn!("headline rewrite failed: {e}");
                headline.to_string()
            }
        }
    }

    /// Feedback loop: records a user correction as a new labeled example.
    /// Idempotent per cleaned headline and polarity. The store is
    /// persisted synchronously; only the new example's embedding is
    /// appended to the in-memory cache.
    pub async fn add_example(&self, headline: &str, is_relevant: bool, reason: &str) -> Result<()> {
        let headline = parser::clean_headline(headline);
        if headline.is_empty() {
            return Ok(());
        }

        {
            let mut store = self.examples.lock().await;
            if store.contains(&headline, is_relevant) {
                info!(
                    "skipping duplicate {} example: {headline}",
                    polarity_name(is_relevant)
                );
                return Ok(());
            }
            store.push(headline.clone(), reason.to_string(), is_relevant);
            store.save().context("Failed to persist example store")?;
            info!(
                "saved new {} example: {headline}",
                polarity_name(is_relevant)
            );
        }

        // Incremental cache update: embed only the new item. If the cache
        // has not been materialized yet, the first scoring pass will pick
        // the example up from the store.
        match scorer::embed_texts(
            self.model.as_ref(),
            &self.embed_retry,
            std::slice::from_ref(&headline),
        )
        .await
        {
            Ok(mut embeddings) => {
                if let Some(embedding) = embeddings.pop().flatten() {
                    let mut cache = self.cache.lock().await;
                    if let Some(cache) = cache.as_mut() {
                        let example = crate::scorer::EmbeddedExample {
                            headline,
                            reason: reason.to_string(),
                            embedding,
                        };
                        if is_relevant {
                            cache.relevant.push(example);
                        } else {
                            cache.irrelevant.push(example);
                        }
                        info!("updated in-memory embeddings for new example");
                    }
                }
            }
            Err(e) => warn!("failed to embed new example: {e}"),
        }

        Ok(())
    }

    /// Number of stored examples per polarity, mainly for run summaries.
    pub async fn example_counts(&self) -> (usize, usize) {
        let store = self.examples.lock().await;
        (
            store.relevant_examples.len(),
            store.irrelevant_examples.len(),
        )
    }
}

fn polarity_name(is_relevant: bool) -> &'static str {
    if is_relevant {
        "relevant"
    } else {
        "irrelevant"
    }
}

fn ensure_period(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

fn fallback_restore_decision(headline: &str) -> Decision {
    Decision {
        is_relevant: true,
        confidence: 1.0,
        reason: "Manual restoration (AI failed)".to_string(),
        section: Some(PLACEHOLDER_SECTION.to_string()),
        subsection: None,
        rewritten_headline: Some(headline.to_string()),
    }
}

/// Applies a classification decision to an item. Accepted items get their
/// headline overwritten with the rewritten form.
fn apply_decision(item: &mut NewsItem, decision: &Decision) {
    item.is_relevant = Some(decision.is_relevant);
    item.confidence = decision.confidence;
    item.relevance_reason = Some(decision.reason.clone());
    if decision.is_relevant {
        item.section = decision.section.clone();
        item.subsection = decision.subsection.clone();
        if let Some(rh) = &decision.rewritten_headline {
            let rh = ensure_period(rh);
            item.headline = rh.clone();
            item.rewritten_headline = Some(rh);
        }
    }
}

/// Resolves an item by semantic score alone (degraded mode). Returns true
/// when the item is accepted.
fn resolve_by_score(item: &mut NewsItem, context: &str) -> bool {
    if item.semantic_score > DEGRADED_ACCEPT {
        item.is_relevant = Some(true);
        item.confidence = 0.4;
        item.relevance_reason = Some(format!("Strong match ({context})"));
        item.section = Some(PLACEHOLDER_SECTION.to_string());
        item.rewritten_headline = Some(item.headline.clone());
        true
    } else {
        item.is_relevant = Some(false);
        item.confidence = 0.0;
        item.relevance_reason = Some(format!("Weak match ({context})"));
        false
    }
}

const BATCH_POLICY: &str = r#"You are the IFC Singapore Country Manager's STRICT FILTER agent.
**YOUR DEFAULT ANSWER IS "REJECT"**. Only mark is_relevant: true if the item CLEARLY meets relevance criteria AND does NOT match ANY exclusion.

*** CRITICAL: APPLY EXCLUSION RULES FIRST - IF ANY MATCH, REJECT IMMEDIATELY ***

EXCLUSION RULES (REJECT THESE - CHECK EACH ONE):
1. HIGH INCOME COUNTRIES: REJECT investments by Singapore sponsors into high income countries (USA, UK, Germany, Europe, Japan, Australia, Canada, etc.). IFC ONLY focuses on emerging markets.
2. DOMESTIC SINGAPORE SOCIAL: REJECT domestic Singapore social/lifestyle news: demographics, education policy, immigration/manpower policy, general legal/tech commentary without deal context, retail/tourism/dining, crime and police raids (unless systemic banking crisis), local transport/housing/HDB/rental market.
3. NEIGHBOR POLITICS: REJECT domestic politics of Indonesia/Malaysia/Vietnam/Thailand/India UNLESS a specific, explicit Singapore treaty or trade deal is mentioned.
4. PURELY FOREIGN: REJECT regional/international news with NO link to Singapore: foreign bilateral deals, foreign company IPOs without a Singapore sponsor, regional bank internal strategies, regional banking risks without stated Singapore exposure.
5. GENERAL COMMENTARY: REJECT general trade/economic commentary without an actionable hook.

STRICT RELEVANCE CRITERIA (if NOT excluded, matches ONE?):
1. Pipeline signal (deal/financing): Singapore-based sponsor requiring capital (>$30m), M&A/JV, or scaling into emerging markets.
2. Environment changer (macro/policy): shifts IFC's operating context in Singapore (MAS policy, trade agreements, JS-SEZ).
3. Market-moving capital signal: VC/PE fundraising (later stage), platform build-ups, IPOs in Singapore.
4. Action hook: high-level ministerial trade visits from emerging markets to Singapore.
5. JS-SEZ: any meaningful development regarding the Johor-Singapore Special Economic Zone.

CATEGORIES (ASSIGN ONE):
- Macro Indicators
- Policy & Political Economy
- Financial Institutions & Capital Markets
- Real-Sector Deal Flow
- JS-SEZ

INPUT: List of news items with ID, Headline, Snippet, Semantic Score.

OUTPUT: A JSON object where keys are the item IDs and values are decision objects:
{
    "ID_1": {
        "is_relevant": true,
        "confidence": 0.9,
        "reason": "Pipeline: Singtel expansive M&A (targeting Thai data center)",
        "section": "Financial Institutions & Capital Markets",
        "subsection": "M&A",
        "rewritten_headline": "Singtel explores $500m data center sale in Thailand."
    }
}

CRITICAL FORMATTING RULES ("rewritten_headline"):
1. SENTENCE CASE: only capitalize the first letter and proper nouns.
2. PERIOD: every headline MUST end with a period.
3. NUMBERS & CURRENCY: use "mn", "bn", "k". Currency symbol first (e.g. "$1bn").
4. ATTRIBUTION: if the sponsor is Singapore-based but not globally famous, include "Singapore-based [Entity]" or "[Entity] (Singapore)".
5. DATA ENRICHMENT: if the snippet contains specific data (deal size, growth %, profit, rate value) missing from the headline, inject it. Capture both the absolute amount and the percentage change when available.
6. CLEAN: remove source attribution. Keep < 15 words.

ITEMS TO JUDGE:
"#;

fn batch_prompt(items: &[NewsItem]) -> String {
    let mut prompt = String::from(BATCH_POLICY);
    for item in items {
        let snippet: String = item.snippet.chars().take(SNIPPET_LIMIT).collect();
        prompt.push_str(&format!(
            "\nID: {}\nHeadline: {}\nSnippet: {}\nSemantic Score: {:.3} ({})\n---",
            item.id, item.headline, snippet, item.semantic_score, item.semantic_reason
        ));
    }
    prompt
}

fn single_prompt(headline: &str, snippet: &str, score: f32, semantic_reason: &str) -> String {
    let snippet = if snippet.is_empty() {
        "No snippet available"
    } else {
        snippet
    };
    format!(
        r#"You are the IFC Singapore Country Manager's guardrail agent. Your ONLY job is to filter news to keep those immediately relevant to IFC Singapore.

CONTEXT - "Relevant and Actionable" means ONE of the following is true:
1. Environment changer (macro/policy): shifts IFC's operating context in Singapore (growth, inflation, rates/liquidity, regulatory, trade/geo dynamics).
2. Pipeline signal (deal/financing): Singapore-based sponsor requiring capital (>$30m), pursuing M&A/JV/LOI, or scaling into IFC sectors/geographies.
3. Market-moving capital signal: VC/PE fundraising (later stage), platform build-ups, IPOs, shifts in banking/asset management.
4. Action hook for the office: warrants outreach, internal coordination, or a watchlist entry.

NEWS ITEM:
Headline: "{headline}"
Snippet: "{snippet}"
Semantic Score: {score:.3} ({semantic_reason})

OUTPUT (JSON only):
{{
    "is_relevant": true/false,
    "confidence": 0.0-1.0,
    "reason": "Cite the specific criteria matched (e.g. 'Pipeline: Singtel expansive M&A').",
    "section": "Category name or null if irrelevant",
    "subsection": "Specific subsection if applicable (e.g. 'M&A', 'Policy', 'Fundraising'), or null",
    "rewritten_headline": "Clean headline with period."
}}"#
    )
}

fn force_prompt(headline: &str, snippet: &str) -> String {
    let snippet = if snippet.is_empty() {
        "No snippet available"
    } else {
        snippet
    };
    format!(
        r#"You are the IFC Singapore Country Manager's guardrail agent.
You are being forced to CATEGORIZE an article that was previously rejected.
Assume it IS relevant and find the best fit category.

NEWS ITEM:
Headline: "{headline}"
Snippet: "{snippet}"

CATEGORIES (ASSIGN ONE):
- IFC Portfolio / Pipeline Highlights
- Macro Indicators
- Policy & Political Economy
- Financial Institutions & Capital Markets
- Real-Sector Deal Flow

OUTPUT (JSON only):
{{
    "is_relevant": true,
    "confidence": 1.0,
    "reason": "Manual restoration by user.",
    "section": "Category name",
    "subsection": "Specific subsection if applicable",
    "rewritten_headline": "Clean headline with period (sentence case)."
}}"#
    )
}

fn rewrite_prompt(headline: &str) -> String {
    format!(
        r#"Rewrite this headline for a professional investment briefing.
Rules:
1. Sentence case (capitalize only the first letter and proper nouns like "Southeast Asia", "Esso").
2. NUMBERS & CURRENCY: use "mn", "bn", "k". Currency symbol first (e.g. "$1.5bn", "S$50mn"). NEVER "1.5bn USD".
3. SMART LINKING: put brackets `[]` around the main subject entity (e.g. "[Singtel] acquires...").
4. Remove source suffixes. End with a period. Concise (<15 words).

Original: "{headline}"

Return ONLY the rewritten headline."#
    )
}
