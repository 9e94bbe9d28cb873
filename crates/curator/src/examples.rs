use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Built-in allowlist used when no persisted store exists yet.
pub const DEFAULT_KEYWORDS: &[&str] = &["IFC", "World Bank", "Singapore", "Temasek", "GIC"];

/// A labeled example headline. Embeddings are never persisted; they are
/// recomputed lazily each process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub headline: String,
    pub reason: String,
}

/// The persisted knowledge base backing the semantic scorer: labeled
/// example headlines plus an always-relevant keyword allowlist. Loaded once
/// at startup, mutated only by the feedback loop, saved synchronously on
/// every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExampleStore {
    #[serde(default)]
    pub relevant_examples: Vec<Example>,
    #[serde(default)]
    pub irrelevant_examples: Vec<Example>,
    #[serde(default)]
    pub keywords_always_relevant: Vec<String>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl ExampleStore {
    /// Loads the store from disk. A missing or malformed file degrades to
    /// an empty store with the built-in keyword allowlist; loading never
    /// fails.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ExampleStore>(&content) {
                Ok(mut store) => {
                    store.path = Some(path.to_path_buf());
                    info!(
                        relevant = store.relevant_examples.len(),
                        irrelevant = store.irrelevant_examples.len(),
                        keywords = store.keywords_always_relevant.len(),
                        "loaded example store"
                    );
                    store
                }
                Err(e) => {
                    warn!("failed to parse example store ({e}), starting empty");
                    Self::empty_with_defaults(path)
                }
            },
            Err(e) => {
                warn!("failed to read example store ({e}), starting empty");
                Self::empty_with_defaults(path)
            }
        }
    }

    fn empty_with_defaults(path: &Path) -> Self {
        Self {
            relevant_examples: Vec::new(),
            irrelevant_examples: Vec::new(),
            keywords_always_relevant: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Persists the full store back to its load path.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .context("Example store has no backing path")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create example store directory")?;
        }
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize example store")?;
        fs::write(path, json).context("Failed to write example store")?;
        Ok(())
    }

    /// Keyword fast path: returns the first allowlisted keyword contained
    /// (case-insensitively) in the headline.
    pub fn check_keywords(&self, headline: &str) -> Option<String> {
        let lower = headline.to_lowercase();
        self.keywords_always_relevant
            .iter()
            .find(|kw| lower.contains(&kw.to_lowercase()))
            .cloned()
    }

    /// Whether an example with this exact headline already exists under the
    /// given polarity.
    pub fn contains(&self, headline: &str, is_relevant: bool) -> bool {
        let list = if is_relevant {
            &self.relevant_examples
        } else {
            &self.irrelevant_examples
        };
        list.iter().any(|ex| ex.headline == headline)
    }

    pub fn push(&mut self, headline: String, reason: String, is_relevant: bool) {
        let example = Example { headline, reason };
        if is_relevant {
            self.relevant_examples.push(example);
        } else {
            self.irrelevant_examples.push(example);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_degrades_to_defaults() {
        let store = ExampleStore::load(Path::new("/nonexistent/examples.json"));
        assert!(store.relevant_examples.is_empty());
        assert!(store
            .keywords_always_relevant
            .iter()
            .any(|k| k == "Temasek"));
    }

    #[test]
    fn test_load_malformed_file_degrades_to_defaults() {
        let dir = std::env::temp_dir().join("curator-test-malformed-store");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("examples.json");
        fs::write(&path, "not json {").unwrap();

        let store = ExampleStore::load(&path);
        assert!(store.relevant_examples.is_empty());
        assert_eq!(
            store.keywords_always_relevant.len(),
            DEFAULT_KEYWORDS.len()
        );
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = std::env::temp_dir().join("curator-test-store-roundtrip");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("examples.json");
        let _ = fs::remove_file(&path);

        let mut store = ExampleStore::load(&path);
        store.push(
            "Singtel explores $500m data center sale.".to_string(),
            "Pipeline signal".to_string(),
            true,
        );
        store.save().unwrap();

        let reloaded = ExampleStore::load(&path);
        assert_eq!(reloaded.relevant_examples.len(), 1);
        assert_eq!(
            reloaded.relevant_examples[0].headline,
            "Singtel explores $500m data center sale."
        );
    }

    #[test]
    fn test_check_keywords_case_insensitive() {
        let store = ExampleStore::load(Path::new("/nonexistent/examples.json"));
        assert_eq!(
            store.check_keywords("TEMASEK raises stake in Indian lender"),
            Some("Temasek".to_string())
        );
        assert_eq!(store.check_keywords("Malaysia election results"), None);
    }

    #[test]
    fn test_contains_is_polarity_scoped() {
        let mut store = ExampleStore::default();
        store.push("Some headline.".to_string(), "reason".to_string(), true);
        assert!(store.contains("Some headline.", true));
        assert!(!store.contains("Some headline.", false));
    }
}
