use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{CurationOutput, RawItem};

/// Get the default data directory for curation runs and the example store
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("briefing-curator");

    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    Ok(data_dir)
}

/// Default location of the persisted example store
pub fn default_examples_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("relevance_examples.json"))
}

/// Load raw connector items from a JSON file
pub fn load_raw_items(filepath: &Path) -> Result<Vec<RawItem>> {
    if !filepath.exists() {
        anyhow::bail!("Raw items file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read raw items file: {}", filepath.display()))?;

    let items: Vec<RawItem> = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse raw items JSON from {}. Expected an array of {{headline, snippet, url, source, date}} objects.",
            filepath.display()
        )
    })?;

    Ok(items)
}

/// Save the accepted/rejected partitions of a run to a JSON file
pub fn save_output(output: &CurationOutput, filepath: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(output).context("Failed to serialize curation output")?;
    fs::write(filepath, json)
        .with_context(|| format!("Failed to write curation output: {}", filepath.display()))?;
    Ok(())
}

/// Load a previously saved run
pub fn load_output(filepath: &Path) -> Result<CurationOutput> {
    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read curation output: {}", filepath.display()))?;

    let output: CurationOutput = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse curation output from {}", filepath.display()))?;

    if output.version != "1.0" {
        anyhow::bail!(
            "Unsupported curation output version: {}. Expected 1.0.",
            output.version
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsItem;
    use chrono::Utc;

    #[test]
    fn test_load_raw_items_missing_file() {
        assert!(load_raw_items(Path::new("/nonexistent/items.json")).is_err());
    }

    #[test]
    fn test_load_raw_items_with_defaults() {
        let dir = std::env::temp_dir().join("curator-test-io");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("items.json");
        fs::write(
            &path,
            r#"[{"headline": "Temasek backs Indian lender", "url": "https://example.com/a"}]"#,
        )
        .unwrap();

        let items = load_raw_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "Unknown");
    }

    #[test]
    fn test_output_round_trip() {
        let dir = std::env::temp_dir().join("curator-test-io-output");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.json");

        let raw = RawItem {
            headline: "x".to_string(),
            snippet: String::new(),
            url: String::new(),
            source: "Test".to_string(),
            date: Utc::now(),
        };
        let item = NewsItem::from_raw(&raw, "Singapore exports slump.".to_string());
        let output = CurationOutput::new(vec![item], vec![]);
        save_output(&output, &path).unwrap();

        let loaded = load_output(&path).unwrap();
        assert_eq!(loaded.accepted.len(), 1);
        assert!(loaded.rejected.is_empty());
        assert_eq!(loaded.version, "1.0");
    }
}
