use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{NewsItem, RawItem};

/// Two cleaned headlines at or above this similarity ratio are duplicates.
const DEDUP_THRESHOLD: f64 = 0.85;

/// Words that keep their original casing when a title-cased headline is
/// rewritten to sentence case: countries, months, institutions, entity and
/// currency abbreviations.
const PROTECTED_WORDS: &[&str] = &[
    "Singapore",
    "Singapore's",
    "Singapores",
    "SG",
    "US",
    "USA",
    "UK",
    "EU",
    "ASEAN",
    "IFC",
    "WBG",
    "GIC",
    "Temasek",
    "DBS",
    "OCBC",
    "UOB",
    "MAS",
    "HDB",
    "CPF",
    "M&A",
    "AI",
    "EV",
    "GDP",
    "IPO",
    "Malaysia",
    "Indonesia",
    "Vietnam",
    "Thailand",
    "Philippines",
    "China",
    "India",
    "Japan",
    "Jan",
    "Feb",
    "Mar",
    "Apr",
    "May",
    "Jun",
    "Jul",
    "Aug",
    "Sep",
    "Oct",
    "Nov",
    "Dec",
];

/// Short acronyms ignored when counting capitalized words for the
/// title-case heuristic.
const COMMON_ACRONYMS: &[&str] = &["ifc", "sg", "us", "uk", "eu", "asean", "gdp"];

fn source_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A separator (hyphen, pipe, colon, en-dash) followed by capitalized
    // word-like text at the end of the string, e.g. " - The Business Times".
    RE.get_or_init(|| Regex::new(r"\s+[-|:–]\s+(?:The\s)?[A-Z][a-zA-Z0-9\s.]+$").unwrap())
}

/// Generates a stable id from the cleaned headline content hash.
pub fn generate_id(headline: &str) -> String {
    blake3::hash(headline.as_bytes()).to_hex().to_string()
}

fn is_protected(word: &str) -> bool {
    let check = word.trim_matches(|c: char| ".,:;!?".contains(c));
    PROTECTED_WORDS.contains(&check) || PROTECTED_WORDS.contains(&check.to_uppercase().as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// Cleans a raw headline into its canonical display form: source suffix
/// stripped, title case rewritten to sentence case with protected words
/// kept, exactly one trailing period. Bracketed `[...]` spans are anchor
/// entity markers and pass through untouched. Empty input cleans to the
/// empty string.
pub fn clean_headline(headline: &str) -> String {
    if headline.trim().is_empty() {
        return String::new();
    }

    let mut headline = source_suffix_re().replace(headline, "").to_string();

    let words: Vec<&str> = headline.split_whitespace().collect();
    if words.len() > 3 {
        let caps_count = words
            .iter()
            .filter(|w| starts_uppercase(w) && !COMMON_ACRONYMS.contains(&w.to_lowercase().as_str()))
            .count();

        if caps_count as f64 / words.len() as f64 > 0.4 {
            let rewritten: Vec<String> = words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    // Bracketed anchor-entity spans pass through verbatim.
                    if w.contains('[') || w.contains(']') {
                        (*w).to_string()
                    } else if i == 0 {
                        capitalize(w)
                    } else if is_protected(w) {
                        (*w).to_string()
                    } else {
                        w.to_lowercase()
                    }
                })
                .collect();
            headline = rewritten.join(" ");
        }
    }

    let mut headline = headline.trim().to_string();
    if !headline.is_empty() && !headline.ends_with('.') {
        headline.push('.');
    }
    headline
}

/// Normalized similarity ratio in [0, 1] between two strings, computed the
/// way difflib's `SequenceMatcher.ratio()` does: twice the number of
/// matching characters over the total length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut matches = 0usize;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(&a, &b, alo, ahi, blo, bhi);
        if size > 0 {
            matches += size;
            pending.push((alo, i, blo, j));
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    2.0 * matches as f64 / total as f64
}

fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate().take(bhi).skip(blo) {
        b2j.entry(c).or_default().push(j);
    }

    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, &c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&c) {
            for &j in positions {
                let run = if j > blo {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

/// Cleans raw items and removes exact-URL and fuzzy-headline duplicates.
/// First-seen wins: the order of the incoming sequence decides which of two
/// near-duplicates survives.
pub fn clean_and_deduplicate(items: &[RawItem]) -> Vec<NewsItem> {
    let mut cleaned: Vec<NewsItem> = Vec::new();

    for item in items {
        let raw_headline = item.headline.trim();
        if raw_headline.is_empty() {
            continue;
        }

        let headline = clean_headline(raw_headline);
        if headline.is_empty() {
            continue;
        }

        if !item.url.is_empty() && cleaned.iter().any(|c| c.url == item.url) {
            continue;
        }

        let is_duplicate = cleaned
            .iter()
            .any(|c| similarity_ratio(&headline, &c.headline) > DEDUP_THRESHOLD);
        if is_duplicate {
            continue;
        }

        cleaned.push(NewsItem::from_raw(item, headline));
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(headline: &str, url: &str) -> RawItem {
        RawItem {
            headline: headline.to_string(),
            snippet: String::new(),
            url: url.to_string(),
            source: "Test".to_string(),
            date: Utc::now(),
        }
    }

    // ==================== Headline Cleaning Tests ====================

    #[test]
    fn test_clean_strips_source_suffix() {
        assert_eq!(
            clean_headline("Singapore exports slump 20% - The Business Times"),
            "Singapore exports slump 20%."
        );
        assert_eq!(
            clean_headline("Temasek portfolio hits record | Reuters"),
            "Temasek portfolio hits record."
        );
    }

    #[test]
    fn test_clean_keeps_interior_separators() {
        let cleaned = clean_headline("GIC-backed fund raises $200m for Asia deals");
        assert!(cleaned.contains("GIC-backed"));
    }

    #[test]
    fn test_clean_enforces_single_trailing_period() {
        assert_eq!(clean_headline("MAS holds policy steady"), "MAS holds policy steady.");
        assert_eq!(clean_headline("MAS holds policy steady."), "MAS holds policy steady.");
    }

    #[test]
    fn test_clean_title_case_to_sentence_case() {
        assert_eq!(
            clean_headline("Singapore Exports Slump Amid Global Trade Tensions"),
            "Singapore exports slump amid global trade tensions."
        );
    }

    #[test]
    fn test_clean_preserves_protected_words() {
        let cleaned = clean_headline("Temasek And GIC Back New Indonesia Fund Launch");
        assert!(cleaned.contains("Temasek"));
        assert!(cleaned.contains("GIC"));
        assert!(cleaned.contains("Indonesia"));
        assert!(cleaned.contains("back new"));
    }

    #[test]
    fn test_clean_short_headline_keeps_case() {
        // 3 words or fewer: the title-case heuristic does not apply.
        assert_eq!(clean_headline("Big Deal Done"), "Big Deal Done.");
    }

    #[test]
    fn test_clean_preserves_brackets() {
        let cleaned = clean_headline("[Singtel] explores data center sale in Thailand");
        assert!(cleaned.starts_with("[Singtel]"));
    }

    #[test]
    fn test_clean_preserves_brackets_in_title_case() {
        // The sentence-case rewrite fires here; the bracketed span must
        // still come through with its casing intact.
        let cleaned = clean_headline("[Singtel] Explores Data Center Sale In Thailand Market");
        assert_eq!(
            cleaned,
            "[Singtel] explores data center sale in Thailand market."
        );

        let mid = clean_headline("Investors Back [Keppel] Infrastructure Fund Launch Today");
        assert!(mid.contains("[Keppel]"));
    }

    #[test]
    fn test_clean_empty_input() {
        assert_eq!(clean_headline(""), "");
        assert_eq!(clean_headline("   "), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "Singapore Exports Slump Amid Global Trade Tensions - Reuters",
            "Temasek portfolio value rises 5.4% to S$382bn",
            "MAS Holds Policy Steady As Inflation Eases | The Straits Times",
            "[Keppel] weighs $1bn infrastructure fund",
        ];
        for s in samples {
            let once = clean_headline(s);
            assert_eq!(clean_headline(&once), once, "not idempotent for {:?}", s);
        }
    }

    // ==================== Similarity Ratio Tests ====================

    #[test]
    fn test_similarity_identical() {
        assert_eq!(similarity_ratio("abc", "abc"), 1.0);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_similarity_near_duplicates() {
        let a = "Singapore's STI breaches 4,900 to hit record highs.";
        let b = "Singapore's STI crosses 4,900 to hit record highs.";
        assert!(similarity_ratio(a, b) > 0.85);
    }

    // ==================== Deduplication Tests ====================

    #[test]
    fn test_dedup_exact_url() {
        let items = vec![
            raw("Singapore exports slump", "https://example.com/a"),
            raw("Completely different headline here", "https://example.com/a"),
        ];
        let cleaned = clean_and_deduplicate(&items);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn test_dedup_fuzzy_headline_first_seen_wins() {
        let items = vec![
            raw(
                "Singapore's STI breaches 4,900 to hit record highs",
                "https://example.com/a",
            ),
            raw(
                "Singapore's STI crosses 4,900 to hit record highs",
                "https://example.com/b",
            ),
            raw("MAS holds monetary policy steady", "https://example.com/c"),
        ];
        let cleaned = clean_and_deduplicate(&items);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned[0].headline.contains("breaches"));
        assert!(cleaned[1].headline.contains("MAS"));
    }

    #[test]
    fn test_dedup_skips_empty_headlines() {
        let items = vec![raw("", "https://example.com/a"), raw("  ", "")];
        assert!(clean_and_deduplicate(&items).is_empty());
    }

    #[test]
    fn test_dedup_assigns_stable_ids() {
        let items = vec![raw("Singapore exports slump", "https://example.com/a")];
        let first = clean_and_deduplicate(&items);
        let second = clean_and_deduplicate(&items);
        assert_eq!(first[0].id, second[0].id);
    }
}
