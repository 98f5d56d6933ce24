use log::debug;
use rapidfuzz::distance::levenshtein;
use serde::Serialize;

use crate::Segment;

/// Highest dissimilarity a segment may score and still be returned
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// A matched segment and its dissimilarity (0 = perfect, 1 = unrelated)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub segment: Segment,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct Entry {
    segment: Segment,
    normalized: String,
}

/// Searchable view over one transcript
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<Entry>,
    threshold: f64,
    limit: Option<usize>,
}

impl SearchIndex {
    pub fn build(segments: &[Segment], threshold: f64) -> Self {
        let entries = segments
            .iter()
            .map(|segment| Entry {
                normalized: normalize(&segment.text),
                segment: segment.clone(),
            })
            .collect::<Vec<_>>();
        debug!("Built search index over {} segments (threshold {threshold})", entries.len());
        Self {
            entries,
            threshold: threshold.clamp(0.0, 1.0),
            limit: None,
        }
    }

    /// Cap the number of results returned per query
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Rank segments against `query`, best first, chronological among ties
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }
        let query_words = query.split(' ').count();

        let mut results = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = dissimilarity(&query, query_words, &entry.normalized);
                (score <= self.threshold).then(|| SearchResult {
                    segment: entry.segment.clone(),
                    score,
                })
            })
            .collect::<Vec<_>>();

        // sort_by is stable, so equal scores keep transcript order
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        debug!("Query {query:?} matched {} segments", results.len());
        results
    }
}

/// One-off search with the default threshold
pub fn search(query: &str, segments: &[Segment]) -> Vec<SearchResult> {
    SearchIndex::build(segments, DEFAULT_THRESHOLD).search(query)
}

/// Lowercase, decode entities, turn punctuation into spaces, collapse whitespace
fn normalize(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let mapped = decoded
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dissimilarity(query: &str, query_words: usize, text: &str) -> f64 {
    if text.is_empty() {
        return 1.0;
    }
    if text.contains(query) {
        return 0.0;
    }

    let words = text.split(' ').collect::<Vec<_>>();
    let lo = query_words.saturating_sub(1).max(1).min(words.len());
    let hi = (query_words + 1).min(words.len());

    let mut best = 1.0_f64;
    for size in lo..=hi {
        for window in words.windows(size) {
            let candidate = window.join(" ");
            let distance = 1.0 - levenshtein::normalized_similarity(query.chars(), candidate.chars());
            best = best.min(distance.clamp(0.0, 1.0));
        }
    }
    best
}
