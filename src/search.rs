//! Lexical retrieval over the document store.
//!
//! Scoring is deliberately simple substring counting, not embeddings:
//! the query is lowercased and split on whitespace, and each distinct
//! token contributes the number of times it occurs as a substring of
//! the lowercased chunk text. A short token like `"a"` therefore also
//! matches inside longer words and inflates scores; this is an
//! accepted property of the method, which trades precision for zero
//! model dependencies and full reproducibility.

use std::collections::HashSet;
use std::sync::Arc;

use crate::store::{Chunk, DocumentStore};

/// Scores and ranks chunks against a query. Stateless apart from the
/// shared store handle.
pub struct Retriever {
    store: Arc<DocumentStore>,
}

impl Retriever {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Return the best-matching chunks for `query`, best first, at
    /// most `k` of them.
    ///
    /// Chunks with no matching token are excluded entirely. Ties keep
    /// the store's insertion order (stable sort), so identical inputs
    /// always produce identical output.
    pub fn search(&self, query: &str, k: usize) -> Vec<&Chunk> {
        let query_lower = query.to_lowercase();
        let tokens: HashSet<&str> = query_lower.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &Chunk)> = self
            .store
            .chunks()
            .iter()
            .filter_map(|chunk| {
                let content_lower = chunk.content.to_lowercase();
                let score: usize = tokens
                    .iter()
                    .map(|token| content_lower.matches(*token).count())
                    .sum();
                (score > 0).then_some((score, chunk))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(k);
        scored.into_iter().map(|(_, chunk)| chunk).collect()
    }

    /// Retrieved chunk contents joined with a blank line, ready to
    /// embed in a prompt. Empty string when nothing matches.
    pub fn get_context(&self, query: &str, k: usize) -> String {
        let results = self.search(query, k);
        if results.is_empty() {
            return String::new();
        }
        results
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(contents: &[&str]) -> Arc<DocumentStore> {
        let chunks = contents
            .iter()
            .enumerate()
            .map(|(i, content)| Chunk {
                content: content.to_string(),
                source: format!("doc{}.txt", i),
            })
            .collect();
        Arc::new(DocumentStore::from_chunks(chunks))
    }

    #[test]
    fn test_higher_count_ranks_first() {
        let store = make_store(&[
            "The beach was windy.",
            "Mocha the cat chased the cat toy.",
            "Mocha napped all day.",
        ]);
        let retriever = Retriever::new(store);
        let results = retriever.search("cat", 3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "Mocha the cat chased the cat toy.");
    }

    #[test]
    fn test_zero_match_excluded() {
        let store = make_store(&["We hiked the ridge.", "Dinner at the lake house."]);
        let retriever = Retriever::new(store);
        assert!(retriever.search("picnic", 3).is_empty());
        assert_eq!(retriever.get_context("picnic", 3), "");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let store = make_store(&["MOCHA loves the WINDOW seat."]);
        let retriever = Retriever::new(store);
        assert_eq!(retriever.search("mocha Window", 3).len(), 1);
    }

    #[test]
    fn test_substring_match_inside_words() {
        // "cat" scores against "scattered" -- substring counting, not
        // word-boundary matching.
        let store = make_store(&["Leaves scattered across the porch."]);
        let retriever = Retriever::new(store);
        assert_eq!(retriever.search("cat", 3).len(), 1);
    }

    #[test]
    fn test_duplicate_query_tokens_count_once() {
        let store = make_store(&["tea in the garden", "tea and more tea"]);
        let retriever = Retriever::new(store.clone());
        let repeated = retriever.search("tea tea tea", 3);
        let single = retriever.search("tea", 3);
        assert_eq!(repeated.len(), single.len());
        assert_eq!(repeated[0].content, single[0].content);
        assert_eq!(repeated[0].content, "tea and more tea");
    }

    #[test]
    fn test_ties_keep_store_order() {
        let store = make_store(&["rain on the roof", "rain in spring", "rain at sea"]);
        let retriever = Retriever::new(store);
        let results = retriever.search("rain", 3);
        assert_eq!(results[0].content, "rain on the roof");
        assert_eq!(results[1].content, "rain in spring");
        assert_eq!(results[2].content, "rain at sea");
    }

    #[test]
    fn test_top_k_truncation() {
        let store = make_store(&["sun", "sun", "sun", "sun"]);
        let retriever = Retriever::new(store);
        assert_eq!(retriever.search("sun", 2).len(), 2);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let store = make_store(&["anything at all"]);
        let retriever = Retriever::new(store);
        assert!(retriever.search("", 3).is_empty());
        assert!(retriever.search("   ", 3).is_empty());
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        let retriever = Retriever::new(Arc::new(DocumentStore::from_chunks(Vec::new())));
        assert!(retriever.search("cat", 3).is_empty());
        assert_eq!(retriever.get_context("cat", 3), "");
    }

    #[test]
    fn test_context_joins_with_blank_line() {
        let store = make_store(&["star gazing on the hill", "star charts on the wall"]);
        let retriever = Retriever::new(store);
        let context = retriever.get_context("star", 3);
        assert_eq!(
            context,
            "star gazing on the hill\n\nstar charts on the wall"
        );
    }

    #[test]
    fn test_search_is_deterministic() {
        let store = make_store(&["apples and pears", "pears and plums", "plums and apples"]);
        let retriever = Retriever::new(store);
        let first: Vec<String> = retriever
            .search("and plums", 3)
            .iter()
            .map(|c| c.content.clone())
            .collect();
        for _ in 0..10 {
            let again: Vec<String> = retriever
                .search("and plums", 3)
                .iter()
                .map(|c| c.content.clone())
                .collect();
            assert_eq!(first, again);
        }
    }
}
