//! Source lookup for the sustainability-only analysis.
//!
//! [`SearchProvider`] is the substitution point for a real search backend.
//! [`StubSearch`] is offline and deterministic: it fabricates placeholder
//! results from the query text and never touches the network.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

const STUB_RESULTS_PER_QUERY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Looks up supporting articles for a batch of queries.
///
/// Implementations return one entry per query, in order. Backend failures
/// should be logged and reported as empty result lists; the pipeline treats
/// "nothing found" as an informational outcome.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, queries: &[String]) -> Vec<QueryResults>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubSearch;

impl StubSearch {
    #[must_use]
    pub fn results_for(query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        (1..=STUB_RESULTS_PER_QUERY)
            .map(|n| SearchResult {
                title: format!("{query}: source {n}"),
                snippet: format!("Placeholder summary {n} discussing {query}."),
                url: format!("https://search.example/{n}?q={encoded}"),
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, queries: &[String]) -> Vec<QueryResults> {
        queries
            .iter()
            .map(|query| QueryResults {
                query: query.clone(),
                results: Self::results_for(query),
            })
            .collect()
    }
}

/// Builds the lookup queries for a product, most specific first.
#[must_use]
pub fn build_queries(product_title: &str, brand_name: Option<&str>) -> Vec<String> {
    let subject = match brand_name {
        Some(brand) if !product_title.to_lowercase().contains(&brand.to_lowercase()) => {
            format!("{brand} {product_title}")
        }
        _ => product_title.to_string(),
    };

    let mut queries = vec![
        format!("{subject} sustainability"),
        format!("{subject} environmental impact"),
    ];
    if let Some(brand) = brand_name {
        queries.push(format!("{brand} sustainability report"));
    }
    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_queries_prefixes_brand_once() {
        let queries = build_queries("Trail Runner", Some("Nike"));
        assert_eq!(
            queries,
            vec![
                "Nike Trail Runner sustainability",
                "Nike Trail Runner environmental impact",
                "Nike sustainability report",
            ]
        );

        let queries = build_queries("Nike Trail Runner", Some("nike"));
        assert_eq!(queries[0], "Nike Trail Runner sustainability");
    }

    #[test]
    fn build_queries_without_brand() {
        assert_eq!(build_queries("EcoBottle", None).len(), 2);
    }

    #[test]
    fn stub_results_are_deterministic_and_encoded() {
        let first = StubSearch::results_for("eco & co");
        let second = StubSearch::results_for("eco & co");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].url, "https://search.example/1?q=eco%20%26%20co");
    }

    #[test]
    fn stub_returns_nothing_for_blank_query() {
        assert!(StubSearch::results_for("  ").is_empty());
    }

    #[tokio::test]
    async fn stub_search_preserves_query_order() {
        let queries = vec!["a".to_string(), String::new(), "b".to_string()];
        let results = StubSearch.search(&queries).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].query, "a");
        assert!(results[1].results.is_empty());
        assert_eq!(results[2].query, "b");
    }
}
