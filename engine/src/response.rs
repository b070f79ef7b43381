use crate::article::Article;
use crate::query::SearchQuery;
use serde::{Deserialize, Serialize};

/// One ranked hit: the article plus its score and optional decoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub article: Article,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ScoreExplanation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Highlights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Up to a handful of ellipsis-wrapped content snippets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Approximate percentage split of where the score came from.
/// Illustrative for debugging, not a strict ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreExplanation {
    pub text_matching: f32,
    pub freshness: f32,
    pub popularity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Count-bucketed breakdown of the full filtered candidate set, used to
/// power filter UIs. Computed before pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetSummary {
    pub categories: Vec<FacetCount>,
    pub authors: Vec<FacetCount>,
    pub languages: Vec<FacetCount>,
    pub sources: Vec<FacetCount>,
    /// Rolling windows: articles published within the last 24h, 7d, 30d,
    /// 90d, and 365d.
    pub date_ranges: Vec<FacetCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetSummary>,
    pub suggestions: Vec<String>,
    pub query: SearchQuery,
    pub took_ms: f64,
    pub search_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Trending,
    Title,
    Category,
    Tag,
}

/// Typed autocomplete entry for typeahead UIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub text: String,
    pub kind: SuggestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}
