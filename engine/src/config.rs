use std::time::Duration;

/// Tunables for matching, scoring, highlighting, and bookkeeping caps.
/// Defaults follow the production settings; tests override individual
/// fields where a property depends on them.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum Jaro-Winkler similarity for a fuzzy term match.
    pub fuzzy_threshold: f64,
    pub title_boost: f32,
    pub content_boost: f32,
    pub summary_boost: f32,
    pub author_boost: f32,
    pub tag_boost: f32,
    pub highlight_pre: String,
    pub highlight_post: String,
    /// Characters of context on each side of a content snippet match.
    pub snippet_context: usize,
    pub max_snippets: usize,
    pub response_cache_ttl: Duration,
    pub history_cap: usize,
    pub analytics_cap: usize,
    pub suggestion_cap: usize,
    pub debounce_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            title_boost: 3.0,
            content_boost: 1.0,
            summary_boost: 2.0,
            author_boost: 1.5,
            tag_boost: 2.5,
            highlight_pre: "<mark>".to_string(),
            highlight_post: "</mark>".to_string(),
            snippet_context: 50,
            max_snippets: 3,
            response_cache_ttl: Duration::from_secs(5 * 60),
            history_cap: 50,
            analytics_cap: 1000,
            suggestion_cap: 10,
            debounce_delay: Duration::from_millis(300),
        }
    }
}
