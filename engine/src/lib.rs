//! In-memory full-text search engine for a news corpus.
//!
//! Builds an inverted index over article text, matches query terms
//! exactly and fuzzily (Jaro-Winkler), scores candidates with field
//! boosts + TF-IDF + freshness + popularity, and assembles sorted,
//! paginated, highlighted, faceted responses. Search history, analytics
//! and trending counters persist through a pluggable key-value store.

pub mod article;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod index;
pub mod matcher;
pub mod query;
pub mod response;
pub mod results;
pub mod score;
pub mod session;
pub mod storage;
pub mod tokenizer;
pub mod voice;

pub use article::{Article, ArticleId};
pub use config::SearchConfig;
pub use debounce::Debouncer;
pub use engine::{EngineStatistics, SearchEngine};
pub use query::{SearchFilters, SearchQuery, SortDirection, SortField, SortSpec};
pub use response::{
    FacetCount, FacetSummary, Highlights, ScoreExplanation, SearchResponse, SearchResultItem,
    SearchSuggestion, SuggestionKind,
};
pub use session::{SearchHistoryItem, SearchRecord, TrendingQuery};
pub use storage::{KeyValueStore, MemoryStore, SledStore};
pub use voice::{SpeechRecognizer, Transcript, VoiceSearch, VoiceSearchError, VoiceSearchResult};

#[cfg(test)]
pub(crate) mod test_util {
    use crate::article::Article;
    use time::OffsetDateTime;

    /// Minimal article for unit tests; published "now" so freshness is
    /// predictable.
    pub fn article(id: &str, title: &str, content: &str, category: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            summary: None,
            author: "Staff Writer".to_string(),
            category: category.to_string(),
            tags: Vec::new(),
            published_at: OffsetDateTime::now_utc(),
            language: None,
            source: None,
            view_count: None,
            image_url: None,
            read_time: None,
        }
    }
}
