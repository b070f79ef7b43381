use crate::article::{Article, ArticleId};
use crate::config::SearchConfig;
use crate::index::InvertedIndex;
use crate::matcher::{apply_filters, match_candidates};
use crate::query::{SearchQuery, SortSpec};
use crate::response::{
    SearchResponse, SearchResultItem, SearchSuggestion, SuggestionKind,
};
use crate::results::{compute_facets, highlight, paginate, sort_items};
use crate::score::{explain, score_article};
use crate::session::{
    load_analytics, load_history, persist_list, trending_from_analytics, SearchHistoryItem,
    SearchRecord, TrendingQuery,
};
use crate::storage::{KeyValueStore, ANALYTICS_KEY, HISTORY_KEY, SESSION_ID_KEY};
use crate::tokenizer::tokenize;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use time::OffsetDateTime;
use uuid::Uuid;

struct CachedResponse {
    response: SearchResponse,
    stored_at: Instant,
}

/// The search engine: owns the corpus, the inverted index, and the
/// session bookkeeping. Corpus mutation takes `&mut self`; `search`
/// takes `&self` and keeps its side-effect state behind mutexes, which
/// matches the single-writer/many-reader pattern the engine assumes.
pub struct SearchEngine {
    corpus: HashMap<ArticleId, Article>,
    index: InvertedIndex,
    config: SearchConfig,
    storage: Box<dyn KeyValueStore>,
    session_id: String,
    history: Mutex<Vec<SearchHistoryItem>>,
    analytics: Mutex<Vec<SearchRecord>>,
    trending: Mutex<HashMap<String, u32>>,
    cache: Mutex<HashMap<String, CachedResponse>>,
    click_through_rate: Mutex<f64>,
}

/// Introspection snapshot for dashboards and the CLI `stats` command.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatistics {
    pub total_articles: usize,
    pub indexed_terms: usize,
    pub cached_responses: usize,
    pub history_items: usize,
    pub analytics_records: usize,
    pub trending_queries: usize,
    pub click_through_rate: f64,
    pub session_id: String,
}

impl SearchEngine {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_config(storage, SearchConfig::default())
    }

    pub fn with_config(storage: Box<dyn KeyValueStore>, config: SearchConfig) -> Self {
        let session_id = load_or_create_session_id(storage.as_ref());
        let history = load_history(storage.as_ref());
        let analytics = load_analytics(storage.as_ref());
        let trending = trending_from_analytics(&analytics);
        tracing::info!(
            session_id,
            history = history.len(),
            analytics = analytics.len(),
            "search engine ready"
        );
        Self {
            corpus: HashMap::new(),
            index: InvertedIndex::new(),
            config,
            storage,
            session_id,
            history: Mutex::new(history),
            analytics: Mutex::new(analytics),
            trending: Mutex::new(trending),
            cache: Mutex::new(HashMap::new()),
            click_through_rate: Mutex::new(0.0),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // --- corpus maintenance -------------------------------------------------

    /// Replace the corpus and rebuild the index from scratch.
    pub fn initialize(&mut self, articles: Vec<Article>) {
        self.corpus = articles.into_iter().map(|a| (a.id.clone(), a)).collect();
        self.index.rebuild(self.corpus.values());
        self.cache.lock().clear();
        tracing::info!(
            articles = self.corpus.len(),
            terms = self.index.term_count(),
            "index rebuilt"
        );
    }

    /// Append new articles, indexing only them.
    pub fn add_articles(&mut self, articles: Vec<Article>) {
        for article in articles {
            self.index.index_article(&article);
            self.corpus.insert(article.id.clone(), article);
        }
        self.cache.lock().clear();
    }

    /// Replace an existing article and rebuild. Full rebuild keeps the
    /// postings exact; updates are rare next to searches so the O(corpus)
    /// cost is fine.
    pub fn update_article(&mut self, article: Article) {
        self.corpus.insert(article.id.clone(), article);
        self.index.rebuild(self.corpus.values());
        self.cache.lock().clear();
    }

    pub fn remove_article(&mut self, id: &str) {
        if self.corpus.remove(id).is_some() {
            self.index.rebuild(self.corpus.values());
            self.cache.lock().clear();
        }
    }

    // --- primary read path --------------------------------------------------

    /// Run one search. Never fails: an empty candidate set is a response
    /// with `total: 0`, and persistence trouble only costs bookkeeping.
    pub fn search(&self, query: &SearchQuery) -> SearchResponse {
        let started = Instant::now();
        let cache_key = query.cache_key();

        if let Some(hit) = self.cached_response(&cache_key) {
            tracing::debug!(text = %query.text, "response cache hit");
            return hit;
        }

        let now = OffsetDateTime::now_utc();
        let terms = tokenize(&query.text);
        let candidates =
            match_candidates(&terms, &self.index, &self.corpus, self.config.fuzzy_threshold);
        let mut filtered = apply_filters(&candidates, &self.corpus, &query.filters);
        // deterministic base order so equal-score ties paginate stably
        filtered.sort_by(|a, b| a.id.cmp(&b.id));
        let total = filtered.len();

        let facets = query
            .facets
            .then(|| compute_facets(&filtered, now));

        let mut items: Vec<SearchResultItem> = filtered
            .into_iter()
            .map(|article| {
                let score = score_article(
                    article,
                    &terms,
                    &self.index,
                    self.corpus.len(),
                    now,
                    &self.config,
                );
                SearchResultItem {
                    article: article.clone(),
                    score,
                    highlights: None,
                    explanation: Some(explain(score)),
                }
            })
            .collect();

        sort_items(&mut items, query.sort.unwrap_or_else(SortSpec::default));
        let mut page_items = paginate(items, query.page, query.limit);

        if query.highlight && !terms.is_empty() {
            for item in &mut page_items {
                item.highlights = Some(highlight(&item.article, &terms, &self.config));
            }
        }

        let suggestions = self.generate_suggestions(&query.text);
        let limit = query.limit.max(1);
        let took_ms = started.elapsed().as_secs_f64() * 1000.0;
        let response = SearchResponse {
            results: page_items,
            total,
            page: query.page.max(1),
            limit: query.limit,
            total_pages: total.div_ceil(limit),
            facets,
            suggestions,
            query: query.clone(),
            took_ms,
            search_id: Uuid::new_v4().to_string(),
        };

        self.record_search(&response);
        self.cache.lock().insert(
            cache_key,
            CachedResponse { response: response.clone(), stored_at: Instant::now() },
        );
        response
    }

    fn cached_response(&self, key: &str) -> Option<SearchResponse> {
        let cache = self.cache.lock();
        let entry = cache.get(key)?;
        if entry.stored_at.elapsed() < self.config.response_cache_ttl {
            Some(entry.response.clone())
        } else {
            None
        }
    }

    /// Scan cached queries for one with the same text, parsing stored
    /// keys defensively; a malformed key is skipped, never an error.
    pub fn similar_cached(&self, text: &str) -> Option<SearchResponse> {
        let wanted = text.trim().to_lowercase();
        let cache = self.cache.lock();
        for (key, entry) in cache.iter() {
            let Ok(stored) = serde_json::from_str::<SearchQuery>(key) else {
                continue;
            };
            if stored.text.trim().to_lowercase() == wanted
                && entry.stored_at.elapsed() < self.config.response_cache_ttl
            {
                return Some(entry.response.clone());
            }
        }
        None
    }

    // --- suggestions --------------------------------------------------------

    /// Plain-text suggestions: trending queries first, then matching
    /// titles, then matching categories and tags, capped.
    pub fn generate_suggestions(&self, text: &str) -> Vec<String> {
        self.autocomplete(text)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    /// Typed suggestions for typeahead UIs.
    pub fn autocomplete(&self, text: &str) -> Vec<SearchSuggestion> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let cap = self.config.suggestion_cap;
        let mut out: Vec<SearchSuggestion> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        let mut push = |out: &mut Vec<SearchSuggestion>,
                        seen: &mut Vec<String>,
                        suggestion: SearchSuggestion| {
            let dedupe = suggestion.text.to_lowercase();
            if out.len() < cap && !seen.contains(&dedupe) {
                seen.push(dedupe);
                out.push(suggestion);
            }
        };

        let mut trending: Vec<(String, u32)> = self
            .trending
            .lock()
            .iter()
            .filter(|(query, _)| query.to_lowercase().contains(&needle))
            .map(|(query, count)| (query.clone(), *count))
            .collect();
        trending.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (query, count) in trending {
            push(&mut out, &mut seen, SearchSuggestion {
                text: query,
                kind: SuggestionKind::Trending,
                count: Some(count),
            });
        }

        for article in self.corpus.values() {
            if article.title.to_lowercase().contains(&needle) {
                push(&mut out, &mut seen, SearchSuggestion {
                    text: article.title.clone(),
                    kind: SuggestionKind::Title,
                    count: None,
                });
            }
        }

        for article in self.corpus.values() {
            if article.category.to_lowercase().contains(&needle) {
                push(&mut out, &mut seen, SearchSuggestion {
                    text: article.category.clone(),
                    kind: SuggestionKind::Category,
                    count: None,
                });
            }
            for tag in &article.tags {
                if tag.to_lowercase().contains(&needle) {
                    push(&mut out, &mut seen, SearchSuggestion {
                        text: tag.clone(),
                        kind: SuggestionKind::Tag,
                        count: None,
                    });
                }
            }
        }

        out
    }

    // --- side-effect bookkeeping --------------------------------------------

    fn record_search(&self, response: &SearchResponse) {
        let query = &response.query;
        let trimmed = query.text.trim();

        if !trimmed.is_empty() {
            let mut history = self.history.lock();
            history.insert(0, SearchHistoryItem {
                id: Uuid::new_v4().to_string(),
                query: query.text.clone(),
                filters: query.filters.clone(),
                timestamp: OffsetDateTime::now_utc(),
                result_count: response.total,
                clicked: false,
            });
            history.truncate(self.config.history_cap);
            persist_list(self.storage.as_ref(), HISTORY_KEY, &history);

            *self.trending.lock().entry(query.text.clone()).or_insert(0) += 1;
        }

        let mut analytics = self.analytics.lock();
        analytics.push(SearchRecord {
            search_id: response.search_id.clone(),
            query: query.text.clone(),
            result_count: response.total,
            took_ms: response.took_ms,
            timestamp: OffsetDateTime::now_utc(),
            session_id: self.session_id.clone(),
            filters: query.filters.clone(),
            clicked_results: Vec::new(),
        });
        let cap = self.config.analytics_cap;
        if analytics.len() > cap {
            let overflow = analytics.len() - cap;
            analytics.drain(..overflow);
        }
        persist_list(self.storage.as_ref(), ANALYTICS_KEY, &analytics);
    }

    /// UI feedback hook: the user opened a result from this search.
    pub fn track_result_click(&self, search_id: &str, article_id: &str) {
        let mut analytics = self.analytics.lock();
        if let Some(record) = analytics.iter_mut().find(|r| r.search_id == search_id) {
            if !record.clicked_results.iter().any(|id| id == article_id) {
                record.clicked_results.push(article_id.to_string());
            }
            let clicked = analytics.iter().filter(|r| !r.clicked_results.is_empty()).count();
            *self.click_through_rate.lock() = clicked as f64 / analytics.len() as f64;
            persist_list(self.storage.as_ref(), ANALYTICS_KEY, &analytics);
        } else {
            tracing::debug!(search_id, "click for unknown search id ignored");
        }
    }

    pub fn mark_history_clicked(&self, history_id: &str) {
        let mut history = self.history.lock();
        if let Some(item) = history.iter_mut().find(|h| h.id == history_id) {
            item.clicked = true;
            persist_list(self.storage.as_ref(), HISTORY_KEY, &history);
        }
    }

    // --- introspection ------------------------------------------------------

    pub fn search_history(&self) -> Vec<SearchHistoryItem> {
        self.history.lock().clone()
    }

    pub fn clear_search_history(&self) {
        self.history.lock().clear();
        if let Err(err) = self.storage.remove(HISTORY_KEY) {
            tracing::warn!(%err, "failed to clear persisted history");
        }
    }

    pub fn analytics(&self) -> Vec<SearchRecord> {
        self.analytics.lock().clone()
    }

    pub fn trending_queries(&self, limit: usize) -> Vec<TrendingQuery> {
        let mut queries: Vec<TrendingQuery> = self
            .trending
            .lock()
            .iter()
            .map(|(query, count)| TrendingQuery { query: query.clone(), count: *count })
            .collect();
        queries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        queries.truncate(limit);
        queries
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            total_articles: self.corpus.len(),
            indexed_terms: self.index.term_count(),
            cached_responses: self.cache.lock().len(),
            history_items: self.history.lock().len(),
            analytics_records: self.analytics.lock().len(),
            trending_queries: self.trending.lock().len(),
            click_through_rate: *self.click_through_rate.lock(),
            session_id: self.session_id.clone(),
        }
    }
}

fn load_or_create_session_id(storage: &dyn KeyValueStore) -> String {
    match storage.get(SESSION_ID_KEY) {
        Ok(Some(id)) if !id.is_empty() => id,
        Ok(_) => {
            let id = Uuid::new_v4().to_string();
            if let Err(err) = storage.set(SESSION_ID_KEY, &id) {
                tracing::warn!(%err, "failed to persist session id");
            }
            id
        }
        Err(err) => {
            tracing::warn!(%err, "session id read failed, using ephemeral id");
            Uuid::new_v4().to_string()
        }
    }
}
