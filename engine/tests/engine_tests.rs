use engine::{
    Article, MemoryStore, SearchEngine, SearchFilters, SearchQuery, SledStore, SortDirection,
    SortField, SortSpec,
};
use std::collections::HashSet;
use time::{Duration, OffsetDateTime};

fn article(id: &str, title: &str, content: &str, category: &str) -> Article {
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

fn engine_with(articles: Vec<Article>) -> SearchEngine {
    let mut engine = SearchEngine::new(Box::new(MemoryStore::new()));
    engine.initialize(articles);
    engine
}

fn numbered_corpus(n: usize) -> Vec<Article> {
    (0..n)
        .map(|i| {
            article(
                &format!("{i}"),
                &format!("Story number {i}"),
                "daily coverage of events",
                if i % 2 == 0 { "world" } else { "sports" },
            )
        })
        .collect()
}

#[test]
fn ai_query_with_category_filter_returns_exact_hit() {
    let now = OffsetDateTime::now_utc();
    let mut sports = article("2", "Sports update", "match report from the weekend", "sports");
    sports.published_at = now - Duration::days(40);
    let engine = engine_with(vec![
        article("1", "AI breakthrough in healthcare", "new models diagnose earlier", "health"),
        sports,
    ]);

    let query = SearchQuery {
        text: "ai".to_string(),
        filters: SearchFilters { categories: vec!["health".to_string()], ..Default::default() },
        ..Default::default()
    };
    let response = engine.search(&query);
    assert_eq!(response.total, 1);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].article.id, "1");
    assert!(response.results[0].score > 0.0);
}

#[test]
fn empty_query_paginates_whole_corpus() {
    let engine = engine_with(numbered_corpus(25));
    let response = engine.search(&SearchQuery::default());
    assert_eq!(response.total, 25);
    assert_eq!(response.results.len(), 10);
    assert_eq!(response.total_pages, 3);
}

#[test]
fn typo_matches_via_fuzzy_threshold() {
    let engine = engine_with(vec![article(
        "1",
        "Health policy shifts",
        "ministry announces reforms",
        "health",
    )]);
    let response = engine.search(&SearchQuery::text("heath"));
    assert_eq!(response.total, 1);
}

#[test]
fn removed_article_disappears_from_results() {
    let mut engine = engine_with(vec![
        article("1", "Volcano erupts overnight", "ash cloud grounds flights", "world"),
        article("2", "Sports update", "league table unchanged", "sports"),
    ]);
    assert_eq!(engine.search(&SearchQuery::text("volcano")).total, 1);

    engine.remove_article("1");
    assert_eq!(engine.search(&SearchQuery::text("volcano")).total, 0);
}

#[test]
fn initialize_is_idempotent() {
    let corpus = numbered_corpus(12);
    let mut engine = engine_with(corpus.clone());
    let first = engine.search(&SearchQuery::text("story"));

    engine.initialize(corpus);
    let second = engine.search(&SearchQuery::text("story"));

    let ids = |r: &engine::SearchResponse| -> Vec<String> {
        r.results.iter().map(|i| i.article.id.clone()).collect()
    };
    assert_eq!(first.total, second.total);
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn every_result_satisfies_every_filter() {
    let now = OffsetDateTime::now_utc();
    let mut corpus = numbered_corpus(20);
    for (i, a) in corpus.iter_mut().enumerate() {
        a.read_time = Some(i as u32);
        if i % 3 == 0 {
            a.image_url = Some(format!("https://img.example/{i}.jpg"));
        }
        a.published_at = now - Duration::days(i as i64);
    }
    let engine = engine_with(corpus);

    let filters = SearchFilters {
        categories: vec!["world".to_string()],
        date_from: Some(now - Duration::days(10)),
        has_image: Some(true),
        max_read_time: Some(8),
        ..Default::default()
    };
    let query = SearchQuery { filters: filters.clone(), limit: 50, ..Default::default() };
    let response = engine.search(&query);

    assert!(response.total > 0);
    for item in &response.results {
        let a = &item.article;
        assert_eq!(a.category, "world");
        assert!(a.published_at >= now - Duration::days(10));
        assert!(a.image_url.is_some());
        assert!(a.read_time.unwrap() <= 8);
    }
}

#[test]
fn concatenated_pages_cover_full_result_set() {
    let engine = engine_with(numbered_corpus(23));
    let limit = 5;
    let first = engine.search(&SearchQuery { limit, ..Default::default() });
    assert_eq!(first.total, 23);
    assert_eq!(first.total_pages, 5);

    let mut seen: Vec<String> = Vec::new();
    for page in 1..=first.total_pages {
        let response = engine.search(&SearchQuery { page, limit, ..Default::default() });
        seen.extend(response.results.iter().map(|i| i.article.id.clone()));
    }
    assert_eq!(seen.len(), 23);
    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), 23);
}

#[test]
fn out_of_range_page_is_empty_not_an_error() {
    let engine = engine_with(numbered_corpus(3));
    let response = engine.search(&SearchQuery { page: 9, ..Default::default() });
    assert_eq!(response.total, 3);
    assert!(response.results.is_empty());
}

#[test]
fn date_sort_respects_direction() {
    let now = OffsetDateTime::now_utc();
    let mut corpus = numbered_corpus(5);
    for (i, a) in corpus.iter_mut().enumerate() {
        a.published_at = now - Duration::days(i as i64);
    }
    let engine = engine_with(corpus);

    let query = SearchQuery {
        sort: Some(SortSpec { field: SortField::Date, direction: SortDirection::Ascending }),
        ..Default::default()
    };
    let response = engine.search(&query);
    let dates: Vec<_> = response.results.iter().map(|i| i.article.published_at).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn highlighting_wraps_terms_in_markers() {
    let engine = engine_with(vec![article(
        "1",
        "Budget passes parliament",
        "The budget cleared its final reading after a long budget debate.",
        "politics",
    )]);
    let query = SearchQuery { text: "budget".to_string(), highlight: true, ..Default::default() };
    let response = engine.search(&query);
    let highlights = response.results[0].highlights.as_ref().unwrap();
    assert!(highlights.title.as_ref().unwrap().contains("<mark>Budget</mark>"));
    assert!(!highlights.content.is_empty());
    assert!(highlights.content[0].contains("<mark>budget</mark>"));
}

#[test]
fn facets_cover_filtered_set_not_just_page() {
    let engine = engine_with(numbered_corpus(25));
    let query = SearchQuery { facets: true, limit: 5, ..Default::default() };
    let response = engine.search(&query);
    let facets = response.facets.unwrap();
    let total_by_category: usize = facets.categories.iter().map(|c| c.count).sum();
    assert_eq!(total_by_category, 25);
}

#[test]
fn history_round_trips_and_caps_at_fifty() {
    let engine = engine_with(numbered_corpus(3));
    let filters = SearchFilters { categories: vec!["world".to_string()], ..Default::default() };
    engine.search(&SearchQuery {
        text: "story".to_string(),
        filters: filters.clone(),
        ..Default::default()
    });

    let history = engine.search_history();
    assert_eq!(history[0].query, "story");
    assert_eq!(history[0].filters.categories, filters.categories);
    assert!(!history[0].clicked);

    for i in 0..60 {
        engine.search(&SearchQuery::text(format!("query {i}")));
    }
    let history = engine.search_history();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].query, "query 59");
}

#[test]
fn empty_query_text_is_not_recorded_in_history() {
    let engine = engine_with(numbered_corpus(3));
    engine.search(&SearchQuery::default());
    assert!(engine.search_history().is_empty());
}

#[test]
fn mark_history_clicked_sticks() {
    let engine = engine_with(numbered_corpus(3));
    engine.search(&SearchQuery::text("story"));
    let id = engine.search_history()[0].id.clone();
    engine.mark_history_clicked(&id);
    assert!(engine.search_history()[0].clicked);
}

#[test]
fn click_tracking_updates_analytics() {
    let engine = engine_with(numbered_corpus(3));
    let response = engine.search(&SearchQuery::text("story"));
    engine.track_result_click(&response.search_id, "1");

    let records = engine.analytics();
    let record = records.iter().find(|r| r.search_id == response.search_id).unwrap();
    assert_eq!(record.clicked_results, vec!["1".to_string()]);
    assert!(engine.statistics().click_through_rate > 0.0);
}

#[test]
fn trending_counts_repeat_queries() {
    let engine = engine_with(numbered_corpus(3));
    engine.search(&SearchQuery::text("elections"));
    engine.clear_cache();
    engine.search(&SearchQuery::text("elections"));
    engine.search(&SearchQuery::text("weather"));

    let trending = engine.trending_queries(10);
    assert_eq!(trending[0].query, "elections");
    assert_eq!(trending[0].count, 2);
}

#[test]
fn repeat_query_hits_response_cache() {
    let engine = engine_with(numbered_corpus(5));
    let query = SearchQuery::text("story");
    let first = engine.search(&query);
    let second = engine.search(&query);
    // memoized response comes back verbatim, same search id included
    assert_eq!(first.search_id, second.search_id);

    engine.clear_cache();
    let third = engine.search(&query);
    assert_ne!(first.search_id, third.search_id);
}

#[test]
fn suggestions_draw_from_titles_and_trending() {
    let engine = engine_with(vec![
        article("1", "Climate summit opens", "...", "world"),
        article("2", "Climate funding stalls", "...", "world"),
    ]);
    engine.search(&SearchQuery::text("climate change"));

    let suggestions = engine.generate_suggestions("climate");
    assert!(suggestions.iter().any(|s| s == "climate change"));
    assert!(suggestions.iter().any(|s| s.contains("Climate")));
    assert!(suggestions.len() <= 10);
}

#[test]
fn state_survives_restart_via_sled() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut engine =
            SearchEngine::new(Box::new(SledStore::open(dir.path()).unwrap()));
        engine.initialize(numbered_corpus(3));
        engine.search(&SearchQuery::text("story"));
        engine.clear_cache();
        engine.search(&SearchQuery::text("story"));
    }

    let engine = SearchEngine::new(Box::new(SledStore::open(dir.path()).unwrap()));
    assert_eq!(engine.search_history().len(), 2);
    let trending = engine.trending_queries(5);
    assert_eq!(trending[0].query, "story");
    assert_eq!(trending[0].count, 2);
}

#[test]
fn clear_history_empties_state_and_storage() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut engine =
            SearchEngine::new(Box::new(SledStore::open(dir.path()).unwrap()));
        engine.initialize(numbered_corpus(3));
        engine.search(&SearchQuery::text("story"));
        engine.clear_search_history();
        assert!(engine.search_history().is_empty());
    }
    let engine = SearchEngine::new(Box::new(SledStore::open(dir.path()).unwrap()));
    assert!(engine.search_history().is_empty());
}

#[test]
fn update_article_reindexes_old_terms_away() {
    let mut engine = engine_with(vec![article(
        "1",
        "Drought warning issued",
        "reservoir levels fall",
        "world",
    )]);
    assert_eq!(engine.search(&SearchQuery::text("drought")).total, 1);

    let mut updated = article("1", "Flood warning issued", "rivers rise quickly", "world");
    updated.id = "1".to_string();
    engine.update_article(updated);

    assert_eq!(engine.search(&SearchQuery::text("drought")).total, 0);
    assert_eq!(engine.search(&SearchQuery::text("flood")).total, 1);
}

#[test]
fn similar_cached_parses_keys_defensively() {
    let engine = engine_with(numbered_corpus(3));
    engine.search(&SearchQuery::text("story"));
    assert!(engine.similar_cached("STORY ").is_some());
    assert!(engine.similar_cached("unseen query").is_none());
}
