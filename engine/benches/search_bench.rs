use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{Article, MemoryStore, SearchEngine, SearchQuery};
use time::OffsetDateTime;

fn corpus(n: usize) -> Vec<Article> {
    let bodies = [
        "markets rallied after the central bank held rates steady",
        "the championship final went to extra time before a winner emerged",
        "researchers report promising results in early cancer screening",
        "the climate summit closed without a binding agreement",
        "a new budget proposal faces opposition in parliament",
    ];
    (0..n)
        .map(|i| Article {
            id: i.to_string(),
            title: format!("Headline {i} on rotating topics"),
            content: bodies[i % bodies.len()].repeat(8),
            summary: Some("short summary of the piece".to_string()),
            author: format!("Reporter {}", i % 7),
            category: ["world", "sports", "health", "business"][i % 4].to_string(),
            tags: vec!["daily".to_string(), format!("beat-{}", i % 5)],
            published_at: OffsetDateTime::now_utc() - time::Duration::days((i % 90) as i64),
            language: Some("en".to_string()),
            source: Some("wire".to_string()),
            view_count: Some((i * 37) as u64),
            image_url: None,
            read_time: Some((i % 12) as u32),
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let mut engine = SearchEngine::new(Box::new(MemoryStore::new()));
    engine.initialize(corpus(2000));

    c.bench_function("search_exact_term", |b| {
        b.iter(|| {
            engine.clear_cache();
            black_box(engine.search(&SearchQuery::text("markets")))
        })
    });

    c.bench_function("search_fuzzy_typo", |b| {
        b.iter(|| {
            engine.clear_cache();
            black_box(engine.search(&SearchQuery::text("marqets")))
        })
    });

    c.bench_function("search_cached", |b| {
        let query = SearchQuery::text("budget");
        engine.search(&query);
        b.iter(|| black_box(engine.search(&query)))
    });
}

fn bench_indexing(c: &mut Criterion) {
    let articles = corpus(500);
    c.bench_function("initialize_500", |b| {
        b.iter(|| {
            let mut engine = SearchEngine::new(Box::new(MemoryStore::new()));
            engine.initialize(black_box(articles.clone()));
        })
    });
}

criterion_group!(benches, bench_search, bench_indexing);
criterion_main!(benches);
