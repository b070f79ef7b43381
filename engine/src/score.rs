use crate::article::Article;
use crate::config::SearchConfig;
use crate::index::InvertedIndex;
use crate::response::ScoreExplanation;
use time::OffsetDateTime;

const FRESHNESS_WINDOW_DAYS: f64 = 30.0;
const FRESHNESS_WEIGHT: f32 = 0.5;
const POPULARITY_WEIGHT: f32 = 0.1;

/// Additive relevance score for one candidate. Order-independent across
/// terms, never negative. Each query term contributes a field-presence
/// boost per matching field plus a TF-IDF component; freshness and
/// popularity are added once per article.
pub fn score_article(
    article: &Article,
    terms: &[String],
    index: &InvertedIndex,
    corpus_size: usize,
    now: OffsetDateTime,
    config: &SearchConfig,
) -> f32 {
    let mut score = 0.0f32;

    let title = article.title.to_lowercase();
    let content = article.content.to_lowercase();
    let summary = article.summary.as_deref().map(str::to_lowercase);
    let author = article.author.to_lowercase();
    let tags: Vec<String> = article.tags.iter().map(|t| t.to_lowercase()).collect();

    for term in terms {
        if title.contains(term.as_str()) {
            score += config.title_boost;
        }
        if content.contains(term.as_str()) {
            score += config.content_boost;
        }
        if summary.as_deref().is_some_and(|s| s.contains(term.as_str())) {
            score += config.summary_boost;
        }
        if author.contains(term.as_str()) {
            score += config.author_boost;
        }
        if tags.iter().any(|t| t.contains(term.as_str())) {
            score += config.tag_boost;
        }
        score += tf_idf(term, article, index, corpus_size);
    }

    score += freshness_bonus(article, now);
    score += popularity_bonus(article);

    score.max(0.0)
}

fn tf_idf(term: &str, article: &Article, index: &InvertedIndex, corpus_size: usize) -> f32 {
    let word_count = index.word_count(&article.id);
    let df = index.document_frequency(term);
    if word_count == 0 || df == 0 || corpus_size == 0 {
        return 0.0;
    }
    let tf = index.term_frequency(term, &article.id) as f32 / word_count as f32;
    let idf = (corpus_size as f32 / df as f32).ln();
    tf * idf
}

/// Linear decay to zero at 30 days, clamped non-negative.
fn freshness_bonus(article: &Article, now: OffsetDateTime) -> f32 {
    let age_days = (now - article.published_at).as_seconds_f64() / 86_400.0;
    let decay = (1.0 - age_days / FRESHNESS_WINDOW_DAYS).max(0.0);
    decay as f32 * FRESHNESS_WEIGHT
}

fn popularity_bonus(article: &Article) -> f32 {
    match article.view_count {
        Some(views) => ((views + 1) as f32).ln() * POPULARITY_WEIGHT,
        None => 0.0,
    }
}

/// Approximate provenance split for debuggability. Illustrative only.
pub fn explain(score: f32) -> ScoreExplanation {
    ScoreExplanation {
        text_matching: score * 0.7,
        freshness: score * 0.2,
        popularity: score * 0.1,
    }
}
