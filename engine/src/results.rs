use crate::article::Article;
use crate::config::SearchConfig;
use crate::query::{SortDirection, SortField, SortSpec};
use crate::response::{FacetCount, FacetSummary, Highlights, SearchResultItem};
use std::cmp::Ordering;
use std::collections::HashMap;
use time::{Duration, OffsetDateTime};

const AUTHOR_FACET_CAP: usize = 20;
const SOURCE_FACET_CAP: usize = 15;

/// Sort scored items in place. Relevance-descending is the default;
/// ties keep the order the underlying stable sort gives them.
pub fn sort_items(items: &mut [SearchResultItem], spec: SortSpec) {
    items.sort_by(|a, b| {
        let ord = match spec.field {
            SortField::Relevance => a
                .score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal),
            SortField::Date => a.article.published_at.cmp(&b.article.published_at),
            SortField::Popularity => a
                .article
                .view_count
                .unwrap_or(0)
                .cmp(&b.article.view_count.unwrap_or(0)),
            SortField::ReadTime => a
                .article
                .read_time
                .unwrap_or(0)
                .cmp(&b.article.read_time.unwrap_or(0)),
            SortField::Author => a.article.author.cmp(&b.article.author),
        };
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// 1-indexed page slice; out-of-range pages are empty, not an error.
pub fn paginate(items: Vec<SearchResultItem>, page: usize, limit: usize) -> Vec<SearchResultItem> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(limit);
    items.into_iter().skip(start).take(limit).collect()
}

/// Wrap every case-insensitive occurrence of each query term in the
/// configured markers; content matches become short snippets with
/// surrounding context rather than the whole body.
pub fn highlight(article: &Article, terms: &[String], config: &SearchConfig) -> Highlights {
    let mut highlights = Highlights::default();

    let title = mark_terms(&article.title, terms, config);
    if title != article.title {
        highlights.title = Some(title);
    }
    if let Some(summary) = &article.summary {
        let marked = mark_terms(summary, terms, config);
        if marked != *summary {
            highlights.summary = Some(marked);
        }
    }
    highlights.content = content_snippets(&article.content, terms, config);
    highlights
}

fn mark_terms(text: &str, terms: &[String], config: &SearchConfig) -> String {
    let mut out = text.to_string();
    for term in terms {
        if term.trim().is_empty() {
            continue;
        }
        let Ok(pattern) = regex::RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        out = pattern
            .replace_all(&out, |caps: &regex::Captures| {
                format!("{}{}{}", config.highlight_pre, &caps[0], config.highlight_post)
            })
            .to_string();
    }
    out
}

fn content_snippets(content: &str, terms: &[String], config: &SearchConfig) -> Vec<String> {
    let lower = content.to_lowercase();
    let mut snippets = Vec::new();
    for term in terms {
        if snippets.len() >= config.max_snippets {
            break;
        }
        if term.trim().is_empty() {
            continue;
        }
        let mut search_from = 0;
        while snippets.len() < config.max_snippets {
            let Some(rel) = lower[search_from..].find(term.as_str()) else {
                break;
            };
            let at = search_from + rel;
            let start = floor_char_boundary(content, at.saturating_sub(config.snippet_context));
            let end = ceil_char_boundary(
                content,
                (at + term.len() + config.snippet_context).min(content.len()),
            );
            let marked = mark_terms(&content[start..end], std::slice::from_ref(term), config);
            snippets.push(format!("...{}...", marked));
            search_from = at + term.len().max(1);
        }
    }
    snippets
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Facets over the full filtered candidate set (not just one page).
pub fn compute_facets(articles: &[&Article], now: OffsetDateTime) -> FacetSummary {
    let mut categories: HashMap<&str, usize> = HashMap::new();
    let mut authors: HashMap<&str, usize> = HashMap::new();
    let mut languages: HashMap<&str, usize> = HashMap::new();
    let mut sources: HashMap<&str, usize> = HashMap::new();

    for article in articles {
        *categories.entry(article.category.as_str()).or_insert(0) += 1;
        *authors.entry(article.author.as_str()).or_insert(0) += 1;
        if let Some(lang) = &article.language {
            *languages.entry(lang.as_str()).or_insert(0) += 1;
        }
        if let Some(source) = &article.source {
            *sources.entry(source.as_str()).or_insert(0) += 1;
        }
    }

    let windows: [(&str, Duration); 5] = [
        ("24h", Duration::hours(24)),
        ("7d", Duration::days(7)),
        ("30d", Duration::days(30)),
        ("90d", Duration::days(90)),
        ("365d", Duration::days(365)),
    ];
    let date_ranges = windows
        .iter()
        .map(|(label, window)| FacetCount {
            value: (*label).to_string(),
            count: articles
                .iter()
                .filter(|a| now - a.published_at <= *window)
                .count(),
        })
        .collect();

    FacetSummary {
        categories: ranked(categories, usize::MAX),
        authors: ranked(authors, AUTHOR_FACET_CAP),
        languages: ranked(languages, usize::MAX),
        sources: ranked(sources, SOURCE_FACET_CAP),
        date_ranges,
    }
}

fn ranked(counts: HashMap<&str, usize>, cap: usize) -> Vec<FacetCount> {
    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value: value.to_string(), count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out.truncate(cap);
    out
}
