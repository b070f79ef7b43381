use crate::article::{Article, ArticleId};
use crate::index::InvertedIndex;
use crate::query::SearchFilters;
use std::collections::{HashMap, HashSet};

/// Candidate selection: for each query term, union the exact postings
/// with the postings of every indexed term whose Jaro-Winkler similarity
/// clears the threshold, then intersect across terms (AND semantics).
///
/// No query terms means the whole corpus is a candidate, so that
/// filters-only browsing works. The fuzzy pass scans the vocabulary
/// linearly per term; fine for the corpus sizes this engine targets.
pub fn match_candidates(
    terms: &[String],
    index: &InvertedIndex,
    corpus: &HashMap<ArticleId, Article>,
    fuzzy_threshold: f64,
) -> HashSet<ArticleId> {
    if terms.is_empty() {
        return corpus.keys().cloned().collect();
    }

    let mut candidates: Option<HashSet<ArticleId>> = None;
    for term in terms {
        let matched = term_matches(term, index, fuzzy_threshold);
        candidates = Some(match candidates {
            None => matched,
            Some(acc) => acc.intersection(&matched).cloned().collect(),
        });
        if candidates.as_ref().is_some_and(HashSet::is_empty) {
            break;
        }
    }
    candidates.unwrap_or_default()
}

fn term_matches(term: &str, index: &InvertedIndex, threshold: f64) -> HashSet<ArticleId> {
    let mut matched: HashSet<ArticleId> = index
        .postings(term)
        .map(|ids| ids.iter().cloned().collect())
        .unwrap_or_default();

    for indexed in index.terms() {
        if indexed == term {
            continue;
        }
        if strsim::jaro_winkler(term, indexed) >= threshold {
            if let Some(ids) = index.postings(indexed) {
                matched.extend(ids.iter().cloned());
            }
        }
    }
    matched
}

/// Keep only candidates that satisfy every specified filter predicate.
/// Absent filter fields constrain nothing.
pub fn apply_filters<'a>(
    candidates: &HashSet<ArticleId>,
    corpus: &'a HashMap<ArticleId, Article>,
    filters: &SearchFilters,
) -> Vec<&'a Article> {
    candidates
        .iter()
        .filter_map(|id| corpus.get(id))
        .filter(|article| passes(article, filters))
        .collect()
}

fn passes(article: &Article, filters: &SearchFilters) -> bool {
    if !filters.categories.is_empty() && !filters.categories.contains(&article.category) {
        return false;
    }
    if !filters.authors.is_empty() && !filters.authors.contains(&article.author) {
        return false;
    }
    if !filters.languages.is_empty() {
        match &article.language {
            Some(lang) if filters.languages.contains(lang) => {}
            _ => return false,
        }
    }
    if !filters.sources.is_empty() {
        match &article.source {
            Some(source) if filters.sources.contains(source) => {}
            _ => return false,
        }
    }
    if let Some(from) = filters.date_from {
        if article.published_at < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if article.published_at > to {
            return false;
        }
    }
    if let Some(min) = filters.min_read_time {
        if article.read_time.is_none_or(|rt| rt < min) {
            return false;
        }
    }
    if let Some(max) = filters.max_read_time {
        if article.read_time.is_none_or(|rt| rt > max) {
            return false;
        }
    }
    if let Some(wants_image) = filters.has_image {
        if article.image_url.is_some() != wants_image {
            return false;
        }
    }
    true
}
