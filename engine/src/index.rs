use crate::article::{Article, ArticleId};
use crate::tokenizer::tokenize;
use std::collections::{HashMap, HashSet};

/// In-memory inverted index over article text.
///
/// `postings` answers "which articles contain this term", `frequencies`
/// answers "how often", and `word_counts` holds the per-article token
/// total used for TF normalization. All three are rebuilt together;
/// every article id present in any map must exist in the engine corpus.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashSet<ArticleId>>,
    frequencies: HashMap<String, HashMap<ArticleId, u32>>,
    word_counts: HashMap<ArticleId, u32>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one article's concatenated text. Caller guarantees the id
    /// is not already indexed (update/remove go through a full rebuild).
    pub fn index_article(&mut self, article: &Article) {
        let terms = tokenize(&article.indexable_text());
        self.word_counts.insert(article.id.clone(), terms.len() as u32);
        for term in terms {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(article.id.clone());
            *self
                .frequencies
                .entry(term)
                .or_default()
                .entry(article.id.clone())
                .or_insert(0) += 1;
        }
    }

    /// Drop everything and re-index the given corpus.
    pub fn rebuild<'a, I>(&mut self, articles: I)
    where
        I: IntoIterator<Item = &'a Article>,
    {
        self.postings.clear();
        self.frequencies.clear();
        self.word_counts.clear();
        for article in articles {
            self.index_article(article);
        }
    }

    pub fn postings(&self, term: &str) -> Option<&HashSet<ArticleId>> {
        self.postings.get(term)
    }

    /// Number of articles containing the term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashSet::len)
    }

    pub fn term_frequency(&self, term: &str, article_id: &str) -> u32 {
        self.frequencies
            .get(term)
            .and_then(|per_doc| per_doc.get(article_id))
            .copied()
            .unwrap_or(0)
    }

    /// Total indexable tokens in the article, for TF normalization.
    pub fn word_count(&self, article_id: &str) -> u32 {
        self.word_counts.get(article_id).copied().unwrap_or(0)
    }

    /// All distinct indexed terms; the fuzzy matcher scans these.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}
