use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type ArticleId = String;

/// A news article as supplied by the content-loading collaborator.
/// The engine indexes copies of these and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Estimated read time in minutes.
    #[serde(default)]
    pub read_time: Option<u32>,
}

impl Article {
    /// Concatenated text fed to the tokenizer when indexing.
    pub fn indexable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.content.len() + 64,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.content);
        if let Some(summary) = &self.summary {
            text.push(' ');
            text.push_str(summary);
        }
        text.push(' ');
        text.push_str(&self.author);
        text.push(' ');
        text.push_str(&self.category);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }
}
