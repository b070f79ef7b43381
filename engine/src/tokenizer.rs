use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]+").expect("valid regex");
}

/// Tokenize text into normalized index terms: NFKC, lowercase, strip
/// punctuation, split on whitespace, drop short tokens, light stem.
/// Queries and article text go through the same path so terms compare.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let cleaned = NON_WORD.replace_all(&normalized, "");
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .map(stem)
        .collect()
}

/// Light suffix stripping: "ing" from long words, then "ed", then a
/// trailing plural "s". Not a full Porter stemmer; just enough to fold
/// the common inflections seen in headlines.
fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len > 6 {
        if let Some(base) = word.strip_suffix("ing") {
            return base.to_string();
        }
    }
    if len > 5 {
        if let Some(base) = word.strip_suffix("ed") {
            return base.to_string();
        }
    }
    if len > 3 {
        if let Some(base) = word.strip_suffix('s') {
            return base.to_string();
        }
    }
    word.to_string()
}
