//! Text normalisation shared by the embedder and the template selector.

/// Short function words that carry no topic signal.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "this", "these",
    "those", "which",
];

/// Lower-case and collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased alphanumeric tokens, punctuation acting as a separator.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn remove_stopwords(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Content tokens of `text`.
pub fn content_tokens(text: &str) -> Vec<String> {
    remove_stopwords(tokenize(text))
}
