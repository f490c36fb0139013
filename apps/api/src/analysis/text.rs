//! Text primitives shared by the scorer and the matcher.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word regex"));

/// Characters that mark a bulleted line when they lead it.
pub const BULLET_MARKERS: &[char] = &['•', '-', '*', '▪', '◦', '‣', '●', '–'];

/// Whitespace-separated token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines whose first non-blank character is a bullet marker.
pub fn bullet_count(text: &str) -> usize {
    text.lines()
        .filter(|line| {
            line.trim_start()
                .chars()
                .next()
                .is_some_and(|c| BULLET_MARKERS.contains(&c))
        })
        .count()
}

/// Lowercased view of a text with its word-token counts, built once per
/// document and queried for every vocabulary term.
#[derive(Debug, Clone)]
pub struct TextProfile {
    lowered: String,
    tokens: HashMap<String, usize>,
}

impl TextProfile {
    pub fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut tokens: HashMap<String, usize> = HashMap::new();
        for m in WORD.find_iter(&lowered) {
            *tokens.entry(m.as_str().to_string()).or_default() += 1;
        }
        Self { lowered, tokens }
    }

    /// Number of times `term` (already lowercased) occurs.
    ///
    /// Plain words are looked up in the token counts. Compound terms
    /// ("machine learning", "c++", "scikit-learn") are located by substring
    /// search and only count when not glued to surrounding letters or digits.
    pub fn occurrences(&self, term: &str) -> usize {
        if is_plain_word(term) {
            return self.tokens.get(term).copied().unwrap_or(0);
        }

        self.lowered
            .match_indices(term)
            .filter(|(start, _)| {
                let before = self.lowered[..*start].chars().next_back();
                let after = self.lowered[start + term.len()..].chars().next();
                !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
            })
            .count()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.occurrences(term) > 0
    }
}

fn is_plain_word(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_alphanumeric() || c == '_')
}
