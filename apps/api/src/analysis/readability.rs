//! Flesch Reading Ease.
//!
//! `206.835 - 1.015 × (words / sentences) - 84.6 × (syllables / words)`
//!
//! Higher is easier to read; 60–70 is plain English. Sentences and syllables
//! are approximated: terminal punctuation runs and vowel groups respectively.

use serde::{Deserialize, Serialize};

const BASE: f64 = 206.835;
const SENTENCE_LENGTH_WEIGHT: f64 = 1.015;
const SYLLABLE_WEIGHT: f64 = 84.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityStats {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    /// Flesch Reading Ease, rounded to two decimals. 0.0 for text without words.
    pub flesch_reading_ease: f64,
}

pub fn analyze_readability(text: &str) -> ReadabilityStats {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect();

    if words.is_empty() {
        return ReadabilityStats {
            words: 0,
            sentences: 0,
            syllables: 0,
            flesch_reading_ease: 0.0,
        };
    }

    let sentences = count_sentences(text).max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let word_total = words.len() as f64;
    let score = BASE
        - SENTENCE_LENGTH_WEIGHT * (word_total / sentences as f64)
        - SYLLABLE_WEIGHT * (syllables as f64 / word_total);

    ReadabilityStats {
        words: words.len(),
        sentences,
        syllables,
        flesch_reading_ease: (score * 100.0).round() / 100.0,
    }
}

/// Counts runs of terminal punctuation; "Wait..." and "Really?!" are one each.
pub fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut in_terminal = false;
    for c in text.chars() {
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && !in_terminal {
            count += 1;
        }
        in_terminal = terminal;
    }
    count
}

/// Vowel-group heuristic. A trailing silent "e" is dropped ("make" = 1) except
/// after a consonant + "l" ("table" = 2). Every word has at least one syllable.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if letters.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    let silent_e = n >= 3
        && letters[n - 1] == 'e'
        && !is_vowel(letters[n - 2])
        && !(letters[n - 2] == 'l' && !is_vowel(letters[n - 3]));
    if silent_e && groups > 1 {
        groups -= 1;
    }

    groups.max(1)
}
