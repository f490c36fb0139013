//! Keyword matcher: resume and job description text vs the fixed vocabulary.
//!
//! Two modes:
//! - vocabulary: the universe is the whole `KeywordSet`; matched terms are the
//!   ones the resume mentions.
//! - job description: the universe is the vocabulary terms the posting
//!   mentions; matched terms are the ones the resume also mentions.
//!
//! In both modes `matched ∪ missing == universe` and the two are disjoint.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::rules::KeywordSet;
use crate::analysis::text::TextProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    Vocabulary,
    JobDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub scope: MatchScope,
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    /// Size of the universe the ratio is taken over.
    pub universe_size: usize,
    /// `matched / universe_size` in `[0, 1]`; 0.0 for an empty universe.
    pub match_ratio: f64,
    pub recommendation: String,
}

/// One bar of a keyword-density chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub count: usize,
}

/// Vocabulary terms present in `profile` with their counts, most frequent first.
pub fn keyword_frequencies(profile: &TextProfile, keywords: &KeywordSet) -> Vec<KeywordFrequency> {
    let mut frequencies: Vec<KeywordFrequency> = keywords
        .iter()
        .filter_map(|kw| {
            let count = profile.occurrences(kw);
            (count > 0).then(|| KeywordFrequency {
                keyword: kw.to_string(),
                count,
            })
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    frequencies
}

/// Resume mode: which recognized industry terms does the resume mention?
pub fn match_vocabulary(resume: &TextProfile, keywords: &KeywordSet) -> MatchReport {
    let universe: BTreeSet<String> = keywords.iter().map(str::to_string).collect();
    build_report(MatchScope::Vocabulary, universe, resume)
}

/// Job-match mode: of the recognized terms the posting mentions, how many
/// does the resume also mention?
pub fn match_job(resume: &TextProfile, job: &TextProfile, keywords: &KeywordSet) -> MatchReport {
    let universe: BTreeSet<String> = keywords
        .iter()
        .filter(|kw| job.contains(kw))
        .map(str::to_string)
        .collect();
    build_report(MatchScope::JobDescription, universe, resume)
}

fn build_report(scope: MatchScope, universe: BTreeSet<String>, resume: &TextProfile) -> MatchReport {
    let universe_size = universe.len();
    let (matched, missing): (BTreeSet<String>, BTreeSet<String>) =
        universe.into_iter().partition(|kw| resume.contains(kw));

    let match_ratio = if universe_size > 0 {
        (matched.len() as f64 / universe_size as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let recommendation = build_recommendation(scope, universe_size, match_ratio, &missing);

    MatchReport {
        scope,
        matched,
        missing,
        universe_size,
        match_ratio,
        recommendation,
    }
}

/// Builds a human-readable recommendation from the ratio and missing terms.
fn build_recommendation(
    scope: MatchScope,
    universe_size: usize,
    ratio: f64,
    missing: &BTreeSet<String>,
) -> String {
    if universe_size == 0 {
        return match scope {
            MatchScope::JobDescription => {
                "No recognized keywords found in the job description. Cannot score match."
                    .to_string()
            }
            MatchScope::Vocabulary => "Keyword vocabulary is empty.".to_string(),
        };
    }

    let percent = (ratio * 100.0).round() as u32;
    let top_missing: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();

    match scope {
        MatchScope::JobDescription if missing.is_empty() => {
            "Strong match. Your resume mentions every recognized keyword in the posting."
                .to_string()
        }
        MatchScope::JobDescription if percent >= 60 => format!(
            "Moderate match ({percent}%). Consider adding: {}.",
            top_missing.join(", ")
        ),
        MatchScope::JobDescription => format!(
            "Low match ({percent}%). Missing keywords: {}. Tailor your resume to the posting.",
            top_missing.join(", ")
        ),
        MatchScope::Vocabulary => format!(
            "Your resume mentions {percent}% of recognized industry terms. Paste a job description to see which ones matter for the role."
        ),
    }
}
