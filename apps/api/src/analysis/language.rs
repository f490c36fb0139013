//! Language gate. Scoring and the keyword vocabulary assume English, so a
//! resume that reliably reads as another language is rejected up front.

use serde::Serialize;
use whatlang::Lang;

use crate::analysis::text::word_count;
use crate::errors::AppError;

/// Below this many words the detector guesses more than it detects.
const MIN_WORDS_FOR_DETECTION: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageReport {
    /// ISO 639-3 code; `None` when the text is too short to judge.
    pub code: Option<&'static str>,
    pub name: Option<&'static str>,
    pub confidence: f64,
    pub is_reliable: bool,
}

impl LanguageReport {
    fn undetermined() -> Self {
        Self {
            code: None,
            name: None,
            confidence: 0.0,
            is_reliable: false,
        }
    }

    /// Only a reliable, non-English detection counts against a resume.
    pub fn is_english_or_unknown(&self) -> bool {
        !self.is_reliable || self.code == Some(Lang::Eng.code())
    }
}

pub fn detect_language(text: &str) -> LanguageReport {
    if word_count(text) < MIN_WORDS_FOR_DETECTION {
        return LanguageReport::undetermined();
    }

    match whatlang::detect(text) {
        Some(info) => LanguageReport {
            code: Some(info.lang().code()),
            name: Some(info.lang().eng_name()),
            confidence: (info.confidence() * 100.0).round() / 100.0,
            is_reliable: info.is_reliable(),
        },
        None => LanguageReport::undetermined(),
    }
}

pub fn require_english(report: &LanguageReport) -> Result<(), AppError> {
    if report.is_english_or_unknown() {
        return Ok(());
    }
    Err(AppError::UnsupportedLanguage(
        report.name.unwrap_or("an unknown language").to_string(),
    ))
}
