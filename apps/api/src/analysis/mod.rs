// Resume analysis: structural scoring and keyword matching over extracted text.
// Everything here is a pure function of (text, AtsRules); handlers wrap it for HTTP.

pub mod handlers;
pub mod language;
pub mod matcher;
pub mod readability;
pub mod rules;
pub mod scorer;
pub mod text;

use serde::Serialize;

pub use matcher::{KeywordFrequency, MatchReport};
pub use rules::AtsRules;
pub use scorer::ScoreReport;

use crate::analysis::matcher::{keyword_frequencies, match_job, match_vocabulary};
use crate::analysis::scorer::score_resume;
use crate::analysis::text::TextProfile;

/// Job-description side of an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub report: MatchReport,
    /// Recognized terms in the posting, most frequent first.
    pub job_keyword_density: Vec<KeywordFrequency>,
}

/// Everything computed for one resume: extract → score → match.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub score: ScoreReport,
    pub keyword_coverage: MatchReport,
    pub keyword_density: Vec<KeywordFrequency>,
    pub job_match: Option<JobMatch>,
}

/// Runs the scorer and matcher over a resume, plus the job-match mode when a
/// non-blank job description is supplied.
pub fn analyze_resume(
    resume_text: &str,
    job_description: Option<&str>,
    rules: &AtsRules,
) -> ResumeAnalysis {
    let score = score_resume(resume_text, rules);

    let resume = TextProfile::new(resume_text);
    let keyword_coverage = match_vocabulary(&resume, &rules.keywords);
    let keyword_density = keyword_frequencies(&resume, &rules.keywords);

    let job_match = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| {
            let job = TextProfile::new(jd);
            JobMatch {
                report: match_job(&resume, &job, &rules.keywords),
                job_keyword_density: keyword_frequencies(&job, &rules.keywords),
            }
        });

    ResumeAnalysis {
        score,
        keyword_coverage,
        keyword_density,
        job_match,
    }
}
