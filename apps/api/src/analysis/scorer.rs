//! Resume scorer: structural and readability heuristics on a 0–100 scale.
//!
//! Every criterion earns a share of its configured points:
//! - sections: full points per section whose header alias appears
//! - contact: email and phone independently
//! - bullets / length: full inside the target range, linear ramp below it,
//!   linear decay above it reaching zero at twice the maximum
//! - readability: `points × clamp(flesch / target, 0, 1)`
//!
//! The raw total is normalized by `AtsRules::max_total()` and clamped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::readability::analyze_readability;
use crate::analysis::rules::AtsRules;
use crate::analysis::text::{bullet_count, word_count};

pub const MAX_SCORE: f64 = 100.0;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.\w{2,}").expect("email regex"));

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?(?:\(?\d{2,4}\)?[\s.-]?)?\d{3}[\s.-]?\d{4}")
        .expect("phone regex")
});

/// Presence of one configured section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionCheck {
    pub section: String,
    pub found: bool,
    pub points: f64,
}

/// Points earned per criterion, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub sections: f64,
    pub contact: f64,
    pub bullets: f64,
    pub length: f64,
    pub readability: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.sections + self.contact + self.bullets + self.length + self.readability
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Aggregate score in `[0, MAX_SCORE]`, one decimal.
    pub score: f64,
    pub max_score: f64,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub sections: Vec<SectionCheck>,
    pub has_email: bool,
    pub has_phone: bool,
    pub bullet_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    /// Flesch Reading Ease of the whole document.
    pub readability: f64,
    pub breakdown: ScoreBreakdown,
    pub positives: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Scores a resume's extracted text. Never fails; empty text scores low.
pub fn score_resume(text: &str, rules: &AtsRules) -> ScoreReport {
    let weights = &rules.weights;
    let targets = &rules.targets;
    let lower = text.to_lowercase();

    let mut positives = Vec::new();
    let mut suggestions = Vec::new();
    let mut breakdown = ScoreBreakdown::default();

    // Sections
    let mut sections = Vec::with_capacity(rules.sections.len());
    for rule in &rules.sections {
        let found = rule.aliases.iter().any(|alias| lower.contains(alias.as_str()));
        let title = title_case(&rule.name);
        let points = if found { weights.section } else { 0.0 };
        if found {
            positives.push(format!("Found section: '{title}'"));
        } else {
            suggestions.push(format!(
                "Missing section: '{title}' (-{} pts)",
                fmt_points(weights.section)
            ));
        }
        breakdown.sections += points;
        sections.push(SectionCheck {
            section: rule.name.clone(),
            found,
            points,
        });
    }
    let section_found = |name: &str| sections.iter().any(|s| s.section == name && s.found);
    let (has_experience, has_education, has_skills) = (
        section_found("experience"),
        section_found("education"),
        section_found("skills"),
    );

    // Contact
    let has_phone = PHONE.is_match(text);
    if has_phone {
        positives.push("Phone number found".to_string());
        breakdown.contact += weights.phone;
    } else {
        suggestions.push(format!(
            "Missing or invalid phone number (-{} pts)",
            fmt_points(weights.phone)
        ));
    }

    let has_email = EMAIL.is_match(text);
    if has_email {
        positives.push("Email address found".to_string());
        breakdown.contact += weights.email;
    } else {
        suggestions.push(format!(
            "Missing email address (-{} pts)",
            fmt_points(weights.email)
        ));
    }

    // Bullets
    let bullets = bullet_count(text);
    let bullet_share = range_fraction(bullets, targets.min_bullets, targets.max_bullets);
    breakdown.bullets = weights.bullets * bullet_share;
    let bullets_lost = weights.bullets - breakdown.bullets;
    if bullets < targets.min_bullets {
        suggestions.push(format!(
            "Too few bullet points: {bullets} (aim for at least {}) (-{} pts)",
            targets.min_bullets,
            fmt_points(bullets_lost)
        ));
    } else if bullets > targets.max_bullets {
        suggestions.push(format!(
            "Too many bullet points: {bullets} (aim for at most {}) (-{} pts)",
            targets.max_bullets,
            fmt_points(bullets_lost)
        ));
    } else {
        positives.push(format!("Sufficient bullet points found: {bullets}"));
    }

    // Length
    let words = word_count(text);
    let length_share = range_fraction(words, targets.min_words, targets.max_words);
    breakdown.length = weights.length * length_share;
    let length_lost = weights.length - breakdown.length;
    if words < targets.min_words {
        suggestions.push(format!(
            "Resume is too short ({words} words) (-{} pts)",
            fmt_points(length_lost)
        ));
    } else if words > targets.max_words {
        suggestions.push(format!(
            "Resume is too long ({words} words) (-{} pts)",
            fmt_points(length_lost)
        ));
    } else {
        positives.push(format!("Reasonable length: {words} words"));
    }

    // Readability
    let stats = analyze_readability(text);
    let flesch = stats.flesch_reading_ease;
    let readability_share = (flesch / targets.readability).clamp(0.0, 1.0);
    breakdown.readability = weights.readability * readability_share;
    if readability_share >= 1.0 {
        positives.push(format!("Readable writing (Flesch {flesch:.1})"));
    } else {
        suggestions.push(format!(
            "Hard to read (Flesch {flesch:.1}, aim for {:.0}+): use shorter sentences and simpler words (-{} pts)",
            targets.readability,
            fmt_points(weights.readability - breakdown.readability)
        ));
    }

    let max_total = rules.max_total();
    let normalized = if max_total > 0.0 {
        breakdown.total() / max_total * MAX_SCORE
    } else {
        0.0
    };
    let score = (normalized.clamp(0.0, MAX_SCORE) * 10.0).round() / 10.0;

    ScoreReport {
        score,
        max_score: MAX_SCORE,
        has_experience,
        has_education,
        has_skills,
        sections,
        has_email,
        has_phone,
        bullet_count: bullets,
        word_count: words,
        sentence_count: stats.sentences,
        readability: flesch,
        breakdown,
        positives,
        suggestions,
    }
}

/// Share of points for a count against an inclusive target range.
fn range_fraction(value: usize, min: usize, max: usize) -> f64 {
    let v = value as f64;
    if value < min {
        v / min as f64
    } else if value <= max {
        1.0
    } else if max == 0 {
        0.0
    } else {
        let max = max as f64;
        (1.0 - (v - max) / max).max(0.0)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fmt_points(points: f64) -> String {
    if points.fract().abs() < 0.05 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_RESUME: &str = "Jane Doe\n\
        jane.doe@example.com | (555) 123-4567\n\
        Experience\n\
        • Built a payments API in Rust. It served ten million users.\n\
        • Cut build times by half. The team shipped twice as fast.\n\
        • Led four engineers. We moved the stack to Docker.\n\
        Education\n\
        B.S. Computer Science, State University.\n\
        Skills\n\
        Rust, Python, SQL, Docker.\n\
        Projects\n\
        • Wrote an open source log parser. It is fast and small.\n";

    fn rules() -> AtsRules {
        AtsRules::default()
    }

    #[test]
    fn test_empty_text_scores_zero_without_failing() {
        let report = score_resume("", &rules());
        assert_eq!(report.score, 0.0);
        assert_eq!(report.word_count, 0);
        assert_eq!(report.readability, 0.0);
        assert!(!report.has_email && !report.has_phone);
        assert!(report.positives.is_empty());
    }

    #[test]
    fn test_structured_resume_beats_bare_text() {
        let strong = score_resume(STRONG_RESUME, &rules());
        let bare = score_resume("I like computers and want a job", &rules());

        assert!(strong.has_experience && strong.has_education && strong.has_skills);
        assert!(strong.has_email);
        assert!(strong.has_phone);
        assert!(!bare.has_experience && !bare.has_email);
        assert!(strong.breakdown.sections > bare.breakdown.sections);
        assert!(strong.breakdown.contact > bare.breakdown.contact);
        assert!(strong.score > bare.score);
    }

    #[test]
    fn test_section_aliases_are_case_insensitive() {
        let report = score_resume("WORK HISTORY\nTechnical Skills\nAcademic Background", &rules());
        assert!(report.has_experience);
        assert!(report.has_skills);
        assert!(report.has_education);
        assert!(!report.sections.iter().find(|s| s.section == "projects").unwrap().found);
        assert!(report.suggestions.iter().any(|s| s == "Missing section: 'Projects' (-8 pts)"));
    }

    #[test]
    fn test_bullets_counted_and_scored() {
        let report = score_resume(STRONG_RESUME, &rules());
        assert_eq!(report.bullet_count, 4);
        assert!((report.breakdown.bullets - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_repetitive_text_stays_in_bounds() {
        let mut text = String::from("Experience Education Skills Projects a@b.io 555-123-4567\n");
        for _ in 0..20_000 {
            text.push_str("• Go.\n");
        }
        let report = score_resume(&text, &rules());
        assert!(report.score >= 0.0 && report.score <= MAX_SCORE);
        assert!(report.suggestions.iter().any(|s| s.starts_with("Resume is too long")));
        assert!(report.suggestions.iter().any(|s| s.starts_with("Too many bullet points")));
        assert_eq!(report.breakdown.length, 0.0);
    }

    #[test]
    fn test_score_is_normalized_breakdown_total() {
        let rules = rules();
        let report = score_resume(STRONG_RESUME, &rules);
        let expected = report.breakdown.total() / rules.max_total() * MAX_SCORE;
        assert!((report.score - expected).abs() <= 0.05);
    }

    #[test]
    fn test_score_bounded_for_custom_weights() {
        let rules = AtsRules::from_json(r#"{"weights": {"section": 50, "email": 0.5}}"#).unwrap();
        let report = score_resume(STRONG_RESUME, &rules);
        assert!(report.score <= MAX_SCORE);
        assert!(report.score > 0.0);
    }

    #[test]
    fn test_range_fraction() {
        assert_eq!(range_fraction(0, 3, 40), 0.0);
        assert!((range_fraction(150, 300, 1000) - 0.5).abs() < 1e-9);
        assert_eq!(range_fraction(500, 300, 1000), 1.0);
        assert!((range_fraction(1500, 300, 1000) - 0.5).abs() < 1e-9);
        assert_eq!(range_fraction(5000, 300, 1000), 0.0);
        assert_eq!(range_fraction(0, 0, 0), 1.0);
        assert_eq!(range_fraction(3, 0, 0), 0.0);
    }

    #[test]
    fn test_email_requires_domain_suffix() {
        assert!(score_resume("mail me: dev.ops+jobs@mail.example.org", &rules()).has_email);
        assert!(!score_resume("handle @someone on social", &rules()).has_email);
        assert!(!score_resume("contact a@b.c", &rules()).has_email);
        assert!(!score_resume("jane@localhost", &rules()).has_email);
    }

    #[test]
    fn test_phone_formats() {
        for phone in ["555-123-4567", "(555) 123-4567", "+1 555 123 4567", "5551234567"] {
            assert!(score_resume(phone, &rules()).has_phone, "{phone}");
        }
        assert!(!score_resume("Class of 2019", &rules()).has_phone);
    }

    #[test]
    fn test_deterministic() {
        let a = score_resume(STRONG_RESUME, &rules());
        let b = score_resume(STRONG_RESUME, &rules());
        assert_eq!(a.score, b.score);
        assert_eq!(a.readability, b.readability);
    }
}
