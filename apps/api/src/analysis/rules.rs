//! ATS rule set: keyword vocabulary, section aliases, point values and target ranges.
//!
//! Loaded once at startup (built-in defaults or a JSON file) and shared
//! read-only behind an `Arc` for the life of the process.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Built-in defaults
// ────────────────────────────────────────────────────────────────────────────

const DEFAULT_KEYWORDS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "ruby", "php",
    "sql", "nosql", "react", "vue", "angular", "svelte", "nextjs", "node", "express", "django",
    "flask", "spring", "aws", "gcp", "azure", "docker", "kubernetes", "terraform", "ansible",
    "jenkins", "ci", "cd", "html", "css", "sass", "less", "tailwind", "bootstrap", "graphql",
    "rest", "api", "linux", "unix", "windows", "bash", "powershell", "machine learning",
    "deep learning", "nlp", "computer vision", "data science", "data analysis", "pandas",
    "numpy", "scikit-learn", "tensorflow", "pytorch", "matplotlib", "seaborn", "excel",
    "tableau", "power bi", "lookml", "git", "github", "gitlab", "bitbucket", "agile", "scrum",
    "kanban", "jira", "confluence", "communication", "collaboration", "leadership",
    "mentorship", "problem solving",
];

const DEFAULT_SECTIONS: &[(&str, &[&str])] = &[
    ("experience", &["experience", "work history", "professional background"]),
    ("education", &["education", "academic background", "studies"]),
    ("skills", &["skills", "technical skills", "competencies"]),
    ("projects", &["projects", "portfolio", "case studies"]),
];

// ────────────────────────────────────────────────────────────────────────────
// Rule set types
// ────────────────────────────────────────────────────────────────────────────

/// A resume section and the header spellings that count as its presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRule {
    pub name: String,
    pub aliases: Vec<String>,
}

/// Points awarded per criterion. The aggregate score is normalized by
/// `max_total()` onto 0–100, so the values need not sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Awarded once per section found.
    pub section: f64,
    pub email: f64,
    pub phone: f64,
    pub bullets: f64,
    pub length: f64,
    pub readability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            section: 8.0,
            email: 15.0,
            phone: 15.0,
            bullets: 5.0,
            length: 10.0,
            readability: 23.0,
        }
    }
}

/// Target ranges for the length, bullet and readability criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTargets {
    pub min_bullets: usize,
    pub max_bullets: usize,
    pub min_words: usize,
    pub max_words: usize,
    /// Flesch Reading Ease at or above which readability earns full points.
    pub readability: f64,
}

impl Default for ScoreTargets {
    fn default() -> Self {
        Self {
            min_bullets: 3,
            max_bullets: 40,
            min_words: 200,
            max_words: 1000,
            readability: 60.0,
        }
    }
}

/// On-disk shape of a rules file. Every field is optional; missing fields
/// fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RulesFile {
    keywords: Option<Vec<String>>,
    sections: Option<Vec<SectionRule>>,
    weights: ScoreWeights,
    targets: ScoreTargets,
}

/// Fixed, case-normalized vocabulary of recognized industry terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    /// Normalizes (trim + lowercase) and dedups; blank entries are skipped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The complete, validated rule set used by the scorer and matcher.
#[derive(Debug, Clone, Serialize)]
pub struct AtsRules {
    pub keywords: KeywordSet,
    pub sections: Vec<SectionRule>,
    pub weights: ScoreWeights,
    pub targets: ScoreTargets,
}

impl Default for AtsRules {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::new(DEFAULT_KEYWORDS.iter().copied()),
            sections: default_sections(),
            weights: ScoreWeights::default(),
            targets: ScoreTargets::default(),
        }
    }
}

impl AtsRules {
    /// Loads rules from `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read rules file '{}'", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid rules file '{}'", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: RulesFile = serde_json::from_str(raw).context("rules file is not valid JSON")?;

        let keywords = match file.keywords {
            Some(terms) => KeywordSet::new(terms),
            None => KeywordSet::new(DEFAULT_KEYWORDS.iter().copied()),
        };

        let sections = match file.sections {
            Some(sections) => sections
                .into_iter()
                .map(|s| SectionRule {
                    name: s.name.trim().to_lowercase(),
                    aliases: s
                        .aliases
                        .iter()
                        .map(|a| a.trim().to_lowercase())
                        .filter(|a| !a.is_empty())
                        .collect(),
                })
                .collect(),
            None => default_sections(),
        };

        let rules = Self {
            keywords,
            sections,
            weights: file.weights,
            targets: file.targets,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Highest raw point total a resume can earn under these rules.
    pub fn max_total(&self) -> f64 {
        let w = &self.weights;
        w.section * self.sections.len() as f64
            + w.email
            + w.phone
            + w.bullets
            + w.length
            + w.readability
    }

    fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            bail!("keyword vocabulary is empty");
        }
        if let Some(section) = self.sections.iter().find(|s| s.aliases.is_empty()) {
            bail!("section '{}' has no aliases", section.name);
        }

        let w = &self.weights;
        let points = [w.section, w.email, w.phone, w.bullets, w.length, w.readability];
        if points.iter().any(|p| !p.is_finite() || *p < 0.0) {
            bail!("point values must be finite and non-negative");
        }
        if self.max_total() <= 0.0 {
            bail!("point values must sum to a positive total");
        }

        let t = &self.targets;
        if t.min_bullets > t.max_bullets {
            bail!("min_bullets ({}) exceeds max_bullets ({})", t.min_bullets, t.max_bullets);
        }
        if t.min_words > t.max_words || t.max_words == 0 {
            bail!("word range {}..={} is invalid", t.min_words, t.max_words);
        }
        if !(t.readability.is_finite() && t.readability > 0.0) {
            bail!("readability target must be positive");
        }
        Ok(())
    }
}

fn default_sections() -> Vec<SectionRule> {
    DEFAULT_SECTIONS
        .iter()
        .map(|(name, aliases)| SectionRule {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}
