//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::language::{detect_language, require_english, LanguageReport};
use crate::analysis::matcher::{keyword_frequencies, match_job, match_vocabulary};
use crate::analysis::scorer::MAX_SCORE;
use crate::analysis::text::TextProfile;
use crate::analysis::{analyze_resume, KeywordFrequency, MatchReport, ResumeAnalysis};
use crate::errors::AppError;
use crate::extract::{extract_document, DocumentFormat};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreTextRequest {
    pub text: String,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchTextRequest {
    pub resume_text: String,
    pub job_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub file_name: Option<String>,
    pub format: DocumentFormat,
    pub char_count: usize,
    /// True when no text could be extracted (e.g. a scanned PDF).
    pub is_blank: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub document: Option<DocumentSummary>,
    pub language: LanguageReport,
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub report: MatchReport,
    pub resume_keyword_density: Vec<KeywordFrequency>,
    pub job_keyword_density: Vec<KeywordFrequency>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub keywords: Vec<String>,
    pub sections: Vec<String>,
    pub max_score: f64,
}

/// Fields collected from an `/analyze` multipart body.
#[derive(Default)]
struct AnalyzeUpload {
    file_name: Option<String>,
    resume: Option<Bytes>,
    format: Option<String>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart fields: `resume` (file, required), `format` (`pdf` | `latex`,
/// optional, overrides the file extension), `job_description` (optional).
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;

    let bytes = upload
        .resume
        .ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;
    let format = resolve_format(upload.format.as_deref(), upload.file_name.as_deref())?;

    let document = extract_document(bytes, format).await?;
    let language = check_language(&state, document.as_str())?;
    let analysis = analyze_resume(
        document.as_str(),
        upload.job_description.as_deref(),
        &state.rules,
    );

    let response = AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        document: Some(DocumentSummary {
            file_name: upload.file_name,
            format,
            char_count: document.char_count(),
            is_blank: document.is_blank(),
        }),
        language,
        analysis,
    };
    log_analysis(&response);

    Ok(Json(response))
}

/// POST /api/v1/score
///
/// Scores already-extracted text. Same response shape as `/analyze`.
pub async fn handle_score_text(
    State(state): State<AppState>,
    Json(request): Json<ScoreTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let language = check_language(&state, &request.text)?;
    let analysis = analyze_resume(
        &request.text,
        request.job_description.as_deref(),
        &state.rules,
    );

    let response = AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        document: None,
        language,
        analysis,
    };
    log_analysis(&response);

    Ok(Json(response))
}

/// POST /api/v1/match
///
/// Job-match mode when `job_text` is non-blank, vocabulary mode otherwise.
pub async fn handle_match_text(
    State(state): State<AppState>,
    Json(request): Json<MatchTextRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let keywords = &state.rules.keywords;
    let resume = TextProfile::new(&request.resume_text);
    let resume_keyword_density = keyword_frequencies(&resume, keywords);

    let response = match request.job_text.as_deref().map(str::trim) {
        Some(job_text) if !job_text.is_empty() => {
            let job = TextProfile::new(job_text);
            MatchResponse {
                report: match_job(&resume, &job, keywords),
                resume_keyword_density,
                job_keyword_density: keyword_frequencies(&job, keywords),
            }
        }
        _ => MatchResponse {
            report: match_vocabulary(&resume, keywords),
            resume_keyword_density,
            job_keyword_density: Vec::new(),
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/keywords
pub async fn handle_vocabulary(State(state): State<AppState>) -> Json<VocabularyResponse> {
    Json(VocabularyResponse {
        keywords: state.rules.keywords.iter().map(str::to_string).collect(),
        sections: state.rules.sections.iter().map(|s| s.name.clone()).collect(),
        max_score: MAX_SCORE,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<AnalyzeUpload, AppError> {
    let mut upload = AnalyzeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "Malformed multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.resume = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error(e, limit, "Failed to read 'resume' upload"))?,
                );
            }
            "format" | "job_description" => {
                let value = field.text().await.map_err(|e| {
                    multipart_error(e, limit, &format!("Failed to read '{name}' field"))
                })?;
                if name == "format" {
                    upload.format = Some(value);
                } else {
                    upload.job_description = Some(value);
                }
            }
            other => tracing::debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    Ok(upload)
}

/// The body limit surfaces as a multipart read error carrying 413.
fn multipart_error(err: MultipartError, limit: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

fn check_language(state: &AppState, text: &str) -> Result<LanguageReport, AppError> {
    let language = detect_language(text);
    if state.config.english_only {
        require_english(&language)?;
    }
    Ok(language)
}

/// An explicit, non-blank `format` field wins over the file extension.
fn resolve_format(
    format: Option<&str>,
    file_name: Option<&str>,
) -> Result<DocumentFormat, AppError> {
    match (format.map(str::trim).filter(|f| !f.is_empty()), file_name) {
        (Some(tag), _) => DocumentFormat::from_tag(tag),
        (None, Some(name)) => DocumentFormat::from_file_name(name),
        (None, None) => Err(AppError::Validation(
            "cannot determine document format: upload has no file name and no 'format' field"
                .to_string(),
        )),
    }
}

fn log_analysis(response: &AnalysisResponse) {
    let format = response
        .document
        .as_ref()
        .map(|d| d.format.to_string())
        .unwrap_or_else(|| "text".to_string());
    let analysis = &response.analysis;
    info!(
        analysis_id = %response.analysis_id,
        format = %format,
        language = response.language.code.unwrap_or("und"),
        words = analysis.score.word_count,
        score = analysis.score.score,
        job_match = analysis.job_match.is_some(),
        "Resume analyzed"
    );
}
