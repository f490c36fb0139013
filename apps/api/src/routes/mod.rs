pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/keywords", get(handlers::handle_vocabulary))
        .route(
            "/api/v1/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/score", post(handlers::handle_score_text))
        .route("/api/v1/match", post(handlers::handle_match_text))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::language::tests::{ENGLISH_RESUME, GERMAN_RESUME};
    use crate::analysis::AtsRules;
    use crate::config::Config;
    use crate::extract::pdf::single_page_pdf;

    const BOUNDARY: &str = "ats-test-boundary";

    fn app() -> Router {
        app_with(Config::default())
    }

    fn app_with(config: Config) -> Router {
        build_router(AppState {
            config,
            rules: Arc::new(AtsRules::default()),
        })
    }

    enum Part<'a> {
        File(&'a str, &'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(app(), request).await
    }

    async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_vocabulary_lists_keywords() {
        let request = Request::get("/api/v1/keywords").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let keywords = body["keywords"].as_array().unwrap();
        assert!(keywords.iter().any(|k| k == "python"));
        assert_eq!(body["sections"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_analyze_latex_upload_with_job_description() {
        let tex = br"\section*{Experience}
\begin{itemize}
  \item Built Python services on Docker
\end{itemize}
\section*{Skills} Python, Docker";
        let request = multipart_request(&[
            Part::File("resume", "resume.tex", tex),
            Part::Text("job_description", "Python, SQL, Docker"),
        ]);

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["format"], "latex");
        assert_eq!(body["score"]["has_experience"], true);
        assert_eq!(body["score"]["has_skills"], true);
        assert_eq!(body["score"]["bullet_count"], 1);
        assert_eq!(body["job_match"]["report"]["matched"], json!(["docker", "python"]));
        assert_eq!(body["job_match"]["report"]["missing"], json!(["sql"]));
        assert_eq!(body["job_match"]["report"]["scope"], "job_description");
        assert!(body["analysis_id"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_empty_latex_is_low_score_not_error() {
        let request = multipart_request(&[Part::File("resume", "blank.tex", b"")]);
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["is_blank"], true);
        assert_eq!(body["score"]["score"], 0.0);
        assert!(body["job_match"].is_null());
    }

    #[tokio::test]
    async fn test_analyze_unsupported_extension() {
        let request = multipart_request(&[Part::File("resume", "resume.docx", b"PK\x03\x04")]);
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_analyze_corrupt_pdf() {
        let request = multipart_request(&[Part::File("resume", "resume.pdf", b"not really a pdf")]);
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "CORRUPT_DOCUMENT");
    }

    #[tokio::test]
    async fn test_analyze_requires_resume_field() {
        let request = multipart_request(&[Part::Text("job_description", "Rust")]);
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_score_text_endpoint() {
        let request = json_request(
            "/api/v1/score",
            json!({ "text": "Experience\nEducation\nSkills\njane@example.com" }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["document"].is_null());
        assert_eq!(body["score"]["has_email"], true);
        let score = body["score"]["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    #[tokio::test]
    async fn test_match_text_endpoint_job_mode() {
        let request = json_request(
            "/api/v1/match",
            json!({ "resume_text": "I know Python and Docker", "job_text": "Python, SQL, Docker" }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let ratio = body["report"]["match_ratio"].as_f64().unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(body["job_keyword_density"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_match_text_endpoint_vocabulary_mode() {
        let request = json_request("/api/v1/match", json!({ "resume_text": "Rust" }));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["scope"], "vocabulary");
        assert_eq!(body["report"]["matched"], json!(["rust"]));
    }

    #[tokio::test]
    async fn test_analyze_over_upload_limit_is_413() {
        let config = Config {
            max_upload_bytes: 1024,
            ..Config::default()
        };
        let tex = "Rust ".repeat(820);
        let request = multipart_request(&[Part::File("resume", "resume.tex", tex.as_bytes())]);

        let (status, body) = send_to(app_with(config), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_analyze_under_upload_limit_is_accepted() {
        let config = Config {
            max_upload_bytes: 1024,
            ..Config::default()
        };
        let request = multipart_request(&[Part::File("resume", "resume.tex", b"Skills: Rust")]);
        let (status, _) = send_to(app_with(config), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_pdf_upload() {
        let pdf = single_page_pdf("BT /F1 12 Tf 72 712 Td (Experience at Acme) Tj ET");
        let request = multipart_request(&[Part::File("resume", "resume.pdf", &pdf)]);

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["format"], "pdf");
        assert_eq!(body["document"]["is_blank"], false);
        assert_eq!(body["score"]["word_count"], 3);
    }

    #[tokio::test]
    async fn test_analyze_pdf_without_text_layer_scores_zero() {
        let pdf = single_page_pdf("0 0 m 100 100 l S");
        let request = multipart_request(&[Part::File("resume", "scan.pdf", &pdf)]);

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["is_blank"], true);
        assert_eq!(body["document"]["char_count"], 0);
        assert_eq!(body["score"]["score"], 0.0);
    }

    #[tokio::test]
    async fn test_non_english_resume_is_rejected() {
        let request = multipart_request(&[Part::File(
            "resume",
            "lebenslauf.tex",
            GERMAN_RESUME.as_bytes(),
        )]);
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_LANGUAGE");

        let request = json_request("/api/v1/score", json!({ "text": GERMAN_RESUME }));
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_language_gate_can_be_disabled() {
        let config = Config {
            english_only: false,
            ..Config::default()
        };
        let request = json_request("/api/v1/score", json!({ "text": GERMAN_RESUME }));
        let (status, body) = send_to(app_with(config), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"]["code"], "deu");
    }

    #[tokio::test]
    async fn test_english_resume_reports_language() {
        let request = json_request("/api/v1/score", json!({ "text": ENGLISH_RESUME }));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"]["code"], "eng");
    }
}
