pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Letter synthesis
        .route("/api/v1/cover-letters", post(handlers::handle_compose))
        .route(
            "/api/v1/cover-letters/analysis",
            post(handlers::handle_analysis),
        )
        .route("/api/v1/template", get(handlers::handle_get_template))
        // Document collaborators
        .route(
            "/api/v1/resumes/extract",
            post(handlers::handle_extract_resume),
        )
        .route("/api/v1/jobs/summary", post(handlers::handle_job_summary))
        // Rendering
        .route("/api/v1/render", post(handlers::handle_render))
        .route(
            "/api/v1/render/capability",
            get(handlers::handle_render_capability),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::documents::pdf_text::PdfTextExtractor;
    use crate::documents::DocumentError;
    use crate::letter::LetterConfig;
    use crate::render::{
        DocumentRenderer, RenderError, RenderMetadata, RenderedDocument, UnavailableRenderer,
    };

    struct FixedText(&'static str);

    impl PdfTextExtractor for FixedText {
        fn extract_text(&self, _bytes: &[u8]) -> Result<String, DocumentError> {
            Ok(self.0.to_string())
        }
    }

    fn test_state(output_dir: &Path) -> AppState {
        AppState {
            config: Config {
                output_dir: output_dir.to_path_buf(),
                ..Config::default()
            },
            letter_config: Arc::new(LetterConfig::default()),
            renderer: Arc::new(UnavailableRenderer),
            extractor: Arc::new(FixedText("Jane Smith\nSoftware Engineer\nPython, AWS")),
        }
    }

    struct StubPdf;

    impl DocumentRenderer for StubPdf {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn render(&self, _text: &str, _metadata: &RenderMetadata) -> Result<RenderedDocument, RenderError> {
            Ok(RenderedDocument {
                bytes: b"%PDF-stub".to_vec(),
                pages: 1,
            })
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "coverletter");
    }

    #[tokio::test]
    async fn test_compose_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/cover-letters",
                json!({
                    "resume_text": "Jane Smith\nSkills: Python, AWS, Docker, React",
                    "job_text": "Python developer with AWS and Docker. React is a plus.",
                    "company": "Acme Corp",
                    "position": "Backend Engineer"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let text = body["letter"]["text"].as_str().unwrap();
        assert!(text.contains("the Backend Engineer position at Acme Corp"));
        assert!(text.ends_with("Jane Smith"));
        assert!(body["save"].is_null());
        assert_eq!(body["letter"]["candidate_name"]["status"], "extracted");
    }

    #[tokio::test]
    async fn test_compose_saves_and_reports_missing_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/cover-letters",
                json!({
                    "resume_text": "",
                    "job_text": "",
                    "output_path": "acme/letter.txt",
                    "render_pdf": true
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["save"]["status"], "saved");
        assert_eq!(body["pdf"]["status"], "unavailable");
        assert!(dir.path().join("acme").join("letter.txt").exists());
        assert!(body["letter"]["text"].as_str().unwrap().ends_with("Your Name"));
    }

    #[tokio::test]
    async fn test_compose_pdf_output_keeps_text_letter() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            renderer: Arc::new(StubPdf),
            ..test_state(dir.path())
        };
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/cover-letters",
                json!({
                    "resume_text": "Jane Smith",
                    "job_text": "Python",
                    "output_path": "letter.pdf",
                    "render_pdf": true
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pdf"]["status"], "rendered");
        let text = body["letter"]["text"].as_str().unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("letter.pdf")).unwrap(),
            text
        );
        assert_eq!(
            std::fs::read(dir.path().join("letter.letter.pdf")).unwrap(),
            b"%PDF-stub"
        );
    }

    #[tokio::test]
    async fn test_compose_rejects_escaping_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/cover-letters",
                json!({ "resume_text": "", "job_text": "", "output_path": "../x.txt" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/cover-letters/analysis",
                json!({
                    "resume_text": "📧 john@x.com | 📞 555-0100\npython sql",
                    "job_text": "python and sql"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidate_name"]["status"], "placeholder");
        assert_eq!(body["experience"]["terms"], json!(["python", "sql"]));
        assert_eq!(body["key_skills"]["terms"], json!(["Python"]));
    }

    #[tokio::test]
    async fn test_extract_resume_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-stub\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/v1/resumes/extract")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().starts_with("Jane Smith"));
    }

    #[tokio::test]
    async fn test_job_summary_rejects_blank() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, _) = send(
            app,
            post_json("/api/v1/jobs/summary", json!({ "job_text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_template_and_capability() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, body) = send(
            build_router(state.clone()),
            Request::get("/api/v1/template").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["template"]
            .as_str()
            .unwrap()
            .contains("{{candidate_name}}"));
        assert_eq!(body["placeholders"].as_array().unwrap().len(), 6);

        let (status, body) = send(
            build_router(state),
            Request::get("/api/v1/render/capability")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], false);
    }

    #[tokio::test]
    async fn test_render_requires_pdf_extension() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let (status, _) = send(
            app,
            post_json(
                "/api/v1/render",
                json!({ "text": "Hello", "output_path": "letter.txt" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
