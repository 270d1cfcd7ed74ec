//! Axum route handlers for the cover-letter API.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::documents::pdf_text::{resume_text_from_bytes, ResumeText};
use crate::documents::{summarize, JOB_SUMMARY_CHARS};
use crate::errors::AppError;
use crate::letter::composer::{generate, LetterInput, SaveOutcome};
use crate::letter::name_extractor::{extract_name, CandidateName};
use crate::letter::skill_matcher::{match_category, MatchResult};
use crate::letter::template::PLACEHOLDERS;
use crate::letter::ComposedLetter;
use crate::pipeline::{default_output_name, pdf_path_for, PDF_TITLE};
use crate::render::{capability, render_to_file, RenderCapability, RenderMetadata, RenderOutcome};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    #[serde(flatten)]
    pub input: LetterInput,
    /// Relative to the configured output directory.
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub render_pdf: bool,
}

#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    pub letter: ComposedLetter,
    pub save: Option<SaveOutcome>,
    pub pdf: Option<RenderOutcome>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub candidate_name: CandidateName,
    pub experience: MatchResult,
    pub key_skills: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct JobSummaryRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct JobSummaryResponse {
    pub summary: String,
    pub chars: usize,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: String,
    pub placeholders: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    /// Relative to the configured output directory; must end in `.pdf`.
    pub output_path: String,
    /// Printed as a heading when given; otherwise the cover-letter layout is used.
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub outcome: RenderOutcome,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Resolves a client-supplied path under `output_dir`. Absolute paths and `..` are rejected.
pub fn resolve_output_path(output_dir: &Path, requested: &str) -> Result<PathBuf, AppError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(AppError::Validation("output_path cannot be empty".to_string()));
    }
    let relative = Path::new(requested);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(AppError::Validation(format!(
            "output_path must be relative to the output directory: {requested}"
        )));
    }
    Ok(output_dir.join(relative))
}

async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters
///
/// Composes a letter. With `output_path` the text is saved; `render_pdf` also writes a PDF
/// next to it (timestamped name when no path is given). Save/render failures are reported
/// in the body, the letter is always returned.
pub async fn handle_compose(
    State(state): State<AppState>,
    Json(request): Json<ComposeRequest>,
) -> Result<Json<ComposeResponse>, AppError> {
    let output_dir = &state.config.output_dir;
    let output = match (&request.output_path, request.render_pdf) {
        (Some(path), _) => Some(resolve_output_path(output_dir, path)?),
        (None, true) => Some(output_dir.join(default_output_name(Local::now()))),
        (None, false) => None,
    };

    let letter_config = Arc::clone(&state.letter_config);
    let renderer = Arc::clone(&state.renderer);
    let render_pdf = request.render_pdf;
    let input = request.input;

    let (outcome, pdf) = run_blocking(move || {
        let outcome = generate(&letter_config, &input, output.as_deref());
        let pdf = match output.as_deref() {
            Some(path) if render_pdf => Some(render_to_file(
                renderer.as_ref(),
                &outcome.letter.text,
                &pdf_path_for(path),
                &RenderMetadata::cover_letter(PDF_TITLE),
            )),
            _ => None,
        };
        (outcome, pdf)
    })
    .await?;

    let mut message = outcome.message();
    if let Some(pdf) = &pdf {
        message.push_str("\n\n");
        message.push_str(&pdf.message());
    }

    Ok(Json(ComposeResponse {
        letter: outcome.letter,
        save: outcome.save,
        pdf,
        message,
    }))
}

/// POST /api/v1/cover-letters/analysis
///
/// Candidate name and both skill matches, without composing a letter.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Json<AnalysisResponse> {
    let vocabulary = &state.letter_config.vocabulary;
    Json(AnalysisResponse {
        candidate_name: extract_name(&request.resume_text),
        experience: match_category(&request.resume_text, &request.job_text, &vocabulary.experience),
        key_skills: match_category(&request.resume_text, &request.job_text, &vocabulary.key_skills),
    })
}

/// POST /api/v1/resumes/extract
///
/// Multipart upload with a `file` field holding the résumé PDF.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeText>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_pdf = field
            .file_name()
            .map(|name| Path::new(name))
            .and_then(Path::extension)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(AppError::Validation("File must be a PDF".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        upload = Some(bytes);
        break;
    }

    let bytes = upload.ok_or_else(|| AppError::Validation("missing `file` field".to_string()))?;
    let extractor = Arc::clone(&state.extractor);
    let resume = run_blocking(move || resume_text_from_bytes(extractor.as_ref(), &bytes)).await??;

    Ok(Json(resume))
}

/// POST /api/v1/jobs/summary
pub async fn handle_job_summary(
    Json(request): Json<JobSummaryRequest>,
) -> Result<Json<JobSummaryResponse>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    Ok(Json(JobSummaryResponse {
        summary: summarize(&request.job_text, JOB_SUMMARY_CHARS),
        chars: request.job_text.chars().count(),
    }))
}

/// GET /api/v1/template
pub async fn handle_get_template(State(state): State<AppState>) -> Json<TemplateResponse> {
    Json(TemplateResponse {
        template: state.letter_config.template.as_str().to_string(),
        placeholders: PLACEHOLDERS,
    })
}

/// POST /api/v1/render
///
/// Renders arbitrary text to a PDF under the output directory.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let path = resolve_output_path(&state.config.output_dir, &request.output_path)?;
    if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
        return Err(AppError::Validation("output_path must end in .pdf".to_string()));
    }

    let metadata = match request.title {
        Some(title) if !title.trim().is_empty() => RenderMetadata::titled(title.trim()),
        _ => RenderMetadata::cover_letter(PDF_TITLE),
    };
    let renderer = Arc::clone(&state.renderer);
    let text = request.text;
    let outcome =
        run_blocking(move || render_to_file(renderer.as_ref(), &text, &path, &metadata)).await?;

    Ok(Json(RenderResponse {
        message: outcome.message(),
        outcome,
    }))
}

/// GET /api/v1/render/capability
pub async fn handle_render_capability(State(state): State<AppState>) -> Json<RenderCapability> {
    Json(capability(state.renderer.as_ref()))
}
