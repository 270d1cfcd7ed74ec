//! File-based end-to-end flow: résumé PDF + job text → saved letter (+ optional PDF).
//!
//! Reading the inputs is the only fatal step. Once a letter is composed, save and render
//! problems come back as outcome values alongside it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::documents::pdf_text::{extract_resume_text, PdfTextExtractor};
use crate::documents::text_file::read_job_description;
use crate::documents::DocumentError;
use crate::letter::{generate, CoverLetterOutcome, LetterConfig, LetterInput};
use crate::render::{render_to_file, DocumentRenderer, RenderMetadata, RenderOutcome};

pub const PDF_TITLE: &str = "Cover Letter";

#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    pub resume_pdf: PathBuf,
    pub job_text: PathBuf,
    pub company: Option<String>,
    pub position: Option<String>,
    /// Text output path. `None` picks a timestamped name inside `output_dir`.
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub render_pdf: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub cover_letter: CoverLetterOutcome,
    pub pdf: Option<RenderOutcome>,
}

impl PipelineReport {
    pub fn message(&self) -> String {
        match &self.pdf {
            Some(pdf) => format!("{}\n\n{}", self.cover_letter.message(), pdf.message()),
            None => self.cover_letter.message(),
        }
    }
}

/// `cover_letter_YYYYmmdd_HHMMSS.txt`
pub fn default_output_name(now: DateTime<Local>) -> String {
    format!("cover_letter_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

pub fn generate_from_files(
    config: &LetterConfig,
    extractor: &dyn PdfTextExtractor,
    renderer: &dyn DocumentRenderer,
    params: GenerateParams,
) -> Result<PipelineReport, DocumentError> {
    let resume = extract_resume_text(extractor, &params.resume_pdf)?;
    let job = read_job_description(&params.job_text)?;

    let output = params
        .output
        .unwrap_or_else(|| params.output_dir.join(default_output_name(Local::now())));

    let input = LetterInput {
        resume_text: resume.text,
        job_text: job.text,
        company: params.company,
        position: params.position,
    };
    let cover_letter = generate(config, &input, Some(&output));
    info!(
        "Composed letter for {} ({} experience matches, {} key skills)",
        cover_letter.letter.candidate_name.as_str(),
        cover_letter.letter.experience_matches.len(),
        cover_letter.letter.key_skill_matches.len()
    );

    let pdf = params.render_pdf.then(|| {
        render_to_file(
            renderer,
            &cover_letter.letter.text,
            &pdf_path_for(&output),
            &RenderMetadata::cover_letter(PDF_TITLE),
        )
    });

    Ok(PipelineReport { cover_letter, pdf })
}

/// PDF companion of a saved letter. Never the letter path itself: `letter.pdf` maps to
/// `letter.letter.pdf`.
pub fn pdf_path_for(text_path: &Path) -> PathBuf {
    let is_pdf = text_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return text_path.with_extension("pdf");
    }
    let stem = text_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover_letter".to_string());
    text_path.with_file_name(format!("{stem}.letter.pdf"))
}
