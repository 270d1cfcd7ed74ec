//! Résumé PDF → plain text, behind a narrow `extract_text(bytes)` seam.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::documents::{summarize, DocumentError, RESUME_SUMMARY_CHARS};

/// Below this many characters the PDF is treated as scanned/image-only.
const MIN_TEXT_CHARS: usize = 10;

pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Default extractor backed by the `pdf-extract` crate.
pub struct PdfExtractBackend;

impl PdfTextExtractor for PdfExtractBackend {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Extraction(e.to_string()))
    }
}

/// Page-by-page text via `lopdf`; copes with some files `pdf-extract` rejects.
pub struct LopdfBackend;

impl PdfTextExtractor for LopdfBackend {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| DocumentError::Extraction(e.to_string()))?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        document
            .extract_text(&pages)
            .map_err(|e| DocumentError::Extraction(e.to_string()))
    }
}

/// Tries each extractor in order and keeps the first usable text.
///
/// When none yields enough text, the last extractor's result is returned so the caller
/// still sees its error or its short text.
pub struct FallbackExtractor(pub Vec<Arc<dyn PdfTextExtractor>>);

impl PdfTextExtractor for FallbackExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let mut last = Err(DocumentError::Extraction("no PDF extractor configured".to_string()));
        for extractor in &self.0 {
            match extractor.extract_text(bytes) {
                Ok(text) if text.trim().chars().count() >= MIN_TEXT_CHARS => return Ok(text),
                Ok(text) => {
                    debug!("Extractor returned {} characters, trying next", text.trim().chars().count());
                    last = Ok(text);
                }
                Err(e) => {
                    warn!("PDF extractor failed, trying next: {e}");
                    last = Err(e);
                }
            }
        }
        last
    }
}

/// `pdf-extract` first, `lopdf` as fallback.
pub fn default_extractor() -> FallbackExtractor {
    FallbackExtractor(vec![Arc::new(PdfExtractBackend), Arc::new(LopdfBackend)])
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeText {
    pub text: String,
    pub summary: String,
    pub chars: usize,
}

/// Extracts, trims and sanity-checks résumé text from raw PDF bytes.
pub fn resume_text_from_bytes(
    extractor: &dyn PdfTextExtractor,
    bytes: &[u8],
) -> Result<ResumeText, DocumentError> {
    let text = extractor.extract_text(bytes)?.trim().to_string();
    let chars = text.chars().count();
    debug!("Extracted {chars} characters of résumé text");

    if chars < MIN_TEXT_CHARS {
        return Err(DocumentError::NoText { chars });
    }

    Ok(ResumeText {
        summary: summarize(&text, RESUME_SUMMARY_CHARS),
        text,
        chars,
    })
}

/// Reads a résumé PDF from disk. The path must exist and carry a `.pdf` extension.
pub fn extract_resume_text(
    extractor: &dyn PdfTextExtractor,
    path: &Path,
) -> Result<ResumeText, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(DocumentError::NotPdf(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let resume = resume_text_from_bytes(extractor, &bytes)?;
    info!(
        "Extracted résumé text from {} ({} chars)",
        path.display(),
        resume.chars
    );
    Ok(resume)
}
