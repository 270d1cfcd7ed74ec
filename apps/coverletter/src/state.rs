use std::sync::Arc;

use crate::config::Config;
use crate::documents::pdf_text::PdfTextExtractor;
use crate::letter::LetterConfig;
use crate::render::DocumentRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary and template, loaded once at startup.
    pub letter_config: Arc<LetterConfig>,
    /// Pluggable PDF backend. Default: printpdf, or `UnavailableRenderer` without the `pdf` feature.
    pub renderer: Arc<dyn DocumentRenderer>,
    pub extractor: Arc<dyn PdfTextExtractor>,
}
