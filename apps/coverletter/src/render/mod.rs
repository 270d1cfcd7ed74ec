// Document Renderer
// Turns a composed plain-text letter into a paginated PDF. Always a secondary artifact:
// every failure is reported as a `RenderOutcome` and never affects the text letter.

pub mod font_metrics;
pub mod layout;
#[cfg(feature = "pdf")]
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::documents::text_file::read_text_file;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Unavailable(String),

    #[error("rendering backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// Stored in the PDF document info.
    pub document_title: String,
    /// Printed above the body when present; switches to the titled-document layout.
    #[serde(default)]
    pub heading: Option<String>,
}

impl RenderMetadata {
    pub fn cover_letter(document_title: impl Into<String>) -> Self {
        Self {
            document_title: document_title.into(),
            heading: None,
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            document_title: title.clone(),
            heading: Some(title),
        }
    }
}

pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// A document backend. Implement this to swap PDF libraries without touching callers.
pub trait DocumentRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn render(&self, text: &str, metadata: &RenderMetadata) -> Result<RenderedDocument, RenderError>;
}

/// Stands in when no PDF backend is compiled in.
pub struct UnavailableRenderer;

const UNAVAILABLE_REASON: &str =
    "PDF rendering backend is not available (built without the `pdf` feature)";

impl DocumentRenderer for UnavailableRenderer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn render(&self, _text: &str, _metadata: &RenderMetadata) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::Unavailable(UNAVAILABLE_REASON.to_string()))
    }
}

/// The best renderer this build supports.
pub fn default_renderer() -> Arc<dyn DocumentRenderer> {
    #[cfg(feature = "pdf")]
    {
        Arc::new(pdf::PrintPdfRenderer)
    }
    #[cfg(not(feature = "pdf"))]
    {
        Arc::new(UnavailableRenderer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    Rendered {
        path: PathBuf,
        bytes: u64,
        pages: usize,
    },
    /// No backend: the caller should fall back to the plain-text letter.
    Unavailable { message: String },
    Failed { path: PathBuf, reason: String },
}

impl RenderOutcome {
    pub fn message(&self) -> String {
        match self {
            RenderOutcome::Rendered { path, bytes, pages } => format!(
                "PDF successfully created: {} ({bytes} bytes, {pages} page{})",
                path.display(),
                if *pages == 1 { "" } else { "s" }
            ),
            RenderOutcome::Unavailable { message } => message.clone(),
            RenderOutcome::Failed { path, reason } => {
                format!("Error creating PDF {}: {reason}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderCapability {
    pub available: bool,
    pub backend: &'static str,
    pub message: String,
}

pub fn capability(renderer: &dyn DocumentRenderer) -> RenderCapability {
    let available = renderer.is_available();
    RenderCapability {
        available,
        backend: renderer.name(),
        message: if available {
            format!("PDF rendering via {} is ready to use", renderer.name())
        } else {
            format!("{UNAVAILABLE_REASON}; rebuild with `--features pdf` to enable PDF output")
        },
    }
}

/// Renders `text` and writes the document to `path`, creating parent directories.
pub fn render_to_file(
    renderer: &dyn DocumentRenderer,
    text: &str,
    path: &Path,
    metadata: &RenderMetadata,
) -> RenderOutcome {
    let document = match renderer.render(text, metadata) {
        Ok(document) => document,
        Err(RenderError::Unavailable(reason)) => {
            warn!("PDF rendering skipped: {reason}");
            return RenderOutcome::Unavailable {
                message: format!("{reason}. The plain-text letter was generated successfully; use it instead."),
            };
        }
        Err(e) => {
            warn!("PDF rendering failed for {}: {e}", path.display());
            return RenderOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
        }
    };

    let written = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::write(path, &document.bytes));

    match written {
        Ok(()) => {
            info!(
                "PDF written to {} ({} bytes, {} pages)",
                path.display(),
                document.bytes.len(),
                document.pages
            );
            RenderOutcome::Rendered {
                path: path.to_path_buf(),
                bytes: document.bytes.len() as u64,
                pages: document.pages,
            }
        }
        Err(e) => {
            warn!("Failed to write PDF {}: {e}", path.display());
            RenderOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

/// Converts a text file to a titled PDF. Defaults the output to the same path with `.pdf`.
pub fn text_to_pdf(
    renderer: &dyn DocumentRenderer,
    text_path: &Path,
    pdf_path: Option<&Path>,
) -> RenderOutcome {
    let pdf_path = pdf_path.map_or_else(|| text_path.with_extension("pdf"), Path::to_path_buf);

    let document = match read_text_file(text_path) {
        Ok(document) => document,
        Err(e) => {
            return RenderOutcome::Failed {
                path: pdf_path,
                reason: e.to_string(),
            }
        }
    };

    let title = text_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Document".to_string());

    render_to_file(
        renderer,
        &document.content,
        &pdf_path,
        &RenderMetadata::titled(title),
    )
}
