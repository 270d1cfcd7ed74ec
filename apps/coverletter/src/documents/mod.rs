// Document collaborators: plain-text extraction from résumé PDFs and job-description text files.
// The letter core only ever sees already-decoded strings produced here.

pub mod pdf_text;
pub mod text_file;

use std::path::PathBuf;

use thiserror::Error;

pub const RESUME_SUMMARY_CHARS: usize = 1000;
pub const JOB_SUMMARY_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File must be a PDF: {}", .0.display())]
    NotPdf(PathBuf),

    #[error("Error reading file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error writing file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("PDF contains no extractable text ({chars} characters found)")]
    NoText { chars: usize },
}

/// Truncates to `max_chars` characters, appending "..." when anything was cut.
pub fn summarize(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
