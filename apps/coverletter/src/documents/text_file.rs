use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::documents::{summarize, DocumentError, JOB_SUMMARY_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextDocument {
    pub content: String,
    pub encoding: TextEncoding,
}

/// Decodes bytes as UTF-8, falling back to Latin-1 (every byte maps to one codepoint).
pub fn decode_text(bytes: Vec<u8>) -> TextDocument {
    match String::from_utf8(bytes) {
        Ok(content) => TextDocument {
            content,
            encoding: TextEncoding::Utf8,
        },
        Err(e) => TextDocument {
            content: e.into_bytes().into_iter().map(char::from).collect(),
            encoding: TextEncoding::Latin1,
        },
    }
}

pub fn read_text_file(path: &Path) -> Result<TextDocument, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = decode_text(bytes);
    debug!(
        "Read {} ({:?}, {} bytes)",
        path.display(),
        document.encoding,
        document.content.len()
    );
    Ok(document)
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDescription {
    pub text: String,
    pub summary: String,
    pub encoding: TextEncoding,
}

/// Loads a job description; the summary keeps the first 2000 characters.
pub fn read_job_description(path: &Path) -> Result<JobDescription, DocumentError> {
    let document = read_text_file(path)?;
    info!("Job description loaded from {}", path.display());
    Ok(JobDescription {
        summary: summarize(&document.content, JOB_SUMMARY_CHARS),
        text: document.content,
        encoding: document.encoding,
    })
}

/// Writes UTF-8 text, creating missing parent directories.
pub fn write_text_file(path: &Path, content: &str) -> Result<(), DocumentError> {
    let write_err = |source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    writer.write_all(content.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        fs::write(&path, "Ingénieur logiciel — Python").unwrap();

        let document = read_text_file(&path).unwrap();
        assert_eq!(document.encoding, TextEncoding::Utf8);
        assert_eq!(document.content, "Ingénieur logiciel — Python");
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        // "Café" in Latin-1: 0xE9 is not valid UTF-8 on its own.
        fs::write(&path, [b'C', b'a', b'f', 0xE9]).unwrap();

        let document = read_text_file(&path).unwrap();
        assert_eq!(document.encoding, TextEncoding::Latin1);
        assert_eq!(document.content, "Café");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
        assert!(err.to_string().starts_with("File not found: "));
    }

    #[test]
    fn test_job_description_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        fs::write(&path, "a".repeat(2500)).unwrap();

        let job = read_job_description(&path).unwrap();
        assert_eq!(job.text.len(), 2500);
        assert_eq!(job.summary.len(), JOB_SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x").join("y").join("out.txt");
        write_text_file(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "content");
    }

    #[test]
    fn test_write_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = write_text_file(&blocker.join("out.txt"), "content").unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
    }
}
