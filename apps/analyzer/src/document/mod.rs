//! Document Parser: turns a résumé or job description file into plain text.
//!
//! Supported formats are chosen by extension: `.pdf`, `.docx` and `.txt`.

mod docx;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file format: '{0}' (expected .pdf, .docx or .txt)")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Result<Self, DocumentError> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Text),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Text => "txt",
        };
        f.write_str(name)
    }
}

/// Reads `path` and returns its text content.
pub fn parse_document(path: &Path) -> Result<String, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    let format = DocumentFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), %format, bytes = bytes.len(), "parsing document");
    parse_bytes(format, &bytes)
}

/// Decodes an in-memory document of a known format.
pub fn parse_bytes(format: DocumentFormat, bytes: &[u8]) -> Result<String, DocumentError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Pdf(e.to_string())),
        DocumentFormat::Docx => docx::extract_text(bytes),
        DocumentFormat::Text => Ok(decode_text(bytes)),
    }
}

/// UTF-8 first, Latin-1 when the bytes are not valid UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_extension("PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_extension("docx").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_extension("Txt").unwrap(),
            DocumentFormat::Text
        );
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = DocumentFormat::from_extension("rtf").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(ext) if ext == "rtf"));
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let err = parse_document(Path::new("/definitely/not/here/resume.pdf")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_parse_utf8_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Jane Doe\nSKILLS\nRust, Go").unwrap();
        let text = parse_document(file.path()).unwrap();
        assert_eq!(text, "Jane Doe\nSKILLS\nRust, Go");
    }

    #[test]
    fn test_parse_latin1_text_falls_back() {
        // "Café" in Latin-1: 0xE9 is not valid UTF-8 on its own.
        let text = parse_bytes(DocumentFormat::Text, &[b'C', b'a', b'f', 0xE9]).unwrap();
        assert_eq!(text, "Café");
    }

    #[test]
    fn test_unsupported_file_on_disk() {
        let file = tempfile::Builder::new().suffix(".odt").tempfile().unwrap();
        let err = parse_document(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(_)));
    }
}
