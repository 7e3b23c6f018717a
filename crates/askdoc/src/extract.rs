//! Text extraction for uploaded documents.
//!
//! The retrieval core treats extraction as an opaque collaborator:
//! bytes plus a content type go in, plain UTF-8 text comes out, or a
//! typed error the caller surfaces verbatim. PDF is the primary
//! format; plain text passes through after UTF-8 validation.

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

/// Extraction failure. Fatal for the request; no retrieval is
/// attempted on a document that could not be read.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedContentType(String),
    Pdf(String),
    Encoding(String),
    Io(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedContentType(ct) => {
                write!(f, "unsupported content-type: {}", ct)
            }
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Encoding(e) => write!(f, "text decoding failed: {}", e),
            ExtractError::Io(e) => write!(f, "failed to read document: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extracts plain text from document bytes.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String, ExtractError> {
    match content_type {
        MIME_PDF => extract_pdf(bytes),
        MIME_TEXT => String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractError::Encoding(e.to_string())),
        _ => Err(ExtractError::UnsupportedContentType(
            content_type.to_string(),
        )),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Maps a file extension to a supported content type.
pub fn content_type_for_path(path: &std::path::Path) -> Result<&'static str, ExtractError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => Ok(MIME_PDF),
        Some("txt") | Some("md") => Ok(MIME_TEXT),
        other => Err(ExtractError::UnsupportedContentType(format!(
            "unrecognized file extension: {}",
            other.unwrap_or("<none>")
        ))),
    }
}

/// Reads a document from disk and extracts its text.
pub fn extract_file(path: &std::path::Path) -> Result<String, ExtractError> {
    let content_type = content_type_for_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))?;
    extract_text(&bytes, content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_content_type_returns_error() {
        let err = extract_text(b"foo", "application/octet-stream").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedContentType(_)));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_text(b"not a pdf", MIME_PDF).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn plain_text_passes_through() {
        let text = extract_text("hello world".as_bytes(), MIME_TEXT).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn invalid_utf8_returns_encoding_error() {
        let err = extract_text(&[0xff, 0xfe, 0x80], MIME_TEXT).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
    }

    #[test]
    fn content_type_by_extension() {
        use std::path::Path;
        assert_eq!(content_type_for_path(Path::new("doc.PDF")).unwrap(), MIME_PDF);
        assert_eq!(content_type_for_path(Path::new("notes.txt")).unwrap(), MIME_TEXT);
        assert!(content_type_for_path(Path::new("archive.zip")).is_err());
    }
}
