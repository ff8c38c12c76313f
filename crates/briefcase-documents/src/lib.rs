//! Plain-text extraction for uploaded documents.
//!
//! Only text survives extraction: no layout, no OCR.

mod error;
mod mime;
mod pdf;
mod word;

pub use error::ExtractError;
pub use mime::{detect_mime, DOC_MIME, DOCX_MIME, PDF_MIME, TEXT_MIME};

/// Extract plain text from `bytes` according to `mime_type`.
///
/// MIME parameters (`; charset=...`) are ignored when matching.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Result<String, ExtractError> {
    let essence = mime::essence(mime_type);
    tracing::debug!(mime = %essence, size = bytes.len(), "Extracting document text");

    match essence.as_str() {
        PDF_MIME => pdf::extract(bytes),
        DOCX_MIME | DOC_MIME => word::extract(bytes),
        m if m.starts_with("text/") => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(ExtractError::UnsupportedFileType(mime_type.to_string())),
    }
}
