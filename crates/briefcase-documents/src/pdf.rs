use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::ExtractError;

/// Page texts in order 1..N, joined with newlines
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning Err
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("parser panicked on malformed input".to_string()))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "Extracted PDF pages");

    Ok(pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n"))
}
