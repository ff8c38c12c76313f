pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
pub const TEXT_MIME: &str = "text/plain";

/// Lowercased type/subtype without parameters
pub(crate) fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Resolve the MIME type of an upload.
///
/// Browsers often send `application/octet-stream` (or nothing) for Office
/// files; fall back to the file extension in that case.
pub fn detect_mime(file_name: &str, declared: Option<&str>) -> String {
    if let Some(declared) = declared {
        let essence = essence(declared);
        if !essence.is_empty() && essence != "application/octet-stream" {
            return declared.to_string();
        }
    }

    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => PDF_MIME,
        "docx" => DOCX_MIME,
        "doc" => DOC_MIME,
        "txt" | "md" | "markdown" => TEXT_MIME,
        _ => "application/octet-stream",
    }
    .to_string()
}
