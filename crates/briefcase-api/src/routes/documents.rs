use axum::{extract::Multipart, Json};

use briefcase_documents::{detect_mime, extract_text};
use briefcase_types::Document;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};

/// Multipart form accepted by the upload route (documentation only)
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    conversation_id: Option<String>,
}

struct Upload {
    file_name: String,
    declared_type: Option<String>,
    bytes: Vec<u8>,
}

/// Extract the text of an uploaded PDF, Word or plain-text file
///
/// Multipart fields: `file` (required), `conversationId` (optional).
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body(content = DocumentUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted document"),
        (status = 400, description = "Missing file or unreadable document"),
        (status = 415, description = "Unsupported file type")
    ),
    tag = "documents"
)]
pub async fn upload_document(mut multipart: Multipart) -> ApiResult<Json<Document>> {
    let mut upload = None;
    let mut conversation_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let declared_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.body_text()))?;
                upload = Some(Upload {
                    file_name,
                    declared_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("conversationId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.body_text()))?;
                conversation_id = Some(value).filter(|v| !v.trim().is_empty());
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::Validation("missing file field".to_string()))?;
    let mime_type = detect_mime(&upload.file_name, upload.declared_type.as_deref());
    let size = upload.bytes.len() as u64;

    tracing::info!(file = %upload.file_name, mime = %mime_type, size, "Extracting uploaded document");

    let extract_mime = mime_type.clone();
    let content = tokio::task::spawn_blocking(move || extract_text(&upload.bytes, &extract_mime))
        .await
        .map_err(|e| {
            tracing::error!("Extraction task failed: {}", e);
            ApiError::Internal
        })??;

    Ok(Json(Document::new(
        upload.file_name,
        mime_type,
        size,
        content,
        conversation_id,
    )))
}
