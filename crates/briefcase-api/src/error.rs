use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use briefcase_billing::BillingError;
use briefcase_documents::ExtractError;
use briefcase_persist::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// LLM, payment processor, scraper or tracing service failure
    #[error("{0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_)
            | ApiError::Store(_)
            | ApiError::Config(_)
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                self.to_string()
            }
            ApiError::Store(ref e) => {
                tracing::error!("Storage error: {}", e);
                "Storage error".to_string()
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                self.to_string()
            }
            ApiError::Internal => {
                tracing::error!("Internal error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConversationNotFound(id) => {
                ApiError::NotFound(format!("Conversation not found: {}", id))
            }
            StoreError::InvalidId(id) => ApiError::Validation(format!("invalid id: {}", id)),
            other => ApiError::Store(other),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::SessionOwnership(_) => ApiError::Forbidden(err.to_string()),
            BillingError::NoSubscription(_)
            | BillingError::InvalidSessionId(_)
            | BillingError::InvalidTransition { .. } => ApiError::Validation(err.to_string()),
            BillingError::Processor { .. } | BillingError::Transport(_) => {
                ApiError::Upstream(err.to_string())
            }
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFileType(mime) => ApiError::UnsupportedFileType(mime),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Upstream(format!("{:#}", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UnsupportedFileType("image/png".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_billing_errors() {
        let forbidden: ApiError = BillingError::SessionOwnership("cs_1".into()).into();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let missing: ApiError = BillingError::NoSubscription("cs_1".into()).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let upstream: ApiError = BillingError::Processor {
            status: 404,
            message: "No such checkout.session".into(),
        }
        .into();
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(upstream.to_string().contains("No such checkout.session"));
    }

    #[test]
    fn test_store_and_extract_errors() {
        let not_found: ApiError = StoreError::ConversationNotFound("c1".into()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unsupported: ApiError = ExtractError::UnsupportedFileType("image/png".into()).into();
        assert_eq!(unsupported.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(unsupported.to_string(), "Unsupported file type: image/png");
    }

    #[test]
    fn test_anyhow_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to send request");
        let api: ApiError = err.into();
        assert_eq!(api.to_string(), "Failed to send request: connection refused");
    }
}
