use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. The body is always `{"detail": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub(crate) fn unprocessable(detail: String) -> Self {
        ApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::Rejected {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                detail: rejection.body_text(),
            },
            other => ApiError::unprocessable(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Domain(DomainError::ArticleNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Article not found".to_string())
            }
            ApiError::Domain(DomainError::ValidationError(message)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::Domain(DomainError::RepositoryError(message)) => {
                error!("storage failure: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Rejected { status, detail } => (status, detail),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
