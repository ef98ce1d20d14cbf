//! HTTP-facing errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;
use crate::templates::RenderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("invalid form submission: {0}")]
    Validation(String),

    #[error("unreadable request body: {reason}")]
    Body { status: StatusCode, reason: String },

    #[error("{action} failed: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    /// Wrap a store failure with what the handler was doing.
    /// `StoreError::NotFound` becomes a plain 404.
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| match source {
            StoreError::NotFound => AppError::NotFound,
            source => AppError::Store { action, source },
        }
    }

    /// A body the extractors refused, keeping their status (400, 413, ...)
    pub fn body(status: StatusCode, reason: String) -> AppError {
        AppError::Body { status, reason }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Body { status, .. } => *status,
            AppError::Store { .. } | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound => "Not Found",
            AppError::Validation(reason) => {
                tracing::debug!("Rejected form submission: {}", reason);
                "Bad Request"
            }
            AppError::Body { reason, .. } => {
                tracing::debug!("Rejected request body: {}", reason);
                status.canonical_reason().unwrap_or("Bad Request")
            }
            AppError::Store { .. } | AppError::Render(_) => {
                tracing::error!("{}", self);
                "Internal Server Error"
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = AppError::store("fetching post")(StoreError::NotFound);
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failure_keeps_context() {
        let err = AppError::store("creating post")(StoreError::DuplicateSlug("a".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "creating post failed: slug `a` is already taken"
        );
    }

    #[test]
    fn test_render_failure_is_500() {
        let err = AppError::from(RenderError::UnknownView("nope".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_is_400() {
        let err = AppError::Validation("bad escape".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_rejection_keeps_status() {
        let err = AppError::body(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
