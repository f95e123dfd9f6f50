//! Error types for the REST layer.
//!
//! [`ApiError`] unifies service failures, rejected request bodies, and
//! unmatched routes into a single enum whose
//! [`IntoResponse`](axum::response::IntoResponse) impl renders the
//! failure [`Envelope`].

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use fieldwatch_core::ServiceError;
use tracing::warn;

use crate::envelope::Envelope;

/// Errors that can occur while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service rejected or failed the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The body was missing, malformed, or of an unsupported type.
    #[error("invalid request body: {detail}")]
    Body {
        /// 413 for an oversized body, 400 otherwise.
        status: StatusCode,
        /// Extractor detail.
        detail: String,
    },

    /// No route matches the method and path.
    #[error("Cannot {method} {path}")]
    NoRoute {
        /// Request method.
        method: Method,
        /// Path with query string.
        path: String,
    },

    /// A handler panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body {
            status: body_status(rejection.status()),
            detail: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::Body {
            status: body_status(rejection.status()),
            detail: rejection.body_text(),
        }
    }
}

/// Extractor statuses other than 413 collapse to 400.
fn body_status(status: StatusCode) -> StatusCode {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        status
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::InvalidInput(_) | ServiceError::DuplicateKey(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::NotFound(_)) | Self::NoRoute { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::Service(ServiceError::Store(_)) | Self::Panic(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Body { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Service(ServiceError::InvalidInput(violations)) => {
                Envelope::failure("Validation Error").with_errors(violations.into_messages())
            }
            Self::Service(ServiceError::NotFound(kind)) => {
                Envelope::failure(kind.not_found_message())
            }
            Self::Service(ServiceError::DuplicateKey(key)) => {
                Envelope::failure("Duplicate entry detected").with_error(key)
            }
            Self::Service(ServiceError::Store(detail)) => {
                Envelope::failure("Internal server error").with_error(detail)
            }
            Self::Body { detail, .. } => {
                warn!(%status, %detail, "rejected request body");
                Envelope::failure("Invalid request body").with_error(detail)
            }
            Self::NoRoute { method, path } => {
                Envelope::failure(format!("Cannot {method} {path}"))
            }
            Self::Panic(detail) => Envelope::failure("Internal server error").with_error(detail),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use fieldwatch_core::Violations;
    use fieldwatch_types::RecordKind;

    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (
                ApiError::Service(ServiceError::InvalidInput(Violations::single("x"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Service(ServiceError::DuplicateKey("_id".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Service(ServiceError::NotFound(RecordKind::Plant)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Service(ServiceError::Store("down".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::NoRoute {
                    method: Method::GET,
                    path: "/nope".to_owned(),
                },
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err}");
        }
    }

    #[test]
    fn body_rejections_are_400_unless_too_large() {
        assert_eq!(
            body_status(StatusCode::UNSUPPORTED_MEDIA_TYPE),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            body_status(StatusCode::UNPROCESSABLE_ENTITY),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            body_status(StatusCode::PAYLOAD_TOO_LARGE),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn no_route_message_names_method_and_path() {
        let err = ApiError::NoRoute {
            method: Method::DELETE,
            path: "/api/unknown?x=1".to_owned(),
        };
        assert_eq!(err.to_string(), "Cannot DELETE /api/unknown?x=1");
    }
}
