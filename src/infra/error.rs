//! Types for reporting errors that happened during a request.
//!
//! Everything below the HTTP handlers returns an [`ApiResult`].
//! The handlers decide on the status code, since the same kind of error
//! is reported differently depending on the route.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tower_http::catch_panic::ResponseForPanic;

/// The values of an item broke one of its construction rules.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ValidationError {
    reason: String,
}

impl ValidationError {
    /// Constructs a new [`ValidationError`].
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Which rule was broken.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// An error from our API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad input values.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// No matching record.
    #[error("{0}")]
    NotFound(String),
    /// The business key is already taken.
    #[error("{0}")]
    Conflict(String),
    /// The database failed.
    #[error("{context}: {source}")]
    Storage {
        /// What we were doing when it failed.
        context: String,
        /// The driver error.
        #[source]
        source: sqlx::Error,
    },
}

/// The result of calling API-related functions.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Constructs a [`ApiError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Constructs a [`ApiError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Wraps a driver error with some context.
    pub fn storage(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// Whether this is a [`ApiError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The status code used when a route does not say otherwise.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Conflict(_) | Self::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Turns the error into a response with a specific status code.
    pub fn with_status(self, status: StatusCode) -> ErrorResponse {
        if let Self::Storage { .. } = self {
            tracing::error!("storage error: {}", self);
        }
        ErrorResponse::new(status, self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// A status code with a plain text message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    message: String,
}

impl ErrorResponse {
    /// Constructs a new [`ErrorResponse`].
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

}

#[cfg(test)]
impl ErrorResponse {
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

/// Used by typed paths without parameters when the path does not match.
impl Default for ErrorResponse {
    fn default() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(e: ApiError) -> Self {
        let status = e.status();
        e.with_status(status)
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(value: JsonRejection) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, value.body_text())
    }
}

impl From<PathRejection> for ErrorResponse {
    fn from(value: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, value.body_text())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// A handler for converting panics into proper responses for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        _: Box<dyn std::any::Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        tracing::error!("handler panicked");
        ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}
