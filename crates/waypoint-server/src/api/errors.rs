//! Error handling for the Waypoint Server API
//!
//! This module contains standardized error handling for the API.

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use waypoint_core::{CoreError, ErrorKind};

/// API Error type for returning standard error responses
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Bad request (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "ERR_BAD_REQUEST",
            message: message.into(),
        }
    }

    /// Map a core error, reporting every caller-side failure with `status`.
    ///
    /// Storage failures stay 500 regardless.
    pub fn with_client_status(err: CoreError, status: StatusCode) -> Self {
        let mut api = Self::from(err);
        if api.status != StatusCode::INTERNAL_SERVER_ERROR {
            api.status = status;
        }
        api
    }

    /// HTTP status of the response
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error message sent to the client
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
        ErrorKind::NotFound => "ERR_NOT_FOUND",
        ErrorKind::Conflict => "ERR_CONFLICT",
        ErrorKind::InvalidStructure => "ERR_VALIDATION_ERROR",
        ErrorKind::IllegalTransition => "ERR_ILLEGAL_TRANSITION",
        ErrorKind::Storage => "ERR_STATE_STORE_ERROR",
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let kind = err.kind();
        let status = match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::MalformedInput
            | ErrorKind::Conflict
            | ErrorKind::InvalidStructure
            | ErrorKind::IllegalTransition => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code: error_code(kind),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "ERR_MALFORMED_INPUT",
            message: rejection.body_text(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "error": self.message,
            "errorDetails": {
                "errorCode": self.code,
                "errorMessage": self.message,
            }
        }));

        (self.status, body).into_response()
    }
}
