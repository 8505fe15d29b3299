//! The envelope every handler answers with.
//!
//! Success: `{"success": true, "data": <T>, "message": "..."}`
//! Failure: `{"success": false, "error": {"type": "...", "message": "...", "code": 400}}`

use serde::Serialize;

use crate::constants::{DEFAULT_SUCCESS_MESSAGE, UNKNOWN_ERROR_MESSAGE};
use crate::error::{AppError, ErrorDetail, ErrorKind, ErrorResponse};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        build_success(data, None)
    }

    pub fn with_message(data: T, message: &str) -> Self {
        build_success(data, Some(message))
    }
}

/// Wraps `data` in a success envelope. `message` defaults to "Operation successful".
pub fn build_success<T>(data: T, message: Option<&str>) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        message: message.unwrap_or(DEFAULT_SUCCESS_MESSAGE).to_string(),
    }
}

/// Classifies `error` into the error envelope.
pub fn build_error(error: &AppError) -> ErrorResponse {
    let kind = error.kind();
    let message = match kind {
        ErrorKind::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
        _ => error.to_string(),
    };

    ErrorResponse {
        success: false,
        error: ErrorDetail {
            error_type: kind.type_tag().to_string(),
            message,
            code: kind.status_code().as_u16(),
        },
    }
}
