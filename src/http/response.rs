//! Error responses.
//!
//! # Responsibilities
//! - Map every failure to a status code and a `{"code","desc"}` JSON body
//! - Keep internal diagnostics out of the client body
//! - Add `Allow: GET` to 405 responses
//! - Turn middleware failures (body limit, timeout) into the same JSON shape
//!
//! # Design Decisions
//! - Each error carries two views: `client_body()` is serialised,
//!   `internal_message()` is only logged
//! - Internal failures always answer with the fixed "internal error" text

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    BoxError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::timeout::error::Elapsed;

use crate::fizzbuzz::ValidationError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub desc: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid method {0}")]
    MethodNotAllowed(Method),

    #[error("invalid params: {}", .0.internal_message())]
    InvalidParams(#[from] ValidationError),

    #[error("no route for {0}")]
    NotFound(String),

    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the caller gets to see.
    pub fn client_body(&self) -> ErrorBody {
        let desc = match self {
            ApiError::MethodNotAllowed(_) => "method not allowed".to_string(),
            ApiError::InvalidParams(err) => err.client_message(),
            ApiError::NotFound(_) => "not found".to_string(),
            ApiError::PayloadTooLarge(_) => "payload too large".to_string(),
            ApiError::Timeout => "request timeout".to_string(),
            ApiError::Internal(_) => "internal error".to_string(),
        };
        ErrorBody {
            code: self.status().as_u16(),
            desc,
        }
    }

    /// Full diagnostic for logs.
    pub fn internal_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.client_body()) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode error body");
                Vec::new()
            }
        };

        let mut response = json_response(self.status(), body);
        if let ApiError::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET"));
        }
        response
    }
}

/// Error handler for the middleware stack: a timeout becomes 408, anything
/// else is an internal error.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    let err = if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("middleware error: {err}"))
    };
    tracing::warn!(
        status = err.status().as_u16(),
        error = %err.internal_message(),
        "Request aborted by middleware"
    );
    err.into_response()
}

/// Build a response with an already encoded JSON body.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Encode `value` as a 200 JSON response.
pub fn json_ok<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value)
        .map_err(|e| ApiError::Internal(format!("error marshalling json: {e}")))?;
    Ok(json_response(StatusCode::OK, body))
}
