//! Endpoint handlers.
//!
//! Each handler is a thin async shell around a synchronous `process_*`
//! function returning `Result<Response, ApiError>`; the shell logs the
//! internal side of any error and records metrics.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::fizzbuzz::{self, check_limit_bound, RawParams, ValidationError};
use crate::http::request::RequestIdExt;
use crate::http::response::{json_ok, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;

const FIZZBUZZ: &str = "fizzbuzz";
const MOST_FREQUENT: &str = "mostfreqreq";
const FALLBACK: &str = "fallback";

/// `GET /fizzbuzz`
pub async fn fizzbuzz(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let result = process_fizzbuzz(&state, &method, &uri, body);
    finish(FIZZBUZZ, &headers, start, result)
}

/// `GET /mostfreqreq`
pub async fn most_frequent(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let result = process_most_frequent(&state, &method);
    finish(MOST_FREQUENT, &headers, start, result)
}

/// Any unknown path.
pub async fn not_found(uri: Uri, headers: HeaderMap) -> Response {
    let start = Instant::now();
    finish(
        FALLBACK,
        &headers,
        start,
        Err(ApiError::NotFound(uri.path().to_string())),
    )
}

fn finish(
    endpoint: &'static str,
    headers: &HeaderMap,
    start: Instant,
    result: Result<Response, ApiError>,
) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                request_id = %headers.request_id(),
                status = err.status().as_u16(),
                error = %err.internal_message(),
                "Error while processing request"
            );
            err.into_response()
        }
    };
    metrics::record_request(endpoint, response.status().as_u16(), start);
    response
}

fn ensure_get(method: &Method) -> Result<(), ApiError> {
    if *method != Method::GET {
        return Err(ApiError::MethodNotAllowed(method.clone()));
    }
    Ok(())
}

fn process_fizzbuzz(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    ensure_get(method)?;

    let body = body.map_err(body_error)?;
    let raw = decode_params(uri, &body)?;
    let record = fizzbuzz::validate(raw)?;
    check_limit_bound(&record, state.max_limit)?;

    let count = state.counter.increment(record.clone());
    metrics::record_distinct_params(state.counter.len());
    tracing::debug!(?record, count, "Parameters counted");

    let output = fizzbuzz::generate(&record)
        .map_err(|e| ApiError::Internal(format!("error executing fizzbuzz: {e}")))?;
    json_ok(&output)
}

fn body_error(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::Internal(format!("error reading body: {}", rejection.body_text()))
    }
}

fn process_most_frequent(state: &AppState, method: &Method) -> Result<Response, ApiError> {
    ensure_get(method)?;
    json_ok(&state.counter.most_frequent())
}

/// Parameters come from the JSON body, or from the query string when the
/// body is blank and a query is present.
fn decode_params(uri: &Uri, body: &[u8]) -> Result<RawParams, ValidationError> {
    let blank = body.iter().all(u8::is_ascii_whitespace);
    if blank && uri.query().is_some() {
        return Query::<RawParams>::try_from_uri(uri)
            .map(|Query(raw)| raw)
            .map_err(|e| ValidationError::Malformed(e.body_text()));
    }
    RawParams::from_json(body)
}
