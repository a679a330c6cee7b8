//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned / propagated)
//!     → handlers.rs (method check, decode, validate, count, generate)
//!     → response.rs (errors mapped to status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
