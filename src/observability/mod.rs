//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and lifecycle produce:
//!     → logging.rs (structured log events, request-scoped spans)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span of a request
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
