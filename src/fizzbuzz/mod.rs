//! FizzBuzz computation subsystem.
//!
//! # Data Flow
//! ```text
//! raw request input (JSON body or query string)
//!     → validation.rs (parse, collect every violated constraint)
//!     → ParameterRecord (validated, immutable)
//!     → generator.rs (1..=limit, divisibility rule)
//!     → Vec<String>
//! ```
//!
//! # Design Decisions
//! - Transport-agnostic: nothing here knows about HTTP
//! - Validation collects all violations instead of stopping at the first
//! - The generator re-checks its preconditions even though validation
//!   already enforces them

pub mod generator;
pub mod types;
pub mod validation;

pub use generator::{generate, sequence, GenerateError, Sequence};
pub use types::ParameterRecord;
pub use validation::{check_limit_bound, validate, RawParams, ValidationError, Violation};
