//! Request parameter validation.
//!
//! # Responsibilities
//! - Decode raw input into an untyped-but-shaped `RawParams`
//! - Check every constraint and report all violations at once
//! - Produce a client-safe message and an internal diagnostic
//!
//! # Design Decisions
//! - Absent and `null` fields are equivalent; unknown keys are ignored
//! - A zero limit counts as missing, a negative one as invalid
//! - Malformed input fails before any field-level check runs

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::fizzbuzz::types::ParameterRecord;

/// Client message for input that could not be decoded at all.
pub const INVALID_PARAMS: &str = "invalid params";

/// Parameters as received, before any constraint is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawParams {
    pub int1: Option<i64>,
    pub int2: Option<i64>,
    pub limit: Option<i64>,
    pub str1: Option<String>,
    pub str2: Option<String>,
}

impl RawParams {
    /// Decode a JSON object. Arrays, scalars and `null` are rejected even
    /// though serde would map a sequence onto the fields by position.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(ValidationError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// A single violated field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Int1Missing,
    Int2Missing,
    LimitMissing,
    LimitNotPositive,
    LimitTooLarge(i64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Violation::Int1Missing => "int1 missing (can't be zero)",
            Violation::Int2Missing => "int2 missing (can't be zero)",
            Violation::LimitMissing => "limit missing (can't be inferior to one)",
            Violation::LimitNotPositive => "limit must be superior to one",
            Violation::LimitTooLarge(max) => return write!(f, "limit can't be superior to {max}"),
        };
        f.write_str(msg)
    }
}

/// Why a set of parameters was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload could not be decoded.
    #[error("unmarshalling params: {0}")]
    Malformed(String),

    /// One or more fields broke their constraint, in field order.
    #[error("{}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

impl ValidationError {
    /// Description safe to send back to the caller.
    pub fn client_message(&self) -> String {
        match self {
            ValidationError::Malformed(_) => INVALID_PARAMS.to_string(),
            ValidationError::Invalid(violations) => join_violations(violations),
        }
    }

    /// Full description for logs.
    pub fn internal_message(&self) -> String {
        self.to_string()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check raw parameters and build the canonical record.
pub fn validate(raw: RawParams) -> Result<ParameterRecord, ValidationError> {
    let int1 = raw.int1.unwrap_or(0);
    let int2 = raw.int2.unwrap_or(0);
    let limit = raw.limit.unwrap_or(0);

    let mut violations = Vec::new();
    if int1 == 0 {
        violations.push(Violation::Int1Missing);
    }
    if int2 == 0 {
        violations.push(Violation::Int2Missing);
    }
    if limit == 0 {
        violations.push(Violation::LimitMissing);
    } else if limit < 0 {
        violations.push(Violation::LimitNotPositive);
    }

    if !violations.is_empty() {
        return Err(ValidationError::Invalid(violations));
    }

    Ok(ParameterRecord {
        int1,
        int2,
        limit,
        str1: raw.str1.unwrap_or_default(),
        str2: raw.str2.unwrap_or_default(),
    })
}

/// Reject records whose limit exceeds the configured maximum.
pub fn check_limit_bound(record: &ParameterRecord, max_limit: i64) -> Result<(), ValidationError> {
    if record.limit > max_limit {
        return Err(ValidationError::Invalid(vec![Violation::LimitTooLarge(max_limit)]));
    }
    Ok(())
}
