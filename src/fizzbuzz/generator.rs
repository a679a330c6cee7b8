//! FizzBuzz sequence generation.

use thiserror::Error;

use crate::fizzbuzz::types::ParameterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("limit must be superior or equal to 1, got {0}")]
    InvalidLimit(i64),
    #[error("divisors can't be zero")]
    ZeroDivisor,
}

/// Lazy FizzBuzz sequence over `1..=limit`.
#[derive(Debug, Clone)]
pub struct Sequence {
    current: i64,
    limit: i64,
    int1: i64,
    int2: i64,
    str1: String,
    str2: String,
}

impl Iterator for Sequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.current >= self.limit {
            return None;
        }
        self.current += 1;
        let i = self.current;

        let mut out = String::new();
        let mut matched = false;
        if i % self.int1 == 0 {
            out.push_str(&self.str1);
            matched = true;
        }
        if i % self.int2 == 0 {
            out.push_str(&self.str2);
            matched = true;
        }
        if !matched {
            out = i.to_string();
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.limit - self.current).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sequence {}

/// Build the lazy sequence for a record.
pub fn sequence(record: &ParameterRecord) -> Result<Sequence, GenerateError> {
    if record.limit < 1 {
        return Err(GenerateError::InvalidLimit(record.limit));
    }
    if record.int1 == 0 || record.int2 == 0 {
        return Err(GenerateError::ZeroDivisor);
    }
    Ok(Sequence {
        current: 0,
        limit: record.limit,
        int1: record.int1,
        int2: record.int2,
        str1: record.str1.clone(),
        str2: record.str2.clone(),
    })
}

/// Generate the whole sequence at once.
pub fn generate(record: &ParameterRecord) -> Result<Vec<String>, GenerateError> {
    Ok(sequence(record)?.collect())
}
