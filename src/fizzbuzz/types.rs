//! FizzBuzz parameter types.

use serde::{Deserialize, Serialize};

/// The five values identifying a FizzBuzz request.
///
/// Equality and hashing are structural, so two records built separately
/// from the same values address the same counter entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// First divisor, never zero.
    pub int1: i64,
    /// Second divisor, never zero.
    pub int2: i64,
    /// Last number of the sequence, at least 1.
    pub limit: i64,
    /// Replacement for multiples of `int1`.
    pub str1: String,
    /// Replacement for multiples of `int2`.
    pub str2: String,
}

impl ParameterRecord {
    pub fn new(
        int1: i64,
        int2: i64,
        limit: i64,
        str1: impl Into<String>,
        str2: impl Into<String>,
    ) -> Self {
        Self {
            int1,
            int2,
            limit,
            str1: str1.into(),
            str2: str2.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_equality() {
        let a = ParameterRecord::new(3, 5, 16, "fizz", "buzz");
        let b = ParameterRecord::new(3, 5, 16, String::from("fizz"), String::from("buzz"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));

        let c = ParameterRecord::new(3, 5, 16, "fizz", "bozz");
        assert!(set.insert(c));
    }

    #[test]
    fn test_json_shape() {
        let record = ParameterRecord::new(3, 5, 16, "fizz", "buzz");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"int1": 3, "int2": 5, "limit": 16, "str1": "fizz", "str2": "buzz"})
        );
    }
}
