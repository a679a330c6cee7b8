//! Per-parameter request counter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fizzbuzz::ParameterRecord;

/// Snapshot of the highest count and every record sharing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostFrequent {
    /// Highest count observed, 0 when nothing was counted yet.
    pub count: u64,
    /// All records tied at `count`, in ascending record order.
    pub params: Vec<ParameterRecord>,
}

/// Thread-safe tally of requests per parameter record.
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    counts: Mutex<HashMap<ParameterRecord, u64>>,
}

impl FrequencyCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the map consistent, so a poisoned lock
    // is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<ParameterRecord, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one more request for `record` and return its new count.
    pub fn increment(&self, record: ParameterRecord) -> u64 {
        let mut counts = self.lock();
        let count = counts.entry(record).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count for `record`, 0 if it was never seen.
    pub fn get(&self, record: &ParameterRecord) -> u64 {
        self.lock().get(record).copied().unwrap_or(0)
    }

    /// Number of distinct records counted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The highest count and all records tied at it.
    pub fn most_frequent(&self) -> MostFrequent {
        let counts = self.lock();

        let mut max = 0;
        let mut params = Vec::new();
        for (record, &count) in counts.iter() {
            if count > max {
                max = count;
                params.clear();
                params.push(record.clone());
            } else if count == max {
                params.push(record.clone());
            }
        }
        drop(counts);

        params.sort();
        MostFrequent { count: max, params }
    }
}
