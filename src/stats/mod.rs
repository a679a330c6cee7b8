//! Request statistics subsystem.
//!
//! # Data Flow
//! ```text
//! validated ParameterRecord
//!     → counter.rs (increment under a single lock)
//!
//! /mostfreqreq
//!     → counter.rs (snapshot max + every tied record)
//!     → MostFrequent
//! ```
//!
//! # Design Decisions
//! - One mutex around the whole map: increments and snapshots never interleave
//! - Absence of a key means zero; no zero counts are stored
//! - Owned by the server state and injected into handlers, never global

pub mod counter;

pub use counter::{FrequencyCounter, MostFrequent};
