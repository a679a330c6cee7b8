//! FizzBuzz HTTP service library.
//!
//! Computes configurable FizzBuzz sequences and keeps a concurrent tally of
//! which parameter sets are requested most often.

pub mod cli;
pub mod config;
pub mod fizzbuzz;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod stats;

pub use config::ServerConfig;
pub use fizzbuzz::ParameterRecord;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use stats::{FrequencyCounter, MostFrequent};
