//! Command-line interface.
//!
//! Every flag can also be supplied through the environment, which is how
//! the service is usually configured in containers.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "fizzbuzz-server")]
#[command(about = "FizzBuzz HTTP service with request statistics", long_about = None)]
pub struct Cli {
    /// Optional TOML config file.
    #[arg(short, long, env = "FIZZBUZZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}
