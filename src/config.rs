use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "epialert")]
#[command(about = "Load a dataset, pick columns and a method, and run it on the EpiAlertR analysis service")]
pub struct Config {
    /// Base URL of the analysis service
    #[arg(long, env = "EPIALERT_SERVICE_URL", default_value = "http://localhost:5000")]
    pub service_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "EPIALERT_TIMEOUT_SECS", default_value = "120")]
    pub timeout_secs: u64,

    /// Dataset to open at start-up
    pub file: Option<PathBuf>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
