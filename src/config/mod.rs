use std::path::{Path, PathBuf};

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::cli::Cli;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// File receiving tracing output; the terminal belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_database_url() -> String {
    "sqlite://invoices.db".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("invoice-workspace.log")
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.database_url {
            self.database_url = url.clone();
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Initialize environment variables and load configuration
pub fn init(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_cli(cli);

    Ok(config)
}
