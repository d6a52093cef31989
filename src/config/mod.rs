// src/config/mod.rs
use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Port used when the environment does not provide one.
pub const DEFAULT_PORT: u16 = 3333;

/// Configuration resolved from the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvConfig {
    pub port: u16,
}

/// Resolve configuration from environment variables (`PORT`).
pub fn load_env() -> Result<EnvConfig> {
    from_source(Environment::default())
}

fn from_source(source: Environment) -> Result<EnvConfig> {
    let settings = Config::builder()
        .set_default("port", DEFAULT_PORT as i64)
        .context("Failed to seed default configuration")?
        .add_source(source)
        .build()
        .context("Failed to read environment configuration")?;

    settings
        .try_deserialize()
        .context("Failed to parse environment configuration")
}
