//! Server settings.
//!
//! Settings are read from `ORDER_`-prefixed environment variables, e.g.
//! `ORDER_BIND_ADDR` or `ORDER_FEE_SCHEDULE_DIR`.  Every setting has a
//! default so the server starts with no configuration at all.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    /// Directory scanned for fee schedule JSON files.
    pub fee_schedule_dir: PathBuf,
    /// Shortest shift, after the lunch break, an order may request.
    pub min_shift_hours: f64,
    /// Fee schedule used by orders that do not name one.
    pub default_fee_schedule: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix("ORDER"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:3000")?
            .set_default("fee_schedule_dir", "fee_schedules")?
            .set_default("min_shift_hours", 7.0)?
            .set_default("default_fee_schedule", crate::fees::STANDARD_SCHEDULE)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
