//! Runtime configuration
//!
//! Values come from the process environment (and a `.env` file when present):
//! - `CHANMON_MONITOR_DIR`: directory recordings are written to
//! - `CHANMON_DEFAULT_FORMAT`: format tag used when a request names none
//! - `CHANMON_BIND_ADDR`: listen address of the admin bridge

use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_MONITOR_DIR: &str = "/var/spool/chanmon/monitor";
pub const DEFAULT_FORMAT: &str = "wav";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5038";

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub monitor_dir: PathBuf,
    pub default_format: String,
    pub bind_addr: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitor_dir: PathBuf::from(DEFAULT_MONITOR_DIR),
            default_format: DEFAULT_FORMAT.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Config rooted at `dir`, everything else default
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            monitor_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Load config from env, falling back to defaults for unset or empty values
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            monitor_dir: PathBuf::from(get("CHANMON_MONITOR_DIR", DEFAULT_MONITOR_DIR)),
            default_format: get("CHANMON_DEFAULT_FORMAT", DEFAULT_FORMAT),
            bind_addr: get("CHANMON_BIND_ADDR", DEFAULT_BIND_ADDR),
        };
        info!("Configs loaded:");
        info!("  Monitor dir: {:?}", config.monitor_dir);
        info!("  Default format: {}", config.default_format);
        info!("  Bind addr: {}", config.bind_addr);
        config
    }
}
