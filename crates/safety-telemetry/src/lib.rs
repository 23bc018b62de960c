//! # Safety Telemetry
//!
//! Logging and metrics plumbing shared by every safety binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use safety_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // application code
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full `EnvFilter` directive, overrides `TS_LOG_LEVEL` |
//! | `TS_LOG_LEVEL` | `info` | Log level filter |
//! | `TS_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `TS_SERVICE_NAME` | `tourist-safety` | Service name in logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::encode_metrics;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging. Metrics need no initialization; subsystem counters
/// register themselves on first use.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)
}
