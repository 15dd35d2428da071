//! # IPC Telemetry
//!
//! Logging bootstrap for processes hosting or invoking typed IPC channels.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ipc_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TYPED_IPC_SERVICE_NAME` | `typed-ipc` | Service name in the startup log |
//! | `TYPED_IPC_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `TYPED_IPC_CONSOLE_OUTPUT` | `true` | Emit logs to the console |
//! | `TYPED_IPC_JSON_LOGS` | `false` | JSON instead of pretty output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

#[doc(hidden)]
pub use tracing;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Create an `info` span for work on one channel.
///
/// # Example
///
/// ```rust,ignore
/// use ipc_telemetry::ipc_span;
///
/// let _span = ipc_span!("sum", sender_id = 3).entered();
/// ```
#[macro_export]
macro_rules! ipc_span {
    ($channel:expr) => {
        $crate::tracing::info_span!("ipc", channel = %$channel)
    };
    ($channel:expr, $($field:tt)*) => {
        $crate::tracing::info_span!("ipc", channel = %$channel, $($field)*)
    };
}
