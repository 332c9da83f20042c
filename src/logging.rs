// src/logging.rs

use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::info;

use crate::errors::{ParleyError, ParleyResult};

/// Starts the file-backed logger. The TUI owns the terminal, so nothing may
/// write to stdout; keep the returned handle alive for the life of the
/// process.
pub fn init_logging(spec: &str) -> ParleyResult<LoggerHandle> {
    Logger::try_with_str(spec)
        .map_err(|e| ParleyError::config_error(format!("Invalid log specification: {}", e)))?
        .log_to_file(FileSpec::default().basename("parley").suppress_timestamp())
        .start()
        .map_err(|e| ParleyError::config_error(format!("Failed to start logger: {}", e)))
}

/// Appends one line per completed API call.
pub fn log_api_call(endpoint: &str, status: u16, elapsed_ms: u128) {
    info!(
        "{} - Status: {} - Time: {}ms",
        endpoint, status, elapsed_ms
    );
}
