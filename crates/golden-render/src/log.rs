//! Per-device failure logging

use golden_types::Device;
use tracing::error;

/// Records rendering failures against the device being processed
pub trait FailureLog: Send + Sync {
    fn log_failure(&self, device: &Device, message: &str);
}

/// Failure log writing `tracing` error events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureLog;

impl FailureLog for TracingFailureLog {
    fn log_failure(&self, device: &Device, message: &str) {
        error!(device = %device.name, device_id = %device.id, "{message}");
    }
}
