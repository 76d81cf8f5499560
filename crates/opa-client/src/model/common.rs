// Common model types

use serde::Deserialize;

/// OPA response envelope. `result` is absent when the document is undefined.
#[derive(Debug, Deserialize)]
pub(crate) struct OpaResponse<T> {
    pub result: Option<T>,
}

/// Outcome of a `/health` probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy { status: u16 },
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}
