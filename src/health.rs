//! Liveness reporting.
use serde::Serialize;
use std::time::Instant;

/// The instant the service started, captured once.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_seconds: f64,
}

impl Uptime {
    #[must_use]
    pub fn start() -> Self {
        Uptime {
            started: Instant::now(),
        }
    }

    /// Always healthy. This doesn't check that the DNS script is runnable.
    #[must_use]
    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            uptime_seconds: self.started.elapsed().as_secs_f64(),
        }
    }
}
