//! Time source abstraction for the deploy-path retry loop
//!
//! The resolver names retry candidates from the current time and sleeps
//! between attempts, so tests inject a clock instead of relying on
//! wall-clock timing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Source of the current time and of the retry backoff wait
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Block the sequential flow for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
