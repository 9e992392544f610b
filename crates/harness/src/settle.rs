//! Stabilization by condition polling
//!
//! After an interaction that may trigger asynchronous UI mutation, the
//! harness waits for an observable readiness predicate instead of sleeping
//! a fixed duration: poll with bounded exponential backoff until the
//! predicate holds or the tier's ceiling elapses. A timeout is reported as
//! [`Error::SettleTimeout`], deliberately distinct from a missing element.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::driver::WindowHandle;
use crate::error::{Error, Result};
use crate::locator::{resolve, Strategy};

/// Expected cost of the operation being waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Local UI toggles (tab switch, icon highlight).
    Local,
    /// Dialog open/close and menu rendering.
    Dialog,
    /// Application-level work such as project creation.
    AppWork,
}

/// Ceilings and backoff schedule for [`settle`].
#[derive(Debug, Clone)]
pub struct SettleConfig {
    pub local_ceiling: Duration,
    pub dialog_ceiling: Duration,
    pub app_work_ceiling: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            local_ceiling: Duration::from_millis(500),
            dialog_ceiling: Duration::from_millis(1000),
            app_work_ceiling: Duration::from_millis(3000),
            initial_interval: Duration::from_millis(50),
            max_interval: Duration::from_millis(400),
        }
    }
}

impl SettleConfig {
    pub fn ceiling(&self, tier: Tier) -> Duration {
        match tier {
            Tier::Local => self.local_ceiling,
            Tier::Dialog => self.dialog_ceiling,
            Tier::AppWork => self.app_work_ceiling,
        }
    }
}

/// An observable predicate the UI must satisfy before the next query.
pub enum Readiness<'a> {
    /// The strategy resolves to at least one element.
    Present(&'a Strategy),
    /// The strategy resolves and its first match reports enabled.
    Enabled(&'a Strategy),
    /// An in-page probe returns the expected JSON value.
    Flag {
        probe: &'a str,
        expected: &'a serde_json::Value,
    },
}

impl Readiness<'_> {
    fn describe(&self) -> String {
        match self {
            Readiness::Present(s) => format!("'{}' present", s.name),
            Readiness::Enabled(s) => format!("'{}' enabled", s.name),
            Readiness::Flag { probe, expected } => format!("probe == {expected} ({probe})"),
        }
    }
}

async fn check(window: &dyn WindowHandle, readiness: &Readiness<'_>) -> Result<bool> {
    match readiness {
        Readiness::Present(strategy) => Ok(!resolve(window, strategy).await?.is_empty()),
        Readiness::Enabled(strategy) => {
            let resolution = resolve(window, strategy).await?;
            match resolution.first() {
                Some(element) => element.is_enabled().await,
                None => Ok(false),
            }
        }
        Readiness::Flag { probe, expected } => {
            Ok(&window.evaluate(probe).await? == *expected)
        }
    }
}

pub(crate) fn next_interval(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

/// Poll the readiness predicate with bounded backoff until it holds or the
/// tier ceiling elapses.
pub async fn settle(
    window: &dyn WindowHandle,
    readiness: Readiness<'_>,
    tier: Tier,
    config: &SettleConfig,
) -> Result<()> {
    let ceiling = config.ceiling(tier);
    let start = Instant::now();
    let mut interval = config.initial_interval;

    loop {
        if check(window, &readiness).await? {
            trace!(waited_ms = start.elapsed().as_millis() as u64, "settled");
            return Ok(());
        }
        let elapsed = start.elapsed();
        if elapsed >= ceiling {
            return Err(Error::SettleTimeout {
                what: readiness.describe(),
                waited_ms: elapsed.as_millis() as u64,
            });
        }
        // Never sleep past the ceiling; the final check happens right at it.
        let remaining = ceiling - elapsed;
        sleep(interval.min(remaining)).await;
        interval = next_interval(interval, config.max_interval);
    }
}

/// Plain bounded pause for interactions with no observable readiness
/// predicate. Pauses for the full tier ceiling; prefer [`settle`].
pub async fn quiesce(tier: Tier, config: &SettleConfig) {
    sleep(config.ceiling(tier)).await;
}
