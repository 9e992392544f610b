//! Session bootstrap and ownership
//!
//! A [`Session`] pairs the live application process handle with its primary
//! window. The suite that launched the process owns it exclusively;
//! [`Session::close`] consumes the session and terminates the process
//! exactly once. Drivers reap a still-running process on drop as a
//! backstop, so a handle is either absent or valid, never dangling.

use tracing::{debug, info, warn};

use crate::bridge;
use crate::config::HarnessConfig;
use crate::driver::{AppDriver, AppHandle, LaunchSpec, WindowHandle};
use crate::error::{Error, Result};
use crate::locator::Catalog;
use crate::settle::{settle, Readiness, Tier};

pub struct Session {
    app: Option<Box<dyn AppHandle>>,
    window: Box<dyn WindowHandle>,
}

impl Session {
    pub fn new(app: Box<dyn AppHandle>, window: Box<dyn WindowHandle>) -> Self {
        Self {
            app: Some(app),
            window,
        }
    }

    pub fn window(&self) -> &dyn WindowHandle {
        self.window.as_ref()
    }

    /// Terminate the application process. Consumes the session so the
    /// handle cannot be used, or closed, again.
    pub async fn close(mut self) -> Result<()> {
        match self.app.take() {
            Some(app) => app.close().await,
            None => Ok(()),
        }
    }
}

/// Idempotently ensure the application is running and its landing view is
/// showing.
///
/// With an existing session the call is a no-op returning the handle
/// unchanged. Otherwise it launches one process with the test-mode
/// environment marker, waits for the document to load, and settles on the
/// landing view. If the landing view does not appear within the first
/// stabilization window, a compensating reset is issued through the
/// test-control bridge (there is a known race between process launch and
/// initial view selection) and the landing container's display flag must
/// then report the expected value.
pub async fn ensure_session(
    driver: &dyn AppDriver,
    config: &HarnessConfig,
    catalog: &Catalog,
    existing: Option<Session>,
) -> Result<Session> {
    if let Some(session) = existing {
        debug!("session already live; reusing handle");
        return Ok(session);
    }

    info!(app = %config.app_path.display(), "launching application in test mode");
    let spec = LaunchSpec::test_mode(&config.app_path).with_env(&config.extra_env);
    let app = driver.launch(&spec).await?;
    let window = app.first_window().await?;
    window.wait_for_load().await?;

    let landing = catalog.get(&config.landing_strategy)?;
    match settle(
        window.as_ref(),
        Readiness::Present(landing),
        Tier::AppWork,
        &config.settle,
    )
    .await
    {
        Ok(()) => debug!("landing view visible"),
        Err(Error::SettleTimeout { .. }) => {
            warn!("landing view not visible after initial settle; issuing test-control reset");
            bridge::handshake(window.as_ref()).await?;
            bridge::reset_to_landing(window.as_ref()).await?;
            settle(
                window.as_ref(),
                Readiness::Flag {
                    probe: &config.landing_probe,
                    expected: &config.landing_probe_expected,
                },
                Tier::Dialog,
                &config.settle,
            )
            .await?;
            debug!("landing view visible after reset");
        }
        Err(e) => return Err(e),
    }

    Ok(Session::new(app, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Query, Strategy};
    use crate::testkit::FakeDriver;

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert(Strategy::new(
            "welcome.view",
            vec![Query::css("#welcome-screen"), Query::css(".welcome-screen")],
        ));
        catalog
    }

    #[tokio::test(start_paused = true)]
    async fn bootstrap_launches_once_and_reuses_existing_handle() {
        let driver = FakeDriver::new();
        let config = HarnessConfig::default();
        let catalog = test_catalog();

        let session = ensure_session(&driver, &config, &catalog, None)
            .await
            .unwrap();
        assert_eq!(driver.stats().launches, 1);

        let session = ensure_session(&driver, &config, &catalog, Some(session))
            .await
            .unwrap();
        assert_eq!(driver.stats().launches, 1);

        session.close().await.unwrap();
        assert_eq!(driver.stats().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_is_single_use() {
        let driver = FakeDriver::new();
        let config = HarnessConfig::default();
        let catalog = test_catalog();

        let session = ensure_session(&driver, &config, &catalog, None)
            .await
            .unwrap();
        session.close().await.unwrap();
        assert_eq!(driver.stats().closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn launch_carries_test_mode_marker() {
        let driver = FakeDriver::new();
        let config = HarnessConfig::default();
        let catalog = test_catalog();

        let session = ensure_session(&driver, &config, &catalog, None)
            .await
            .unwrap();
        let env = driver.stats().last_env;
        assert_eq!(env.get("CUTLINE_TEST_MODE").map(String::as_str), Some("1"));
        session.close().await.unwrap();
    }
}
