//! Automation driver capability surface
//!
//! Object-safe async traits mirroring what the harness consumes from the
//! automation layer: process launch, window lookup, element queries and
//! interactions, in-page evaluation, the test-control transport, and
//! screenshots. Production runs use [`playwright::PlaywrightDriver`]; the
//! orchestration tests use the scripted driver in [`crate::testkit`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::bridge::{ControlRequest, ControlResponse};
use crate::error::Result;
use crate::locator::Query;

pub mod playwright;

/// Environment variable marking a test-mode launch of the application.
pub const TEST_MODE_ENV: &str = "CUTLINE_TEST_MODE";

/// How to launch the target application.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub app_path: PathBuf,
    pub env: HashMap<String, String>,
}

impl LaunchSpec {
    /// A launch spec carrying the test-mode environment marker.
    pub fn test_mode(app_path: impl Into<PathBuf>) -> Self {
        let mut env = HashMap::new();
        env.insert(TEST_MODE_ENV.to_string(), "1".to_string());
        env.insert("NODE_ENV".to_string(), "test".to_string());
        Self {
            app_path: app_path.into(),
            env,
        }
    }

    pub fn with_env(mut self, extra: &HashMap<String, String>) -> Self {
        for (key, value) in extra {
            self.env.insert(key.clone(), value.clone());
        }
        self
    }
}

#[async_trait]
pub trait AppDriver: Send + Sync {
    /// Start one OS-level application process.
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn AppHandle>>;
}

#[async_trait]
pub trait AppHandle: Send + Sync {
    async fn first_window(&self) -> Result<Box<dyn WindowHandle>>;

    /// Terminate the application process. Implementations must tolerate
    /// being the only close call and must reap the process on drop as a
    /// backstop.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait WindowHandle: Send + Sync {
    async fn wait_for_load(&self) -> Result<()>;

    /// All elements currently matching the query. Read-only.
    async fn query_all(&self, query: &Query) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Evaluate a script in the page and return its JSON result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Transport one test-control request to the application.
    async fn control(&self, request: &ControlRequest) -> Result<ControlResponse>;

    /// Send a keyboard key to the focused window, e.g. "Escape" to
    /// dismiss a native dialog the driver cannot otherwise reach.
    async fn press(&self, key: &str) -> Result<()>;

    async fn screenshot(&self, path: &Path) -> Result<()>;
}

#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn click(&self) -> Result<()>;
    async fn fill(&self, text: &str) -> Result<()>;
    async fn select_option(&self, value: &str) -> Result<()>;
    async fn is_enabled(&self) -> Result<bool>;
    async fn text(&self) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_spec_carries_marker() {
        let spec = LaunchSpec::test_mode("app");
        assert_eq!(spec.env.get(TEST_MODE_ENV).map(String::as_str), Some("1"));
        assert_eq!(spec.env.get("NODE_ENV").map(String::as_str), Some("test"));
    }
}
