//! Harness configuration

use std::collections::HashMap;
use std::path::PathBuf;

use crate::settle::SettleConfig;

/// Configuration shared by every scenario of a run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path to the Cutline application (Electron app directory or binary).
    pub app_path: PathBuf,

    /// Node binary used to run the automation sidecar.
    pub node_binary: PathBuf,

    /// Extra environment variables for the launched application.
    pub extra_env: HashMap<String, String>,

    /// Output directory for checkpoints and suite reports.
    pub output_dir: PathBuf,

    /// Optional YAML file overriding the built-in locator catalog.
    pub locators_file: Option<PathBuf>,

    /// Stabilization ceilings and backoff schedule.
    pub settle: SettleConfig,

    /// Strategy name that resolves the landing (welcome) view.
    pub landing_strategy: String,

    /// In-page probe reporting the landing container's display flag.
    pub landing_probe: String,

    /// Probe value that means the landing view is showing.
    pub landing_probe_expected: serde_json::Value,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            app_path: PathBuf::from("app"),
            node_binary: PathBuf::from("node"),
            extra_env: HashMap::new(),
            output_dir: PathBuf::from("tests-output"),
            locators_file: None,
            settle: SettleConfig::default(),
            landing_strategy: "welcome.view".to_string(),
            landing_probe:
                "getComputedStyle(document.getElementById('welcome-screen')).display".to_string(),
            landing_probe_expected: serde_json::Value::String("block".to_string()),
        }
    }
}

impl HarnessConfig {
    /// Directory checkpoints are written into.
    pub fn checkpoint_dir(&self) -> PathBuf {
        self.output_dir.join("checkpoints")
    }
}
