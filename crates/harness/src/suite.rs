//! Suite registry and scoped suite execution
//!
//! A suite is an ordered list of scenario functions sharing one
//! exclusively-owned application process for the suite's duration. Running
//! a suite acquires the session up front, threads it through each scenario
//! in order, and releases it exactly once on every exit path. A scenario
//! failure is recorded and the remaining scenarios still run against the
//! same instance; only a launch failure aborts the whole suite.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::chain::{Scenario, ScenarioCx, StepGraph};
use crate::checkpoint::CheckpointRecorder;
use crate::config::HarnessConfig;
use crate::driver::AppDriver;
use crate::error::Result;
use crate::locator::Catalog;
use crate::session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    /// Minimal happy path per UI area.
    Smoke,
    /// Presence and interaction coverage for every UI area.
    Regression,
}

pub type ScenarioFn = for<'a, 'g> fn(&'a mut Scenario<'g>) -> BoxFuture<'a, Result<()>>;

pub struct ScenarioDef {
    pub name: &'static str,
    pub run: ScenarioFn,
}

pub struct Suite {
    pub name: &'static str,
    pub kind: SuiteKind,
    pub scenarios: Vec<ScenarioDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    /// Presence checks that fell back to a structural assertion.
    pub degraded: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite: String,
    pub kind: SuiteKind,
    pub started_at: String,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub scenarios: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

pub struct SuiteRunner {
    driver: Arc<dyn AppDriver>,
    config: HarnessConfig,
    catalog: Catalog,
}

impl SuiteRunner {
    pub fn new(driver: Arc<dyn AppDriver>, config: HarnessConfig, catalog: Catalog) -> Self {
        Self {
            driver,
            config,
            catalog,
        }
    }

    /// Run every scenario of the suite against one shared application
    /// instance. The process is terminated exactly once before this
    /// returns, whatever the scenarios did.
    pub async fn run(&self, graph: &StepGraph, suite: &Suite) -> Result<SuiteResult> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();

        info!(suite = suite.name, "acquiring application instance");
        let mut session = Some(
            session::ensure_session(self.driver.as_ref(), &self.config, &self.catalog, None)
                .await?,
        );

        // One recorder for the whole run: label counters must span
        // scenario boundaries so repeated labels get distinct paths.
        let mut recorder = Some(CheckpointRecorder::new(self.config.checkpoint_dir()));

        let mut results = Vec::new();
        for def in &suite.scenarios {
            let scenario_start = Instant::now();
            let mut cx = ScenarioCx::new(
                self.driver.clone(),
                self.config.clone(),
                self.catalog.clone(),
                session.take(),
            );
            if let Some(recorder) = recorder.take() {
                cx.checkpoints = recorder;
            }
            let mut scenario = Scenario::new(graph, cx);
            let outcome = (def.run)(&mut scenario).await;
            let mut cx = scenario.into_cx();
            session = cx.take_session();
            let degraded = cx.degraded().to_vec();
            recorder = Some(cx.checkpoints);

            let duration_ms = scenario_start.elapsed().as_millis() as u64;
            match outcome {
                Ok(()) => {
                    info!("✓ {} ({} ms)", def.name, duration_ms);
                    results.push(ScenarioResult {
                        name: def.name.to_string(),
                        passed: true,
                        duration_ms,
                        error: None,
                        degraded,
                    });
                }
                Err(e) => {
                    error!("✗ {} - {}", def.name, e);
                    results.push(ScenarioResult {
                        name: def.name.to_string(),
                        passed: false,
                        duration_ms,
                        error: Some(e.to_string()),
                        degraded,
                    });
                }
            }
        }

        // Release on every path; the loop above never returns early.
        if let Some(session) = session.take() {
            if let Err(e) = session.close().await {
                warn!(error = %e, "application close reported an error");
            }
        }

        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "suite '{}': {} passed, {} failed ({} ms)",
            suite.name, passed, failed, duration_ms
        );

        Ok(SuiteResult {
            suite: suite.name.to_string(),
            kind: suite.kind,
            started_at,
            duration_ms,
            total: results.len(),
            passed,
            failed,
            scenarios: results,
        })
    }

    /// Write the suite report as JSON into the output directory.
    pub fn write_report(&self, result: &SuiteResult) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self
            .config
            .output_dir
            .join(format!("{}-report.json", result.suite));
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "suite report written");
        Ok(path)
    }
}
