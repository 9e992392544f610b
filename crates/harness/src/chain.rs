//! Dependency-chain resolution for cascading test state
//!
//! Test modules do not call each other's entry points inline. Instead each
//! module registers named initializer steps into a [`StepGraph`], an arena
//! of steps where prerequisites are declared by name and must already be
//! registered, which keeps the graph acyclic by construction. A
//! [`Scenario`] executes steps through [`Scenario::ensure`]: the
//! unsatisfied prerequisite closure runs in dependency order and every step
//! is memoized for the rest of the scenario, so re-requesting an
//! already-satisfied precondition is a no-op.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::checkpoint::CheckpointRecorder;
use crate::config::HarnessConfig;
use crate::driver::{AppDriver, WindowHandle};
use crate::error::{Error, Result};
use crate::locator::{self, Catalog, Resolution};
use crate::session::{self, Session};
use crate::settle::{self, Readiness, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId(usize);

pub type StepFuture<'a> = BoxFuture<'a, Result<()>>;
pub type StepFn = Box<dyn for<'a> Fn(&'a mut ScenarioCx) -> StepFuture<'a> + Send + Sync>;

pub struct Step {
    pub name: String,
    pub requires: Vec<StepId>,
    run: StepFn,
}

/// Arena of named initializer steps forming a DAG.
#[derive(Default)]
pub struct StepGraph {
    steps: Vec<Step>,
    by_name: HashMap<String, StepId>,
}

impl StepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step. Prerequisites are looked up by name and must
    /// already be registered; a step can therefore never depend on itself
    /// or on anything registered after it.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        requires: &[&str],
        run: F,
    ) -> Result<StepId>
    where
        F: for<'a> Fn(&'a mut ScenarioCx) -> StepFuture<'a> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(Error::Graph(format!("step '{name}' registered twice")));
        }
        let requires = requires
            .iter()
            .map(|dep| self.id(dep))
            .collect::<Result<Vec<_>>>()?;
        let id = StepId(self.steps.len());
        self.by_name.insert(name.clone(), id);
        self.steps.push(Step {
            name,
            requires,
            run: Box::new(run),
        });
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Result<StepId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownStep(name.to_string()))
    }

    pub fn step(&self, id: StepId) -> &Step {
        &self.steps[id.0]
    }

    /// Unsatisfied prerequisite closure of `target` in dependency order,
    /// target last.
    pub fn schedule(&self, target: StepId, satisfied: &HashSet<StepId>) -> Vec<StepId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(target, false)];

        while let Some((id, children_done)) = stack.pop() {
            if satisfied.contains(&id) {
                continue;
            }
            if children_done {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for dep in self.step(id).requires.iter().rev() {
                stack.push((*dep, false));
            }
        }
        order
    }
}

/// Shared services every step and interaction operation works against.
pub struct ScenarioCx {
    pub driver: Arc<dyn AppDriver>,
    pub config: HarnessConfig,
    pub catalog: Catalog,
    pub checkpoints: CheckpointRecorder,
    session: Option<Session>,
    degraded: Vec<String>,
}

impl ScenarioCx {
    pub fn new(
        driver: Arc<dyn AppDriver>,
        config: HarnessConfig,
        catalog: Catalog,
        session: Option<Session>,
    ) -> Self {
        let checkpoints = CheckpointRecorder::new(config.checkpoint_dir());
        Self {
            driver,
            config,
            catalog,
            checkpoints,
            session,
            degraded: Vec::new(),
        }
    }

    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NoSession)
    }

    pub fn window(&self) -> Result<&dyn WindowHandle> {
        Ok(self.session()?.window())
    }

    pub fn take_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    pub fn put_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Idempotent session bootstrap; the root step of every chain.
    pub async fn ensure_session(&mut self) -> Result<()> {
        let existing = self.session.take();
        let session = session::ensure_session(
            self.driver.as_ref(),
            &self.config,
            &self.catalog,
            existing,
        )
        .await?;
        self.session = Some(session);
        Ok(())
    }

    /// Resolve a named strategy against the current window. Empty
    /// resolutions are returned, not raised.
    pub async fn resolve(&self, strategy: &str) -> Result<Resolution> {
        locator::resolve(self.window()?, self.catalog.get(strategy)?).await
    }

    /// Resolve a named strategy, raising `MissingElement` when every query
    /// comes back empty. For leaf assertions and interactions.
    pub async fn resolve_required(&self, strategy: &str) -> Result<Resolution> {
        let resolution = self.resolve(strategy).await?;
        if resolution.is_empty() {
            return Err(Error::MissingElement {
                strategy: strategy.to_string(),
            });
        }
        Ok(resolution)
    }

    /// Resolve a presence strategy, degrading to a broader structural
    /// check when the intended elements are altogether absent. Every
    /// degradation is recorded on the scenario result and logged; only
    /// presence/navigation steps may use this, leaf assertions never
    /// degrade.
    pub async fn resolve_or_degrade(
        &mut self,
        strategy: &str,
        structural: &str,
    ) -> Result<Resolution> {
        let resolution = self.resolve(strategy).await?;
        if !resolution.is_empty() {
            return Ok(resolution);
        }
        warn!(
            strategy,
            fallback = structural,
            "intended elements absent; degrading to structural check"
        );
        let broad = self.resolve(structural).await?;
        if broad.is_empty() {
            return Err(Error::MissingElement {
                strategy: strategy.to_string(),
            });
        }
        self.degraded.push(strategy.to_string());
        Ok(broad)
    }

    /// Presence checks recorded by [`Self::resolve_or_degrade`].
    pub fn degraded(&self) -> &[String] {
        &self.degraded
    }

    pub async fn settle_present(&self, strategy: &str, tier: Tier) -> Result<()> {
        settle::settle(
            self.window()?,
            Readiness::Present(self.catalog.get(strategy)?),
            tier,
            &self.config.settle,
        )
        .await
    }

    pub async fn settle_enabled(&self, strategy: &str, tier: Tier) -> Result<()> {
        settle::settle(
            self.window()?,
            Readiness::Enabled(self.catalog.get(strategy)?),
            tier,
            &self.config.settle,
        )
        .await
    }

    pub async fn settle_flag(
        &self,
        probe: &str,
        expected: &serde_json::Value,
        tier: Tier,
    ) -> Result<()> {
        settle::settle(
            self.window()?,
            Readiness::Flag { probe, expected },
            tier,
            &self.config.settle,
        )
        .await
    }

    pub async fn quiesce(&self, tier: Tier) {
        settle::quiesce(tier, &self.config.settle).await;
    }

    /// Best-effort checkpoint of the current UI state.
    pub async fn checkpoint(&mut self, label: &str) {
        let Some(session) = self.session.as_ref() else {
            warn!(label, "no live session; checkpoint skipped");
            return;
        };
        self.checkpoints.capture(session.window(), label).await;
    }
}

/// One run's execution state over a step graph.
pub struct Scenario<'g> {
    graph: &'g StepGraph,
    satisfied: HashSet<StepId>,
    pub cx: ScenarioCx,
}

impl<'g> Scenario<'g> {
    pub fn new(graph: &'g StepGraph, cx: ScenarioCx) -> Self {
        Self {
            graph,
            satisfied: HashSet::new(),
            cx,
        }
    }

    /// Ensure the named precondition holds: run its unsatisfied
    /// prerequisite closure in dependency order, memoizing each step.
    pub async fn ensure(&mut self, name: &str) -> Result<()> {
        let target = self.graph.id(name)?;
        let plan = self.graph.schedule(target, &self.satisfied);
        for id in &plan {
            let step = self.graph.step(*id);
            debug!(step = %step.name, "running initializer step");
            (step.run)(&mut self.cx).await?;
            self.satisfied.insert(*id);
        }
        Ok(())
    }

    pub fn satisfied(&self, name: &str) -> bool {
        self.graph
            .id(name)
            .map(|id| self.satisfied.contains(&id))
            .unwrap_or(false)
    }

    pub fn into_cx(self) -> ScenarioCx {
        self.cx
    }
}
