//! Cutline UI Verification Harness
//!
//! This crate provides a Rust-controlled end-to-end verification engine
//! that:
//! - Launches the desktop application through a pluggable driver
//!   (Playwright/Electron sidecar in production, a scripted fake in tests)
//! - Resolves UI elements through ranked locator strategies loaded as data
//! - Stabilizes on observed conditions with tiered polling ceilings
//! - Orchestrates named steps as a memoized dependency graph
//! - Runs suites against one shared application instance with guaranteed
//!   teardown, and writes JSON reports
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SuiteRunner (Rust)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  run(graph, suite) -> SuiteResult                            │
//! │    ├── ensure_session() -> Session      (launch once)        │
//! │    ├── Scenario::ensure("step")         (memoized DAG)       │
//! │    │     ├── resolve(strategy)          (ranked queries)     │
//! │    │     ├── settle(readiness, tier)    (condition polling)  │
//! │    │     ├── bridge::send(request)      (typed test-control) │
//! │    │     └── checkpoint(label)          (best-effort PNG)    │
//! │    └── Session::close()                 (exactly once)       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  AppDriver / AppHandle / WindowHandle / ElementHandle        │
//! │    ├── playwright::PlaywrightDriver     (node sidecar, JSON) │
//! │    └── testkit::FakeDriver              (scripted UI model)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod chain;
pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod error;
pub mod locator;
pub mod session;
pub mod settle;
pub mod suite;
pub mod testkit;

pub use chain::{Scenario, ScenarioCx, StepGraph, StepId};
pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use session::{ensure_session, Session};
pub use settle::{SettleConfig, Tier};
pub use suite::{ScenarioDef, Suite, SuiteKind, SuiteResult, SuiteRunner};
