//! Cutline editor end-to-end verification
//!
//! The application-specific layer over `cutline-harness`: the locator
//! catalog for the editor's UI areas, initializer steps wired into one
//! step graph, and the smoke and regression suite definitions. The runner
//! binary lives in `tests/e2e.rs` (`cargo test -p cutline-e2e --test e2e`).

pub mod catalog;
pub mod modules;
pub mod suites;

pub use catalog::{default_catalog, TABS};
pub use modules::build_graph;
pub use suites::{all_suites, regression_suite, smoke_suite};
