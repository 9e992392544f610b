//! Editor UI modules
//!
//! One module per UI area. Each module contributes named initializer steps
//! to the shared step graph and exposes interaction operations that assume
//! their step's postcondition. Steps are written to be idempotent against
//! live UI state, not just memoization: a suite shares one application
//! instance, so an initializer re-run in a later scenario first probes
//! whether its postcondition already holds.

pub mod create_dialog;
pub mod explorer;
pub mod file_menu;
pub mod icon_bar;
pub mod render_bar;
pub mod render_engine;
pub mod tabs;
pub mod welcome;

use cutline_harness::{Result, StepGraph};

/// Assemble the full step graph for the editor. Registration order follows
/// the dependency order, since prerequisites must pre-exist.
pub fn build_graph() -> Result<StepGraph> {
    let mut graph = StepGraph::new();

    graph.register("session.ready", &[], |cx| {
        Box::pin(async move { cx.ensure_session().await })
    })?;

    welcome::register(&mut graph)?;
    create_dialog::register(&mut graph)?;
    icon_bar::register(&mut graph)?;
    explorer::register(&mut graph)?;
    file_menu::register(&mut graph)?;
    tabs::register(&mut graph)?;
    render_bar::register(&mut graph)?;
    render_engine::register(&mut graph)?;

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_builds_and_knows_every_step() {
        let graph = build_graph().unwrap();
        for name in [
            "session.ready",
            "welcome.visible",
            "create_dialog.open",
            "editor.open",
            "icon_bar.present",
            "explorer.sources.present",
            "explorer.search.present",
            "file_menu.present",
            "render_bar.present",
            "render_engine.present",
        ] {
            assert!(graph.id(name).is_ok(), "missing step {name}");
        }
        for (tab, _) in crate::catalog::TABS {
            assert!(graph.id(&format!("tab.{tab}.selected")).is_ok());
        }
    }
}
