//! Render engine integration: engine panel, settings, and queue as they
//! surface on the render tab. Rendering itself is out of scope; this only
//! verifies the editor wired the engine's UI in.

use cutline_harness::{Result, ScenarioCx, StepGraph, Tier};
use tracing::debug;

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("render_engine.present", &["tab.render.selected"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("render_engine.panel", "render_bar.container")
                .await?;
            Ok(())
        })
    })?;
    Ok(())
}

/// Change a render setting and let the panel react.
pub async fn adjust_settings(cx: &mut ScenarioCx) -> Result<()> {
    let settings = cx.resolve_required("render_engine.settings").await?;
    settings.elements[0].select_option("high").await?;
    cx.quiesce(Tier::Local).await;
    cx.checkpoint("render-settings").await;
    Ok(())
}

/// Verify the render queue is wired in and report how many jobs it lists.
/// An empty queue is normal for a fresh assembly.
pub async fn check_queue(cx: &mut ScenarioCx) -> Result<usize> {
    cx.resolve_required("render_engine.queue").await?;
    let entries = cx.resolve("render_engine.queue_entries").await?;
    debug!(entries = entries.len(), "render queue inspected");
    cx.checkpoint("render-queue").await;
    Ok(entries.len())
}
