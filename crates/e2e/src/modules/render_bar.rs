//! Render bar: render trigger and quality controls on the render tab.

use cutline_harness::{Error, Result, ScenarioCx, StepGraph};

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("render_bar.present", &["tab.render.selected"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("render_bar.container", "editor.container")
                .await?;
            Ok(())
        })
    })?;
    Ok(())
}

/// Leaf assertions on the render controls; these never degrade.
pub async fn verify_controls(cx: &mut ScenarioCx) -> Result<()> {
    let start = cx.resolve_required("render_bar.start").await?;
    if !start.elements[0].is_enabled().await? {
        return Err(Error::Assertion("render start button disabled".to_string()));
    }
    cx.resolve_required("render_bar.quality").await?;
    cx.checkpoint("render-bar").await;
    Ok(())
}
