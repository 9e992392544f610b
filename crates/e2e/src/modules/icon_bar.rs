//! Left icon bar: tool icons along the editor's left edge.

use cutline_harness::{Error, Result, ScenarioCx, StepGraph, Tier};
use tracing::info;

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("icon_bar.present", &["editor.open"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("icon_bar.container", "panel.any")
                .await?;
            Ok(())
        })
    })?;
    Ok(())
}

/// Click every icon in turn, capturing a checkpoint after each. Icons
/// swap the active panel, so handles are re-resolved per iteration rather
/// than held across clicks. Returns the icon count; an empty bar is a
/// failure, not a degradation.
pub async fn click_each_icon(cx: &mut ScenarioCx) -> Result<usize> {
    let count = cx.resolve_required("icon_bar.icons").await?.len();
    for index in 0..count {
        let icons = cx.resolve_required("icon_bar.icons").await?;
        let Some(icon) = icons.elements.get(index) else {
            return Err(Error::Assertion(format!(
                "icon bar shrank to {} icons mid-walk",
                icons.len()
            )));
        };
        icon.click().await?;
        cx.quiesce(Tier::Local).await;
        cx.checkpoint("icon-click").await;
    }
    info!(count, "icon bar walk complete");
    Ok(count)
}
