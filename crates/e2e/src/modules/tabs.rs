//! Editor tabs: one step per tab, selection is idempotent.

use cutline_harness::{Result, ScenarioCx, StepGraph, Tier};

use crate::catalog::TABS;

pub fn register(graph: &mut StepGraph) -> Result<()> {
    for (name, _) in TABS {
        let tab = name.to_string();
        graph.register(
            format!("tab.{name}.selected"),
            &["editor.open"],
            move |cx| {
                let tab = tab.clone();
                Box::pin(async move { select_tab(cx, &tab).await })
            },
        )?;
    }
    Ok(())
}

/// Activate a tab by name. A no-op when its panel is already showing.
pub async fn select_tab(cx: &mut ScenarioCx, name: &str) -> Result<()> {
    let panel = format!("tab.{name}.panel");
    if !cx.resolve(&panel).await?.is_empty() {
        return Ok(());
    }
    let button = cx.resolve_required(&format!("tab.{name}.button")).await?;
    button.elements[0].click().await?;
    cx.settle_present(&panel, Tier::Local).await
}
