//! File menu: the in-window menu bar entry and its items.

use cutline_harness::{Error, Result, ScenarioCx, StepGraph, Tier};

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("file_menu.present", &["editor.open"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("menu.file", "editor.container")
                .await?;
            Ok(())
        })
    })?;
    Ok(())
}

/// Open the file menu and count its items. Menus animate open, so the
/// items get a dialog-tier settle rather than an immediate resolve.
pub async fn open_and_verify(cx: &mut ScenarioCx) -> Result<usize> {
    let menu = cx.resolve_required("menu.file").await?;
    menu.elements[0].click().await?;
    cx.settle_present("menu.items", Tier::Dialog).await?;

    let items = cx.resolve_required("menu.items").await?;
    let mut labels = Vec::with_capacity(items.len());
    for item in &items.elements {
        labels.push(item.text().await?);
    }
    for expected in ["New Video Assembly", "Open Video Assembly"] {
        if !labels.iter().any(|label| label.contains(expected)) {
            return Err(Error::Assertion(format!(
                "file menu is missing '{expected}' (got {labels:?})"
            )));
        }
    }
    cx.checkpoint("file-menu").await;
    Ok(items.len())
}
