//! New-assembly dialog: template selection, title entry, creation.

use cutline_harness::{Result, ScenarioCx, StepGraph, Tier};
use tracing::{debug, info};
use uuid::Uuid;

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("create_dialog.open", &["welcome.visible"], |cx| {
        Box::pin(async move {
            if !cx.resolve("editor.container").await?.is_empty() {
                debug!("editor already open; skipping dialog");
                return Ok(());
            }
            if cx.resolve("dialog.container").await?.is_empty() {
                super::welcome::click_new_assembly(cx).await?;
            }
            cx.resolve_required("dialog.template").await?;
            cx.resolve_required("dialog.title").await?;
            cx.resolve_required("dialog.create").await?;
            Ok(())
        })
    })?;

    graph.register("editor.open", &["create_dialog.open"], |cx| {
        Box::pin(async move {
            if !cx.resolve("editor.container").await?.is_empty() {
                return Ok(());
            }
            create_assembly(cx).await?;
            Ok(())
        })
    })?;

    Ok(())
}

/// Fill the dialog and create the assembly. Returns the generated title.
/// Creation is the one transition allowed the full app-work stabilization
/// ceiling, since it writes the assembly to disk before the editor shows.
pub async fn create_assembly(cx: &mut ScenarioCx) -> Result<String> {
    let title = format!("Test Video {}", Uuid::new_v4());

    let template = cx.resolve_required("dialog.template").await?;
    template.elements[0].select_option("default").await?;

    let title_input = cx.resolve_required("dialog.title").await?;
    title_input.elements[0].fill(&title).await?;
    cx.checkpoint("create-dialog-filled").await;

    // The dialog enables the button once the form validates.
    cx.settle_enabled("dialog.create", Tier::Dialog).await?;
    let create = cx.resolve_required("dialog.create").await?;
    create.elements[0].click().await?;

    cx.settle_present("editor.container", Tier::AppWork).await?;
    info!(title = %title, "assembly created, editor open");
    cx.checkpoint("editor-open").await;
    Ok(title)
}
