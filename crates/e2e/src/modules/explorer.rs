//! Explorer panel: content sources and search.

use cutline_harness::{Result, ScenarioCx, StepGraph, Tier};

pub fn register(graph: &mut StepGraph) -> Result<()> {
    graph.register("explorer.sources.present", &["editor.open"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("explorer.sources", "panel.any")
                .await?;
            Ok(())
        })
    })?;

    graph.register("explorer.search.present", &["editor.open"], |cx| {
        Box::pin(async move {
            cx.resolve_or_degrade("explorer.search_input", "panel.any")
                .await?;
            Ok(())
        })
    })?;

    Ok(())
}

/// Click the first content source entry and report how many are listed.
pub async fn navigate_sources(cx: &mut ScenarioCx) -> Result<usize> {
    let entries = cx.resolve_required("explorer.source_entries").await?;
    let count = entries.len();
    entries.elements[0].click().await?;
    cx.quiesce(Tier::Local).await;
    cx.checkpoint("source-selected").await;
    Ok(count)
}

/// Type into the search box and wait for the results list to render.
pub async fn search_for(cx: &mut ScenarioCx, query: &str) -> Result<()> {
    let input = cx.resolve_required("explorer.search_input").await?;
    input.elements[0].fill(query).await?;
    cx.settle_present("explorer.search_results", Tier::Local)
        .await?;
    cx.checkpoint("search-results").await;
    Ok(())
}
