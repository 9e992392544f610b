//! Locator catalog for the Cutline editor UI
//!
//! Every strategy the suites touch is named here, data not code. Query
//! order encodes preference: the first entry is the intended selector, the
//! later entries are the broader fallbacks the real DOM has historically
//! needed. Deployments with diverging markup override individual entries
//! from a YAML file merged over this catalog.

use cutline_harness::locator::{Catalog, Query, Strategy};

/// Editor tabs as (name, button label), in left-to-right order.
pub const TABS: &[(&str, &str)] = &[
    ("timeline", "Timeline"),
    ("file", "File"),
    ("render", "Render"),
    ("overlay-images", "Overlay Images"),
    ("mixed-audio", "Mixed Audio"),
    ("output", "Output"),
    ("general", "General"),
    ("raw", "Raw"),
];

pub fn default_catalog() -> Catalog {
    let mut catalog = Catalog::default();

    // Welcome screen
    catalog.insert(Strategy::new(
        "welcome.view",
        vec![Query::css("#welcome-screen"), Query::css(".welcome-screen")],
    ));
    catalog.insert(Strategy::new(
        "welcome.header",
        vec![
            Query::text("h1", "Welcome to Cutline"),
            Query::text("h1", "Welcome"),
        ],
    ));
    catalog.insert(Strategy::new(
        "welcome.new_assembly",
        vec![
            Query::text("button", "New Video Assembly"),
            Query::text("button", "New"),
        ],
    ));
    catalog.insert(Strategy::new(
        "welcome.open_assembly",
        vec![
            Query::text("button", "Open Video Assembly"),
            Query::text("button", "Open"),
        ],
    ));

    // New-assembly dialog
    catalog.insert(Strategy::new(
        "dialog.container",
        vec![Query::css(".assembly-dialog"), Query::css(".modal, .dialog")],
    ));
    catalog.insert(Strategy::new(
        "dialog.template",
        vec![
            Query::css(".template-select"),
            Query::role("combobox"),
            Query::css("select"),
        ],
    ));
    catalog.insert(Strategy::new(
        "dialog.title",
        vec![
            Query::css(".assembly-title"),
            Query::attr("type", "text"),
            Query::css("input"),
        ],
    ));
    catalog.insert(Strategy::new(
        "dialog.create",
        vec![
            Query::text("button", "Create & Save As"),
            Query::text("button", "Create"),
        ],
    ));

    // Editor shell
    catalog.insert(Strategy::new(
        "editor.container",
        vec![
            Query::css(".editor-container"),
            Query::css(".timeline-container"),
        ],
    ));
    catalog.insert(Strategy::new(
        "panel.any",
        vec![Query::css(".panel, .explorer-panel"), Query::role("region")],
    ));

    // Left icon bar
    catalog.insert(Strategy::new(
        "icon_bar.container",
        vec![
            Query::css(".left-icon-bar"),
            Query::css(".sidebar, .toolbar"),
        ],
    ));
    catalog.insert(Strategy::new(
        "icon_bar.icons",
        vec![
            Query::css(".icon-bar-button"),
            Query::css(".left-icon-bar button"),
        ],
    ));

    // Explorer
    catalog.insert(Strategy::new(
        "explorer.container",
        vec![Query::css(".explorer-panel"), Query::css(".explorer")],
    ));
    catalog.insert(Strategy::new(
        "explorer.sources",
        vec![Query::css(".content-sources"), Query::css(".sources-list")],
    ));
    catalog.insert(Strategy::new(
        "explorer.source_entries",
        vec![
            Query::css(".content-source-entry"),
            Query::css(".content-sources li"),
        ],
    ));
    catalog.insert(Strategy::new(
        "explorer.search_input",
        vec![
            Query::css(".search-input"),
            Query::css("input[type=\"search\"]"),
        ],
    ));
    catalog.insert(Strategy::new(
        "explorer.search_results",
        vec![Query::css(".search-results")],
    ));

    // File menu
    catalog.insert(Strategy::new(
        "menu.file",
        vec![Query::css(".menu-file"), Query::role("menuitem")],
    ));
    catalog.insert(Strategy::new(
        "menu.items",
        vec![Query::css(".menu-item")],
    ));

    // Tabs
    for (name, label) in TABS {
        catalog.insert(Strategy::new(
            &format!("tab.{name}.button"),
            vec![
                Query::css(&format!(".tab-button-{name}")),
                Query::text("button", label),
            ],
        ));
        catalog.insert(Strategy::new(
            &format!("tab.{name}.panel"),
            vec![Query::css(&format!(".tab-panel-{name}"))],
        ));
    }

    // Render bar
    catalog.insert(Strategy::new(
        "render_bar.container",
        vec![Query::css(".render-bar"), Query::css(".render-controls")],
    ));
    catalog.insert(Strategy::new(
        "render_bar.start",
        vec![Query::css(".render-start"), Query::text("button", "Render")],
    ));
    catalog.insert(Strategy::new(
        "render_bar.quality",
        vec![Query::css(".render-quality")],
    ));

    // Render engine integration
    catalog.insert(Strategy::new(
        "render_engine.panel",
        vec![
            Query::css(".render-engine"),
            Query::css(".render-engine-panel"),
        ],
    ));
    catalog.insert(Strategy::new(
        "render_engine.settings",
        vec![
            Query::css(".render-settings"),
            Query::css(".render-engine select"),
        ],
    ));
    catalog.insert(Strategy::new(
        "render_engine.queue",
        vec![Query::css(".render-queue")],
    ));
    catalog.insert(Strategy::new(
        "render_engine.queue_entries",
        vec![Query::css(".render-queue-entry")],
    ));

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_suite_strategy_is_present() {
        let catalog = default_catalog();
        for name in [
            "welcome.view",
            "welcome.new_assembly",
            "welcome.open_assembly",
            "dialog.template",
            "dialog.title",
            "dialog.create",
            "editor.container",
            "icon_bar.container",
            "icon_bar.icons",
            "explorer.sources",
            "explorer.source_entries",
            "explorer.search_input",
            "menu.file",
            "render_bar.start",
        ] {
            assert!(catalog.get(name).is_ok(), "missing strategy {name}");
        }
        for (tab, _) in TABS {
            assert!(catalog.get(&format!("tab.{tab}.button")).is_ok());
            assert!(catalog.get(&format!("tab.{tab}.panel")).is_ok());
        }
    }

    #[test]
    fn strategy_names_are_unique() {
        let catalog = default_catalog();
        let mut names: Vec<_> = catalog.strategies.iter().map(|s| s.name.clone()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn intended_selector_ranks_before_fallbacks() {
        let catalog = default_catalog();
        let icons = catalog.get("icon_bar.icons").unwrap();
        assert_eq!(icons.queries[0], Query::css(".icon-bar-button"));
        let header = catalog.get("welcome.header").unwrap();
        assert_eq!(header.queries[0], Query::text("h1", "Welcome to Cutline"));
    }
}
