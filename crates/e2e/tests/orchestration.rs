//! Step-graph orchestration against the scripted driver: chain
//! completeness, memoization across ensure calls, session reuse across
//! scenarios, and presence-step degradation.

use std::sync::Arc;

use futures::future::BoxFuture;

use cutline_e2e::{build_graph, default_catalog, regression_suite, smoke_suite};
use cutline_harness::locator::{Catalog, Query, Strategy};
use cutline_harness::testkit::{FakeDriver, UiPhase};
use cutline_harness::{
    HarnessConfig, Result, Scenario, ScenarioCx, ScenarioDef, Suite, SuiteKind, SuiteRunner,
};

fn config_in(dir: &tempfile::TempDir) -> HarnessConfig {
    HarnessConfig {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ensure_runs_the_whole_chain_from_cold_start() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let cx = ScenarioCx::new(
        Arc::new(driver.clone()),
        config_in(&out),
        default_catalog(),
        None,
    );
    let mut scenario = Scenario::new(&graph, cx);

    scenario.ensure("tab.timeline.selected").await.unwrap();

    assert_eq!(driver.stats().launches, 1);
    assert_eq!(driver.ui().phase, UiPhase::Editor);
    assert_eq!(driver.ui().active_tab.as_deref(), Some("timeline"));
    assert!(scenario.satisfied("session.ready"));
    assert!(scenario.satisfied("welcome.visible"));
    assert!(scenario.satisfied("create_dialog.open"));
    assert!(scenario.satisfied("editor.open"));
}

#[tokio::test(start_paused = true)]
async fn reensuring_a_satisfied_precondition_is_a_no_op() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let cx = ScenarioCx::new(
        Arc::new(driver.clone()),
        config_in(&out),
        default_catalog(),
        None,
    );
    let mut scenario = Scenario::new(&graph, cx);

    scenario.ensure("editor.open").await.unwrap();
    let clicks_after_first = driver.stats().clicks;

    scenario.ensure("editor.open").await.unwrap();
    scenario.ensure("welcome.visible").await.unwrap();

    assert_eq!(driver.stats().clicks, clicks_after_first);
    assert_eq!(driver.stats().launches, 1);
}

#[tokio::test(start_paused = true)]
async fn suite_shares_one_application_instance_across_scenarios() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let runner = SuiteRunner::new(
        Arc::new(driver.clone()),
        config_in(&out),
        default_catalog(),
    );

    let result = runner.run(&graph, &smoke_suite()).await.unwrap();

    assert!(result.all_passed(), "{:?}", result.scenarios);
    assert_eq!(result.total, 3);
    assert_eq!(driver.stats().launches, 1);
    assert_eq!(driver.stats().closes, 1);
}

#[tokio::test(start_paused = true)]
async fn presence_step_degrades_to_structural_check_and_records_it() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();

    // Point the icon bar at markup this build does not have; the step
    // should fall back to the editor container and flag the degradation.
    let mut catalog = default_catalog();
    let mut overlay = Catalog::default();
    overlay.insert(Strategy::new(
        "icon_bar.container",
        vec![Query::css(".icon-dock-v2")],
    ));
    catalog.merge(overlay);

    let cx = ScenarioCx::new(Arc::new(driver.clone()), config_in(&out), catalog, None);
    let mut scenario = Scenario::new(&graph, cx);

    scenario.ensure("icon_bar.present").await.unwrap();
    assert_eq!(scenario.cx.degraded(), ["icon_bar.container"]);
}

#[tokio::test(start_paused = true)]
async fn regression_suite_passes_against_the_scripted_driver() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let runner = SuiteRunner::new(
        Arc::new(driver.clone()),
        config_in(&out),
        default_catalog(),
    );

    let result = runner.run(&graph, &regression_suite()).await.unwrap();

    assert!(result.all_passed(), "{:?}", result.scenarios);
    assert_eq!(result.total, 5);
    assert_eq!(driver.stats().launches, 1);
    assert_eq!(driver.stats().closes, 1);
    let ui = driver.ui();
    assert_eq!(ui.render_setting.as_deref(), Some("high"));
    assert_eq!(ui.search_query.as_deref(), Some("clip"));
}

fn captures_shared_label<'a, 'g>(s: &'a mut Scenario<'g>) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        s.ensure("session.ready").await?;
        s.cx.checkpoint("shared-view").await;
        Ok(())
    })
}

#[tokio::test(start_paused = true)]
async fn checkpoint_labels_stay_unique_across_scenarios_of_one_run() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let config = config_in(&out);
    let checkpoint_dir = config.checkpoint_dir();
    let runner = SuiteRunner::new(Arc::new(driver), config, default_catalog());

    let suite = Suite {
        name: "shared-labels",
        kind: SuiteKind::Smoke,
        scenarios: vec![
            ScenarioDef {
                name: "first-capture",
                run: captures_shared_label,
            },
            ScenarioDef {
                name: "second-capture",
                run: captures_shared_label,
            },
        ],
    };
    let result = runner.run(&graph, &suite).await.unwrap();

    assert!(result.all_passed(), "{:?}", result.scenarios);
    // The second scenario's capture must not overwrite the first.
    assert!(checkpoint_dir.join("shared-view.png").exists());
    assert!(checkpoint_dir.join("shared-view-1.png").exists());
}

#[tokio::test(start_paused = true)]
async fn suite_report_is_written_as_json() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let graph = build_graph().unwrap();
    let runner = SuiteRunner::new(Arc::new(driver), config_in(&out), default_catalog());

    let result = runner.run(&graph, &smoke_suite()).await.unwrap();
    let path = runner.write_report(&result).unwrap();

    assert_eq!(path, out.path().join("smoke-report.json"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["suite"], "smoke");
    assert_eq!(json["kind"], "smoke");
    assert_eq!(json["total"], 3);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 3);
}
