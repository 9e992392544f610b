//! End-to-end scenario behavior against the scripted driver: the create
//! flow, recovery from a hidden landing view, the icon bar walk, and the
//! protocol version gate.

use std::sync::Arc;

use cutline_e2e::modules::{create_dialog, icon_bar, welcome};
use cutline_e2e::{build_graph, default_catalog};
use cutline_harness::bridge::ControlRequest;
use cutline_harness::testkit::{FakeDriver, UiPhase};
use cutline_harness::{ensure_session, Error, HarnessConfig, Scenario, ScenarioCx};

fn config_in(dir: &tempfile::TempDir) -> HarnessConfig {
    HarnessConfig {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn create_flow_reaches_the_editor_with_a_generated_title() {
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

    scenario.ensure("create_dialog.open").await.unwrap();
    let title = create_dialog::create_assembly(&mut scenario.cx)
        .await
        .unwrap();

    assert!(title.starts_with("Test Video "));
    let ui = driver.ui();
    assert_eq!(ui.phase, UiPhase::Editor);
    assert_eq!(ui.title.as_deref(), Some(title.as_str()));
    assert_eq!(ui.template.as_deref(), Some("default"));
}

#[tokio::test(start_paused = true)]
async fn hidden_landing_view_recovers_through_a_control_reset() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new().with_hidden_start();
    let config = config_in(&out);
    let catalog = default_catalog();

    let session = ensure_session(&driver, &config, &catalog, None)
        .await
        .unwrap();

    assert_eq!(driver.ui().phase, UiPhase::Welcome);
    assert_eq!(driver.stats().launches, 1);
    let requests = driver.stats().control_requests;
    assert!(requests.contains(&ControlRequest::ClearAssemblyData));
    assert!(requests.contains(&ControlRequest::SetAssemblyPath { path: None }));
    assert!(requests.contains(&ControlRequest::RecomputeVisibility));

    let display = session
        .window()
        .evaluate("getComputedStyle(document.getElementById('welcome-screen')).display")
        .await
        .unwrap();
    assert_eq!(display, serde_json::json!("block"));
    session.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn icon_bar_walk_visits_every_icon_once_with_a_checkpoint_each() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new().with_icon_count(5);
    let graph = build_graph().unwrap();
    let config = config_in(&out);
    let checkpoint_dir = config.checkpoint_dir();
    let cx = ScenarioCx::new(Arc::new(driver.clone()), config, default_catalog(), None);
    let mut scenario = Scenario::new(&graph, cx);

    scenario.ensure("icon_bar.present").await.unwrap();
    let count = icon_bar::click_each_icon(&mut scenario.cx).await.unwrap();

    assert_eq!(count, 5);
    assert_eq!(driver.ui().icon_clicks, vec![0, 1, 2, 3, 4]);
    // Three checkpoints from the create flow plus one per icon.
    assert_eq!(driver.stats().screenshots, 8);
    assert!(checkpoint_dir.join("icon-click.png").exists());
    assert!(checkpoint_dir.join("icon-click-4.png").exists());
}

#[tokio::test(start_paused = true)]
async fn open_assembly_prompt_is_dismissed_before_the_session_continues() {
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

    scenario.ensure("welcome.visible").await.unwrap();
    welcome::click_open_assembly(&mut scenario.cx).await.unwrap();

    // The native picker must be gone, not left blocking the window.
    assert!(!driver.ui().open_dialog);
    assert_eq!(driver.stats().keys, vec!["Escape".to_string()]);

    // The rest of the chain still drives the same session.
    scenario.ensure("editor.open").await.unwrap();
    assert_eq!(driver.ui().phase, UiPhase::Editor);
}

#[tokio::test(start_paused = true)]
async fn outdated_bridge_protocol_is_rejected_during_recovery() {
    let out = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new().with_hidden_start().with_control_version(0);
    let config = config_in(&out);
    let catalog = default_catalog();

    let Err(err) = ensure_session(&driver, &config, &catalog, None).await else {
        panic!("expected the outdated bridge to be rejected");
    };
    assert!(matches!(err, Error::ProtocolVersion { got: 0, want: 1 }));
}
