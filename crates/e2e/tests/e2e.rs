//! E2E suite runner entry point
//!
//! This file is the test binary that drives the real application through
//! the Playwright sidecar. Run with:
//! cargo test --package cutline-e2e --test e2e -- --suite smoke

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cutline_e2e::{all_suites, build_graph, default_catalog, regression_suite, smoke_suite};
use cutline_harness::driver::playwright::PlaywrightDriver;
use cutline_harness::locator::Catalog;
use cutline_harness::{HarnessConfig, Result, Suite, SuiteRunner};

#[derive(Parser, Debug)]
#[command(name = "cutline-e2e")]
#[command(about = "End-to-end suite runner for the Cutline editor")]
struct Args {
    /// Suite to run: smoke, regression, or all
    #[arg(short, long, default_value = "all")]
    suite: String,

    /// Path to the application entry point
    #[arg(long, default_value = "dist/main.js", env = "CUTLINE_APP")]
    app: PathBuf,

    /// Node binary used for the automation sidecar
    #[arg(long, default_value = "node", env = "CUTLINE_NODE")]
    node: PathBuf,

    /// Locator overrides merged over the built-in catalog
    #[arg(long, env = "CUTLINE_LOCATORS")]
    locators: Option<PathBuf>,

    /// Output directory for reports and checkpoints
    #[arg(short, long, default_value = "tests-output")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("info".parse().expect("valid directive")),
        )
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> Result<bool> {
    let suites: Vec<Suite> = match args.suite.as_str() {
        "smoke" => vec![smoke_suite()],
        "regression" => vec![regression_suite()],
        _ => all_suites(),
    };

    let mut catalog = default_catalog();
    if let Some(path) = &args.locators {
        catalog.merge(Catalog::from_file(path)?);
    }

    let config = HarnessConfig {
        app_path: args.app,
        node_binary: args.node.clone(),
        output_dir: args.output,
        locators_file: args.locators,
        ..Default::default()
    };

    let driver = Arc::new(PlaywrightDriver::start(&args.node).await?);
    let graph = build_graph()?;
    let runner = SuiteRunner::new(driver, config, catalog);

    let mut all_passed = true;
    for suite in &suites {
        let result = runner.run(&graph, suite).await?;
        runner.write_report(&result)?;
        all_passed &= result.all_passed();
    }

    Ok(all_passed)
}
