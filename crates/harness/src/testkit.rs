//! Scripted in-memory automation driver
//!
//! Implements the driver traits over a small UI state machine (Hidden →
//! Welcome → CreateDialog → Editor) so orchestration behavior (chaining,
//! memoization, teardown, degradation) can be tested without a live
//! application. Counters record launches, closes, clicks, screenshots and
//! bridge traffic; failure injection covers launch refusal, screenshot
//! write failures and a hidden landing view.
//!
//! The fake UI tree is flat: CSS matching supports simple selectors (tag,
//! `.class`, `#id`, comma alternatives) plus the last segment of a
//! descendant selector.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::bridge::{ControlRequest, ControlResponse, PROTOCOL_VERSION};
use crate::driver::{AppDriver, AppHandle, ElementHandle, LaunchSpec, WindowHandle};
use crate::error::{Error, Result};
use crate::locator::Query;

/// Editor tabs the fake application exposes, as (name, label).
pub const FAKE_TABS: &[(&str, &str)] = &[
    ("timeline", "Timeline"),
    ("file", "File"),
    ("render", "Render"),
    ("overlay-images", "Overlay Images"),
    ("mixed-audio", "Mixed Audio"),
    ("output", "Output"),
    ("general", "General"),
    ("raw", "Raw"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPhase {
    Closed,
    /// Launched, but the landing view lost the launch/view-selection race.
    Hidden,
    Welcome,
    CreateDialog,
    Editor,
}

#[derive(Debug, Clone, Default)]
pub struct FakeStats {
    pub launches: usize,
    pub closes: usize,
    pub clicks: usize,
    pub screenshots: usize,
    pub screenshot_failures: usize,
    pub control_requests: Vec<ControlRequest>,
    pub keys: Vec<String>,
    pub last_env: HashMap<String, String>,
}

/// Observable application state, for test assertions.
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub phase: UiPhase,
    pub active_tab: Option<String>,
    pub template: Option<String>,
    pub title: Option<String>,
    pub icon_clicks: Vec<usize>,
    pub search_query: Option<String>,
    pub render_setting: Option<String>,
    pub open_dialog: bool,
    pub file_menu_open: bool,
}

struct World {
    phase: UiPhase,
    active_tab: Option<String>,
    template: Option<String>,
    title: Option<String>,
    icon_clicks: Vec<usize>,
    search_query: Option<String>,
    render_setting: Option<String>,
    open_dialog: bool,
    file_menu_open: bool,
    stats: FakeStats,
    // injection knobs
    icon_count: usize,
    start_hidden: bool,
    fail_screenshots: bool,
    fail_launch: bool,
    control_version: u32,
}

#[derive(Clone)]
pub struct FakeDriver {
    world: Arc<Mutex<World>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            world: Arc::new(Mutex::new(World {
                phase: UiPhase::Closed,
                active_tab: None,
                template: None,
                title: None,
                icon_clicks: Vec::new(),
                search_query: None,
                render_setting: None,
                open_dialog: false,
                file_menu_open: false,
                stats: FakeStats::default(),
                icon_count: 3,
                start_hidden: false,
                fail_screenshots: false,
                fail_launch: false,
                control_version: PROTOCOL_VERSION,
            })),
        }
    }

    pub fn with_icon_count(self, count: usize) -> Self {
        self.world.lock().unwrap().icon_count = count;
        self
    }

    /// Launch into the hidden landing-view state, forcing the
    /// compensating bridge reset.
    pub fn with_hidden_start(self) -> Self {
        self.world.lock().unwrap().start_hidden = true;
        self
    }

    pub fn with_screenshot_failures(self) -> Self {
        self.world.lock().unwrap().fail_screenshots = true;
        self
    }

    pub fn with_launch_failure(self) -> Self {
        self.world.lock().unwrap().fail_launch = true;
        self
    }

    pub fn with_control_version(self, version: u32) -> Self {
        self.world.lock().unwrap().control_version = version;
        self
    }

    pub fn stats(&self) -> FakeStats {
        self.world.lock().unwrap().stats.clone()
    }

    pub fn ui(&self) -> UiSnapshot {
        let world = self.world.lock().unwrap();
        UiSnapshot {
            phase: world.phase,
            active_tab: world.active_tab.clone(),
            template: world.template.clone(),
            title: world.title.clone(),
            icon_clicks: world.icon_clicks.clone(),
            search_query: world.search_query.clone(),
            render_setting: world.render_setting.clone(),
            open_dialog: world.open_dialog,
            file_menu_open: world.file_menu_open,
        }
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppDriver for FakeDriver {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn AppHandle>> {
        let mut world = self.world.lock().unwrap();
        if world.fail_launch {
            return Err(Error::Launch("scripted launch refusal".to_string()));
        }
        world.stats.launches += 1;
        world.stats.last_env = spec.env.clone();
        world.phase = if world.start_hidden {
            UiPhase::Hidden
        } else {
            UiPhase::Welcome
        };
        Ok(Box::new(FakeApp {
            world: self.world.clone(),
        }))
    }
}

struct FakeApp {
    world: Arc<Mutex<World>>,
}

#[async_trait]
impl AppHandle for FakeApp {
    async fn first_window(&self) -> Result<Box<dyn WindowHandle>> {
        Ok(Box::new(FakeWindow {
            world: self.world.clone(),
        }))
    }

    async fn close(&self) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        if world.phase == UiPhase::Closed {
            return Err(Error::Driver("application already closed".to_string()));
        }
        world.phase = UiPhase::Closed;
        world.stats.closes += 1;
        Ok(())
    }
}

struct FakeWindow {
    world: Arc<Mutex<World>>,
}

#[async_trait]
impl WindowHandle for FakeWindow {
    async fn wait_for_load(&self) -> Result<()> {
        Ok(())
    }

    async fn query_all(&self, query: &Query) -> Result<Vec<Box<dyn ElementHandle>>> {
        let world = self.world.lock().unwrap();
        Ok(elements_for(&world)
            .into_iter()
            .filter(|el| matches(query, el))
            .map(|el| {
                Box::new(FakeElement {
                    world: self.world.clone(),
                    spec: el,
                }) as Box<dyn ElementHandle>
            })
            .collect())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        if script == "boom" {
            return Err(Error::Driver("injected script failure".to_string()));
        }
        let world = self.world.lock().unwrap();
        if script.contains("display") {
            let display = if world.phase == UiPhase::Welcome {
                "block"
            } else {
                "none"
            };
            return Ok(Value::String(display.to_string()));
        }
        Ok(Value::Null)
    }

    async fn control(&self, request: &ControlRequest) -> Result<ControlResponse> {
        let mut world = self.world.lock().unwrap();
        world.stats.control_requests.push(request.clone());
        let version = world.control_version;
        match request {
            ControlRequest::Hello { .. } => {}
            ControlRequest::DispatchCommand { name } => match name.as_str() {
                "new-video-assembly" => world.phase = UiPhase::CreateDialog,
                "open-video-assembly" => world.open_dialog = true,
                other => {
                    return Ok(ControlResponse {
                        version,
                        ok: false,
                        error: Some(format!("unknown command: {other}")),
                    })
                }
            },
            ControlRequest::ClearAssemblyData => {
                world.template = None;
                world.title = None;
            }
            ControlRequest::SetAssemblyPath { .. } => {}
            ControlRequest::RecomputeVisibility => {
                if world.phase == UiPhase::Hidden {
                    world.phase = UiPhase::Welcome;
                }
            }
        }
        Ok(ControlResponse {
            version,
            ok: true,
            error: None,
        })
    }

    async fn press(&self, key: &str) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        world.stats.keys.push(key.to_string());
        if key == "Escape" {
            world.open_dialog = false;
            world.file_menu_open = false;
        }
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        if world.fail_screenshots {
            world.stats.screenshot_failures += 1;
            return Err(Error::Driver("screenshot refused".to_string()));
        }
        world.stats.screenshots += 1;
        std::fs::write(path, b"\x89PNG\r\n")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    None,
    OpenCreateDialog,
    OpenAssemblyDialog,
    SelectTemplate,
    FillTitle,
    CreateAssembly,
    Icon(usize),
    SelectTab(String),
    OpenFileMenu,
    SearchInput,
    RenderSetting,
}

#[derive(Debug, Clone)]
struct ElementSpec {
    tag: &'static str,
    text: String,
    role: Option<&'static str>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    enabled: bool,
    action: Action,
}

fn el(tag: &'static str, text: &str, classes: &[&str]) -> ElementSpec {
    ElementSpec {
        tag,
        text: text.to_string(),
        role: None,
        classes: classes.iter().map(|c| c.to_string()).collect(),
        attrs: Vec::new(),
        enabled: true,
        action: Action::None,
    }
}

impl ElementSpec {
    fn role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

fn elements_for(world: &World) -> Vec<ElementSpec> {
    let mut elements = Vec::new();
    match world.phase {
        UiPhase::Closed => {}
        UiPhase::Hidden => {
            elements.push(el("div", "", &["app-root"]));
        }
        UiPhase::Welcome => {
            elements.push(el("div", "", &["welcome-screen"]).attr("id", "welcome-screen"));
            elements.push(el("h1", "Welcome to Cutline", &["welcome-header"]));
            elements.push(
                el("button", "New Video Assembly", &["welcome-action"])
                    .action(Action::OpenCreateDialog),
            );
            elements.push(
                el("button", "Open Video Assembly", &["welcome-action"])
                    .action(Action::OpenAssemblyDialog),
            );
            if world.open_dialog {
                elements.push(el("div", "", &["file-open-dialog"]));
            }
        }
        UiPhase::CreateDialog => {
            elements.push(el("div", "", &["assembly-dialog"]));
            elements.push(
                el("select", "", &["template-select"])
                    .role("combobox")
                    .action(Action::SelectTemplate),
            );
            elements.push(
                el("input", "", &["assembly-title"])
                    .attr("type", "text")
                    .action(Action::FillTitle),
            );
            // The form validates once a title is present.
            elements.push(
                el("button", "Create & Save As", &["dialog-create"])
                    .enabled(world.title.is_some())
                    .action(Action::CreateAssembly),
            );
        }
        UiPhase::Editor => {
            elements.push(el("div", "", &["editor-container"]));
            elements.push(el("div", "", &["timeline-container"]));
            elements.push(el("div", "", &["left-icon-bar"]));
            for i in 0..world.icon_count {
                elements.push(
                    el("button", &format!("icon-{i}"), &["icon-bar-button"])
                        .action(Action::Icon(i)),
                );
            }
            elements.push(el("div", "", &["explorer-panel", "panel"]));
            elements.push(el("div", "", &["content-sources"]));
            elements.push(el("li", "clips/", &["content-source-entry"]));
            elements.push(el("li", "audio/", &["content-source-entry"]));
            elements.push(el("input", "", &["search-input"]).action(Action::SearchInput));
            if world.search_query.is_some() {
                elements.push(el("div", "3 results", &["search-results"]));
            }
            elements.push(
                el("div", "File", &["menu-file"])
                    .role("menuitem")
                    .action(Action::OpenFileMenu),
            );
            if world.file_menu_open {
                elements.push(el("div", "New Video Assembly", &["menu-item"]));
                elements.push(el("div", "Open Video Assembly", &["menu-item"]));
            }
            for (name, label) in FAKE_TABS {
                elements.push(
                    el("button", label, &["tab-button"])
                        .class(&format!("tab-button-{name}"))
                        .role("tab")
                        .action(Action::SelectTab(name.to_string())),
                );
            }
            if let Some(active) = &world.active_tab {
                elements.push(el("div", "", &["tab-panel"]).class(&format!("tab-panel-{active}")));
            }
            elements.push(el("div", "", &["render-bar"]));
            elements.push(el("button", "Render", &["render-start"]));
            elements.push(el("select", "", &["render-quality"]).role("combobox"));
            elements.push(el("div", "", &["render-engine"]));
            elements.push(
                el("select", "", &["render-settings"]).action(Action::RenderSetting),
            );
            elements.push(el("div", "", &["render-queue"]));
        }
    }
    elements
}

fn matches(query: &Query, element: &ElementSpec) -> bool {
    match query {
        Query::Text { tag, contains } => {
            let tag_ok = match tag.as_deref() {
                None | Some("*") => true,
                Some(tag) => tag == element.tag,
            };
            tag_ok && element.text.contains(contains)
        }
        Query::Role { role } => element.role == Some(role.as_str()),
        Query::Css { selector } => selector
            .split(',')
            .any(|alt| css_match(alt.trim(), element)),
        Query::Attr { name, value } => element.attrs.iter().any(|(n, v)| {
            n == name
                && match value {
                    Some(want) => want == v,
                    None => true,
                }
        }),
    }
}

fn css_match(selector: &str, element: &ElementSpec) -> bool {
    let simple = selector.split_whitespace().last().unwrap_or(selector);
    if simple.contains('[') {
        return false;
    }
    let mut parts: Vec<(char, &str)> = Vec::new();
    let mut start = 0;
    let mut marker = 'T';
    for (i, c) in simple.char_indices() {
        if c == '.' || c == '#' {
            parts.push((marker, &simple[start..i]));
            marker = c;
            start = i + 1;
        }
    }
    parts.push((marker, &simple[start..]));

    for (kind, value) in parts {
        if value.is_empty() {
            continue;
        }
        let ok = match kind {
            'T' => value == "*" || value == element.tag,
            '.' => element.classes.iter().any(|c| c == value),
            '#' => element
                .attrs
                .iter()
                .any(|(n, v)| n == "id" && v == value),
            _ => false,
        };
        if !ok {
            return false;
        }
    }
    true
}

struct FakeElement {
    world: Arc<Mutex<World>>,
    spec: ElementSpec,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn click(&self) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        world.stats.clicks += 1;
        match &self.spec.action {
            Action::OpenCreateDialog => world.phase = UiPhase::CreateDialog,
            Action::OpenAssemblyDialog => world.open_dialog = true,
            // Clicking the disabled create button does nothing, like the
            // real form.
            Action::CreateAssembly if world.title.is_some() => {
                world.phase = UiPhase::Editor;
                world.active_tab = Some("timeline".to_string());
            }
            Action::Icon(index) => world.icon_clicks.push(*index),
            Action::SelectTab(name) => world.active_tab = Some(name.clone()),
            Action::OpenFileMenu => world.file_menu_open = true,
            _ => {}
        }
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        match &self.spec.action {
            Action::FillTitle => world.title = Some(text.to_string()),
            Action::SearchInput => world.search_query = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    async fn select_option(&self, value: &str) -> Result<()> {
        let mut world = self.world.lock().unwrap();
        match &self.spec.action {
            Action::SelectTemplate => world.template = Some(value.to_string()),
            Action::RenderSetting => world.render_setting = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.spec.enabled)
    }

    async fn text(&self) -> Result<String> {
        Ok(self.spec.text.clone())
    }
}
