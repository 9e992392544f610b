//! Playwright-Electron automation driver
//!
//! Spawns a single long-lived `node` sidecar running an embedded
//! Playwright bridge script and speaks newline-delimited JSON over its
//! stdin/stdout: `{id, method, params}` in, `{id, ok, result|error}` out.
//! Handles (application, window, element) are opaque integers owned by the
//! sidecar. Requests are strictly sequential per scenario, so a single
//! request/reply channel is enough.

use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::bridge::{ControlRequest, ControlResponse};
use crate::driver::{AppDriver, AppHandle, ElementHandle, LaunchSpec, WindowHandle};
use crate::error::{Error, Result};
use crate::locator::Query;

const SIDECAR_JS: &str = r#"// Playwright-Electron automation sidecar.
// Protocol: newline-delimited JSON over stdio.
//   request:  {id, method, params}
//   response: {id, ok, result} | {id, ok: false, error}
const readline = require('readline');
const { _electron: electron } = require('playwright');

const apps = new Map();
const windows = new Map();
const elements = new Map();
let nextHandle = 1;

const methods = {
  async ping() {
    return { playwright: require('playwright/package.json').version };
  },
  async launch({ appPath, env }) {
    const app = await electron.launch({
      args: [appPath],
      env: { ...process.env, ...env },
    });
    const handle = nextHandle++;
    apps.set(handle, app);
    return { app: handle };
  },
  async firstWindow({ app }) {
    const window = await apps.get(app).firstWindow();
    const handle = nextHandle++;
    windows.set(handle, window);
    return { window: handle };
  },
  async waitForLoad({ window }) {
    await windows.get(window).waitForLoadState('domcontentloaded');
    return {};
  },
  async queryAll({ window, selector }) {
    const found = await windows.get(window).$$(selector);
    const handles = found.map((el) => {
      const handle = nextHandle++;
      elements.set(handle, el);
      return handle;
    });
    return { elements: handles };
  },
  async click({ element }) {
    await elements.get(element).click();
    return {};
  },
  async fill({ element, text }) {
    await elements.get(element).fill(text);
    return {};
  },
  async selectOption({ element, value }) {
    await elements.get(element).selectOption(value);
    return {};
  },
  async isEnabled({ element }) {
    return { enabled: await elements.get(element).isEnabled() };
  },
  async text({ element }) {
    return { text: (await elements.get(element).textContent()) || '' };
  },
  async evaluate({ window, script }) {
    return { value: await windows.get(window).evaluate(script) };
  },
  async press({ window, key }) {
    await windows.get(window).keyboard.press(key);
    return {};
  },
  async screenshot({ window, path }) {
    await windows.get(window).screenshot({ path });
    return {};
  },
  async closeApp({ app }) {
    await apps.get(app).close();
    apps.delete(app);
    return {};
  },
};

const rl = readline.createInterface({ input: process.stdin });
rl.on('line', async (line) => {
  let request;
  try {
    request = JSON.parse(line);
  } catch {
    return;
  }
  const { id, method, params } = request;
  try {
    const fn = methods[method];
    if (!fn) throw new Error('unknown method: ' + method);
    const result = await fn(params || {});
    process.stdout.write(JSON.stringify({ id, ok: true, result }) + '\n');
  } catch (error) {
    const message = error && error.message ? error.message : String(error);
    process.stdout.write(JSON.stringify({ id, ok: false, error: message }) + '\n');
  }
});
rl.on('close', () => process.exit(0));
"#;

/// Production automation driver backed by a Playwright sidecar process.
pub struct PlaywrightDriver {
    sidecar: Arc<Sidecar>,
}

impl PlaywrightDriver {
    /// Spawn the sidecar and verify Playwright is importable.
    pub async fn start(node_binary: &Path) -> Result<Self> {
        let sidecar = Sidecar::spawn(node_binary).await?;
        Ok(Self { sidecar })
    }
}

#[async_trait]
impl AppDriver for PlaywrightDriver {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn AppHandle>> {
        let result = self
            .sidecar
            .request(
                "launch",
                json!({ "appPath": spec.app_path, "env": spec.env }),
            )
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;
        let app = result["app"]
            .as_u64()
            .ok_or_else(|| Error::Launch("sidecar returned no application handle".to_string()))?;
        debug!(app, "application launched");
        Ok(Box::new(PlaywrightApp {
            sidecar: self.sidecar.clone(),
            app,
        }))
    }
}

struct PlaywrightApp {
    sidecar: Arc<Sidecar>,
    app: u64,
}

#[async_trait]
impl AppHandle for PlaywrightApp {
    async fn first_window(&self) -> Result<Box<dyn WindowHandle>> {
        let result = self
            .sidecar
            .request("firstWindow", json!({ "app": self.app }))
            .await
            .map_err(|e| Error::Launch(format!("no window from application: {e}")))?;
        let window = result["window"]
            .as_u64()
            .ok_or_else(|| Error::Launch("sidecar returned no window handle".to_string()))?;
        Ok(Box::new(PlaywrightWindow {
            sidecar: self.sidecar.clone(),
            window,
        }))
    }

    async fn close(&self) -> Result<()> {
        self.sidecar
            .request("closeApp", json!({ "app": self.app }))
            .await?;
        Ok(())
    }
}

struct PlaywrightWindow {
    sidecar: Arc<Sidecar>,
    window: u64,
}

#[async_trait]
impl WindowHandle for PlaywrightWindow {
    async fn wait_for_load(&self) -> Result<()> {
        self.sidecar
            .request("waitForLoad", json!({ "window": self.window }))
            .await?;
        Ok(())
    }

    async fn query_all(&self, query: &Query) -> Result<Vec<Box<dyn ElementHandle>>> {
        let selector = to_selector(query);
        let result = self
            .sidecar
            .request(
                "queryAll",
                json!({ "window": self.window, "selector": selector }),
            )
            .await?;
        let handles = result["elements"]
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_u64).collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(handles
            .into_iter()
            .map(|element| {
                Box::new(PlaywrightElement {
                    sidecar: self.sidecar.clone(),
                    element,
                }) as Box<dyn ElementHandle>
            })
            .collect())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .sidecar
            .request(
                "evaluate",
                json!({ "window": self.window, "script": script }),
            )
            .await?;
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }

    async fn control(&self, request: &ControlRequest) -> Result<ControlResponse> {
        let payload = serde_json::to_string(request)?;
        let script = format!("window.__cutlineTestControl({payload})");
        let value = self.evaluate(&script).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.sidecar
            .request("press", json!({ "window": self.window, "key": key }))
            .await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.sidecar
            .request(
                "screenshot",
                json!({ "window": self.window, "path": path.to_string_lossy() }),
            )
            .await?;
        Ok(())
    }
}

struct PlaywrightElement {
    sidecar: Arc<Sidecar>,
    element: u64,
}

impl PlaywrightElement {
    async fn simple(&self, method: &str, mut params: Value) -> Result<Value> {
        params["element"] = json!(self.element);
        self.sidecar.request(method, params).await
    }
}

#[async_trait]
impl ElementHandle for PlaywrightElement {
    async fn click(&self) -> Result<()> {
        self.simple("click", json!({})).await?;
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.simple("fill", json!({ "text": text })).await?;
        Ok(())
    }

    async fn select_option(&self, value: &str) -> Result<()> {
        self.simple("selectOption", json!({ "value": value })).await?;
        Ok(())
    }

    async fn is_enabled(&self) -> Result<bool> {
        let result = self.simple("isEnabled", json!({})).await?;
        Ok(result["enabled"].as_bool().unwrap_or(false))
    }

    async fn text(&self) -> Result<String> {
        let result = self.simple("text", json!({})).await?;
        Ok(result["text"].as_str().unwrap_or_default().to_string())
    }
}

/// Lower a declarative query to Playwright selector syntax.
pub(crate) fn to_selector(query: &Query) -> String {
    match query {
        Query::Text { tag, contains } => format!(
            "{}:has-text(\"{}\")",
            tag.as_deref().unwrap_or("*"),
            contains
        ),
        Query::Role { role } => format!("[role=\"{role}\"]"),
        Query::Css { selector } => selector.clone(),
        Query::Attr {
            name,
            value: Some(value),
        } => format!("[{name}=\"{value}\"]"),
        Query::Attr { name, value: None } => format!("[{name}]"),
    }
}

struct Sidecar {
    pid: Option<u32>,
    io: Mutex<SidecarIo>,
    next_id: AtomicU64,
    // Keeps the sidecar process and its script directory alive.
    _child: Child,
    _workdir: tempfile::TempDir,
}

struct SidecarIo {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

#[derive(Deserialize)]
struct SidecarReply {
    id: u64,
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl Sidecar {
    async fn spawn(node_binary: &Path) -> Result<Arc<Self>> {
        let workdir = tempfile::tempdir()?;
        let script_path = workdir.path().join("cutline-sidecar.js");
        std::fs::write(&script_path, SIDECAR_JS)?;

        let mut child = Command::new(node_binary)
            .arg(&script_path)
            .current_dir(workdir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::DriverNotFound(format!(
                    "failed to start {}: {e}",
                    node_binary.display()
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Driver("sidecar stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Driver("sidecar stdout unavailable".to_string()))?;

        let sidecar = Arc::new(Self {
            pid: child.id(),
            io: Mutex::new(SidecarIo {
                stdin,
                lines: BufReader::new(stdout).lines(),
            }),
            next_id: AtomicU64::new(1),
            _child: child,
            _workdir: workdir,
        });

        // Verify Playwright resolves before any test depends on it.
        sidecar.request("ping", json!({})).await.map_err(|e| {
            Error::DriverNotFound(format!(
                "playwright sidecar did not answer (install with: npm install playwright): {e}"
            ))
        })?;
        debug!("playwright sidecar ready");

        Ok(sidecar)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = serde_json::to_string(&json!({
            "id": id,
            "method": method,
            "params": params,
        }))?;

        let mut io = self.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.write_all(b"\n").await?;
        io.stdin.flush().await?;

        while let Some(line) = io.lines.next_line().await? {
            let reply: SidecarReply = match serde_json::from_str(&line) {
                Ok(reply) => reply,
                Err(_) => {
                    debug!(%line, "ignoring non-protocol sidecar output");
                    continue;
                }
            };
            if reply.id != id {
                warn!(got = reply.id, expected = id, "out-of-order sidecar reply");
                continue;
            }
            return if reply.ok {
                Ok(reply.result.unwrap_or(Value::Null))
            } else {
                Err(Error::Driver(
                    reply
                        .error
                        .unwrap_or_else(|| "sidecar reported an unnamed error".to_string()),
                ))
            };
        }
        Err(Error::Driver(
            "automation sidecar closed its output stream".to_string(),
        ))
    }
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        // Ask nicely first; kill_on_drop reaps anything still running.
        if let Some(pid) = self.pid {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_lowering() {
        assert_eq!(
            to_selector(&Query::text("button", "New Video Assembly")),
            "button:has-text(\"New Video Assembly\")"
        );
        assert_eq!(
            to_selector(&Query::Text {
                tag: None,
                contains: "Welcome".to_string()
            }),
            "*:has-text(\"Welcome\")"
        );
        assert_eq!(to_selector(&Query::role("combobox")), "[role=\"combobox\"]");
        assert_eq!(
            to_selector(&Query::css(".timeline-container")),
            ".timeline-container"
        );
        assert_eq!(to_selector(&Query::attr("type", "text")), "[type=\"text\"]");
        assert_eq!(
            to_selector(&Query::Attr {
                name: "data-testid".to_string(),
                value: None
            }),
            "[data-testid]"
        );
    }
}
