//! Checkpoint capture: best-effort labeled screenshots
//!
//! Checkpoints are diagnostic, not load-bearing: a failed write is logged
//! and swallowed, never surfaced to the scenario. Paths derive
//! deterministically from the label, with an index suffix when a label
//! repeats within a run (loop bodies), and are overwritten on rerun.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::driver::WindowHandle;

pub struct CheckpointRecorder {
    dir: PathBuf,
    counts: HashMap<String, u32>,
}

impl CheckpointRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counts: HashMap::new(),
        }
    }

    /// Deterministic path for the next capture of `label`.
    pub fn path_for(&mut self, label: &str) -> PathBuf {
        let count = self.counts.entry(label.to_string()).or_insert(0);
        let path = if *count == 0 {
            self.dir.join(format!("{label}.png"))
        } else {
            self.dir.join(format!("{label}-{count}.png"))
        };
        *count += 1;
        path
    }

    /// Capture a visual snapshot of the current UI state. Never fails the
    /// caller.
    pub async fn capture(&mut self, window: &dyn WindowHandle, label: &str) {
        let path = self.path_for(label);
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(label, error = %e, "checkpoint directory unavailable; skipping capture");
            return;
        }
        match window.screenshot(&path).await {
            Ok(()) => debug!(label, path = %path.display(), "checkpoint written"),
            Err(e) => warn!(label, error = %e, "checkpoint capture failed; continuing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_deterministic_and_suffixed_on_repeat() {
        let mut recorder = CheckpointRecorder::new("out");
        assert_eq!(recorder.path_for("welcome"), PathBuf::from("out/welcome.png"));
        assert_eq!(
            recorder.path_for("icon-click"),
            PathBuf::from("out/icon-click.png")
        );
        assert_eq!(
            recorder.path_for("icon-click"),
            PathBuf::from("out/icon-click-1.png")
        );
        assert_eq!(
            recorder.path_for("icon-click"),
            PathBuf::from("out/icon-click-2.png")
        );
    }
}
