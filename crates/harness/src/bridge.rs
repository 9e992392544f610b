//! Typed test-control bridge
//!
//! The application exposes a test-control endpoint only when launched with
//! the test-mode environment marker. The contract is a versioned message
//! protocol rather than an ambient mutable global: the harness serializes a
//! [`ControlRequest`], the driver transports it (the Playwright driver via
//! in-page evaluation, the fake driver natively), and the application
//! answers with a [`ControlResponse`].

use serde::{Deserialize, Serialize};

use crate::driver::WindowHandle;
use crate::error::{Error, Result};

/// Version of the request/response protocol this harness speaks.
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Handshake; the application reports its protocol version.
    Hello { min_version: u32 },
    /// Dispatch a named menu/command action, e.g. "new-video-assembly".
    DispatchCommand { name: String },
    /// Clear the current video-assembly data.
    ClearAssemblyData,
    /// Set (or clear, with `None`) the current video-assembly file path.
    SetAssemblyPath { path: Option<String> },
    /// Force a recomputation of UI section visibility.
    RecomputeVisibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub version: u32,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Send one request and map protocol-level failures to errors.
pub async fn send(window: &dyn WindowHandle, request: &ControlRequest) -> Result<ControlResponse> {
    let response = window.control(request).await?;
    if response.version < PROTOCOL_VERSION {
        return Err(Error::ProtocolVersion {
            got: response.version,
            want: PROTOCOL_VERSION,
        });
    }
    if !response.ok {
        return Err(Error::Control(
            response
                .error
                .clone()
                .unwrap_or_else(|| "bridge rejected the request".to_string()),
        ));
    }
    Ok(response)
}

pub async fn handshake(window: &dyn WindowHandle) -> Result<()> {
    send(
        window,
        &ControlRequest::Hello {
            min_version: PROTOCOL_VERSION,
        },
    )
    .await?;
    Ok(())
}

/// Compensating reset for the launch/initial-view race: clear project
/// state, clear the current file path, then force a visibility recompute.
pub async fn reset_to_landing(window: &dyn WindowHandle) -> Result<()> {
    send(window, &ControlRequest::ClearAssemblyData).await?;
    send(window, &ControlRequest::SetAssemblyPath { path: None }).await?;
    send(window, &ControlRequest::RecomputeVisibility).await?;
    Ok(())
}
