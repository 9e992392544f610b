//! Error types for the orchestration engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("application failed to launch: {0}")]
    Launch(String),

    #[error("automation driver not available: {0}")]
    DriverNotFound(String),

    #[error("driver error: {0}")]
    Driver(String),

    #[error("no element matched any query of strategy '{strategy}'")]
    MissingElement { strategy: String },

    #[error("unknown locator strategy: {0}")]
    UnknownStrategy(String),

    #[error("timed out after {waited_ms} ms waiting for {what}")]
    SettleTimeout { what: String, waited_ms: u64 },

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("test-control bridge error: {0}")]
    Control(String),

    #[error("test-control protocol version {got} (harness requires {want})")]
    ProtocolVersion { got: u32, want: u32 },

    #[error("unknown step: {0}")]
    UnknownStep(String),

    #[error("step graph error: {0}")]
    Graph(String),

    #[error("no live session in scenario context")]
    NoSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
