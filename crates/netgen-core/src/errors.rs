//! Structured error types shared across networkgen crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`NetgenError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the networkgen generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NetgenError {
    /// Graph structural errors (unknown nodes, self loops, id collisions).
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Invalid generator parameters or configuration files.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Placement grid errors (saturation, out of bounds cells).
    #[error("grid error: {0}")]
    Grid(ErrorInfo),
    /// Layout computation errors.
    #[error("layout error: {0}")]
    Layout(ErrorInfo),
    /// Serialization and interchange format errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem and stream errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " | context: [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " | hint: {hint}"),
            None => Ok(()),
        }
    }
}

impl NetgenError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NetgenError::Graph(info)
            | NetgenError::Config(info)
            | NetgenError::Grid(info)
            | NetgenError::Layout(info)
            | NetgenError::Serde(info)
            | NetgenError::Io(info) => info,
        }
    }

    /// Returns the stable machine readable code of the error.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

impl From<std::io::Error> for NetgenError {
    fn from(err: std::io::Error) -> Self {
        NetgenError::Io(
            ErrorInfo::new("io", err.to_string()).with_context("kind", format!("{:?}", err.kind())),
        )
    }
}
