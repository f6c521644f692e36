//! Error taxonomy shared by every clickloop component.

use crate::ButtonPhase;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid JSON in configuration file {}: {source}", .path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {field} {reason}")]
    Validation { field: String, reason: String },
    #[error("monitor enumeration failed: {0}")]
    Enumeration(String),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("failed to move pointer to ({x}, {y}): {reason}")]
    PointerMove { x: i32, y: i32, reason: String },
    #[error("mouse {phase} event failed: {reason}")]
    PointerButton { phase: ButtonPhase, reason: String },
    #[error("failed to save coordinates to {}: {reason}", .path.display())]
    Persist { path: PathBuf, reason: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("interrupted by user")]
    Interrupted,
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Operator-initiated stop rather than a failure.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// A monitor-relative point does not fit the addressed topology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("monitor index {index} out of range ({})", describe_available(.available))]
    Monitor { index: usize, available: usize },
    #[error("x coordinate {value} out of range for monitor {monitor} (valid: 0 to {} inclusive)", .width - 1)]
    X { monitor: usize, value: f64, width: i32 },
    #[error("y coordinate {value} out of range for monitor {monitor} (valid: 0 to {} inclusive)", .height - 1)]
    Y {
        monitor: usize,
        value: f64,
        height: i32,
    },
}

fn describe_available(available: &usize) -> String {
    match *available {
        0 => "no monitors available".to_string(),
        n => format!("available monitors: 0-{}", n - 1),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
