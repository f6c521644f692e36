//! Capture session: points collected by the sampler and their finalization.

use crate::{persist, Result, VirtualPoint};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// One captured pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPoint {
    pub monitor: usize,
    pub x: i32,
    pub y: i32,
    pub virtual_point: VirtualPoint,
    /// The pointer was outside every monitor; `monitor` is a placeholder and
    /// `x`/`y` are the raw virtual coordinates.
    pub outside: bool,
}

impl fmt::Display for CapturedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Monitor {} ({}, {}) [virtual: {}]",
            self.monitor, self.x, self.y, self.virtual_point
        )?;
        if self.outside {
            f.write_str(" (outside all monitors)")?;
        }
        Ok(())
    }
}

/// Ordered points captured during one `pick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSession {
    points: Vec<CapturedPoint>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: CapturedPoint) -> usize {
        self.points.push(point);
        self.points.len()
    }

    pub fn points(&self) -> &[CapturedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Where a finished session should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Path(PathBuf),
    Skip,
}

impl Destination {
    /// Interpret an answer to the "save to" prompt.
    ///
    /// `None` (end of input) and `n`/`N` skip; a blank answer takes `default`;
    /// anything else is used as the path.
    pub fn from_reply(reply: Option<&str>, default: &Path) -> Self {
        let Some(reply) = reply else {
            return Self::Skip;
        };
        match reply.trim() {
            "" => Self::Path(default.to_path_buf()),
            "n" | "N" => Self::Skip,
            path => Self::Path(PathBuf::from(path)),
        }
    }
}

/// How a capture session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    NothingCaptured,
    Skipped { count: usize },
    Saved { path: PathBuf, count: usize },
}

/// Finalize a session: ask `choose` where to save, then persist.
///
/// `choose` is only consulted when something was captured. Persistence
/// failures are returned to the caller.
pub fn finish<F>(session: &CaptureSession, choose: F, merge: bool) -> Result<FinishOutcome>
where
    F: FnOnce(&CaptureSession) -> Destination,
{
    if session.is_empty() {
        info!("No coordinates captured");
        return Ok(FinishOutcome::NothingCaptured);
    }

    let count = session.len();
    match choose(session) {
        Destination::Skip => {
            info!(count, "Capture not saved");
            Ok(FinishOutcome::Skipped { count })
        }
        Destination::Path(path) => {
            persist(session.points(), &path, merge)?;
            Ok(FinishOutcome::Saved { path, count })
        }
    }
}
