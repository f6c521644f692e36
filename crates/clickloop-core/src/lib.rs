//! clickloop-core: display topology, coordinate mapping and click scheduling.
//!
//! Design goal: keep this crate platform-agnostic.
//! Display enumeration, pointer injection and key polling live in
//! `clickloop-platform` behind the traits defined here.

mod clicker;
mod config;
mod error;
mod interrupt;
mod mapper;
mod sampler;
mod scheduler;
mod session;
mod topology;

pub use clicker::{click_at, ButtonPhase, PointerDriver};
pub use config::{
    persist, ConfigDocument, Overrides, TargetConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOOPS,
    DEFAULT_WAIT_BETWEEN_CLICKS, DEFAULT_WAIT_BETWEEN_LOOPS,
};
pub use error::{Error, RangeError, Result};
pub use interrupt::InterruptFlag;
pub use mapper::{to_relative, to_virtual, Located};
pub use sampler::{
    CaptureSampler, InputProbe, InputState, Sample, SamplerConfig, SamplerEvent, SamplerState,
    Signal, SignalSet,
};
pub use scheduler::{LoopScheduler, Pacer, RunSummary, SlicedSleep};
pub use session::{finish, CaptureSession, CapturedPoint, Destination, FinishOutcome};
pub use topology::{enumerate, DisplayDevice, DisplaySource, Topology};

use std::fmt;

/// An axis-aligned display rectangle in virtual-screen space.
///
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorRegion {
    /// Platform handle, when the enumeration produced one.
    pub handle: Option<usize>,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub is_primary: bool,
    /// Bounds were estimated by the fallback layout, not reported by the OS.
    pub approximate: bool,
}

impl MonitorRegion {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32, is_primary: bool) -> Self {
        Self {
            handle: None,
            left,
            top,
            right,
            bottom,
            is_primary,
            approximate: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// A region with no area signals an inconsistent platform report.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, point: VirtualPoint) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }
}

impl fmt::Display for MonitorRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width(),
            self.height(),
            self.left,
            self.top
        )?;
        if self.is_primary {
            write!(f, " (PRIMARY)")?;
        }
        if self.approximate {
            write!(f, " (estimated)")?;
        }
        Ok(())
    }
}

/// A point in the virtual screen shared by all monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualPoint {
    pub x: i32,
    pub y: i32,
}

impl VirtualPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for VirtualPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point relative to the top-left corner of one monitor.
///
/// Only meaningful against the topology snapshot it was resolved with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorPoint {
    pub monitor: usize,
    pub x: f64,
    pub y: f64,
}

impl MonitorPoint {
    pub fn new(monitor: usize, x: f64, y: f64) -> Self {
        Self { monitor, x, y }
    }
}

impl fmt::Display for MonitorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monitor {} at ({}, {})", self.monitor, self.x, self.y)
    }
}
