//! Click executor: move, press, release.

use crate::{Error, Result, VirtualPoint};
use std::fmt;
use tracing::debug;

/// Which half of a click a button event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    Press,
    Release,
}

impl fmt::Display for ButtonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press => f.write_str("press"),
            Self::Release => f.write_str("release"),
        }
    }
}

/// Synthetic pointer control (implemented by clickloop-platform).
pub trait PointerDriver {
    /// Place the pointer at absolute virtual-screen coordinates.
    fn move_to(&mut self, x: i32, y: i32) -> std::result::Result<(), String>;

    /// Emit one primary-button event.
    fn button(&mut self, phase: ButtonPhase) -> std::result::Result<(), String>;
}

/// Perform one primary-button click at a virtual point.
///
/// The move, press and release steps run in order and the first failure
/// aborts the click. A release failure after a successful press leaves the
/// button held; the error carries the phase so callers can tell the cases apart.
pub fn click_at<D: PointerDriver + ?Sized>(driver: &mut D, point: VirtualPoint) -> Result<()> {
    debug!(x = point.x, y = point.y, "clicking");

    driver
        .move_to(point.x, point.y)
        .map_err(|reason| Error::PointerMove {
            x: point.x,
            y: point.y,
            reason,
        })?;

    for phase in [ButtonPhase::Press, ButtonPhase::Release] {
        driver
            .button(phase)
            .map_err(|reason| Error::PointerButton { phase, reason })?;
    }

    Ok(())
}
