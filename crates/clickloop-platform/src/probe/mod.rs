//! Live pointer and capture-signal polling.
//!
//! Platform implementations:
//! - Windows: `GetAsyncKeyState` / `GetCursorPos` (`windows.rs`)
//! - Other: an `rdev` listener thread folded into held-key state (`rdev_impl.rs`)

use crate::PlatformResult;
use clickloop_core::{InputProbe, InputState};

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod rdev_impl;

#[cfg(windows)]
use windows as imp;

#[cfg(not(windows))]
use rdev_impl as imp;

/// Reads the real pointer position and capture keys.
pub struct SystemProbe {
    inner: imp::Probe,
}

impl SystemProbe {
    pub fn new() -> PlatformResult<Self> {
        Ok(Self {
            inner: imp::Probe::new()?,
        })
    }
}

impl InputProbe for SystemProbe {
    fn poll(&mut self) -> Result<InputState, String> {
        self.inner.poll()
    }
}
