//! Display enumeration.
//!
//! Platform implementations:
//! - Windows: `EnumDisplayMonitors`, with a display-device fallback (`windows.rs`)
//! - macOS: Core Graphics active displays (`macos.rs`)
//! - Other: the main display reported by `enigo` (`fallback.rs`)

use clickloop_core::{DisplayDevice, DisplaySource, MonitorRegion};

#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(not(any(windows, target_os = "macos")))]
mod fallback;

#[cfg(windows)]
use windows as imp;

#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(not(any(windows, target_os = "macos")))]
use fallback as imp;

/// The host's displays.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDisplays;

impl DisplaySource for SystemDisplays {
    fn monitors(&self) -> Result<Vec<MonitorRegion>, String> {
        imp::monitors()
    }

    fn active_devices(&self) -> Result<Vec<DisplayDevice>, String> {
        imp::active_devices()
    }

    fn virtual_origin(&self) -> (i32, i32) {
        imp::virtual_origin()
    }
}
