//! DPI awareness.
//!
//! On Windows the process opts into Per-Monitor V2 awareness so monitor
//! bounds, cursor reads and injected moves all use physical pixels.
//! Other platforms report consistent coordinates already.

#[cfg(windows)]
mod windows_dpi {
    use std::sync::Once;
    use tracing::{info, warn};

    static INIT: Once = Once::new();

    /// Set the process DPI awareness to Per-Monitor V2.
    ///
    /// Must run before display enumeration.
    pub fn set_dpi_aware() {
        INIT.call_once(|| unsafe {
            const DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2: isize = -4;

            #[link(name = "user32")]
            extern "system" {
                fn SetProcessDpiAwarenessContext(value: isize) -> i32;
            }

            if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) != 0 {
                info!("Set Per-Monitor V2 DPI awareness");
            } else {
                warn!("Failed to set Per-Monitor V2 DPI awareness, monitor bounds may be scaled");
            }
        });
    }
}

#[cfg(windows)]
pub use windows_dpi::set_dpi_aware;

/// Set DPI awareness (no-op off Windows).
#[cfg(not(windows))]
pub fn set_dpi_aware() {}
