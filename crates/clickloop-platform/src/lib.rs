//! clickloop-platform: platform-specific I/O boundary for clickloop.
//!
//! This crate provides:
//! - Display enumeration (Win32 on Windows, Core Graphics on macOS, `enigo` elsewhere)
//! - Pointer injection via `enigo`
//! - Capture signal polling (`GetAsyncKeyState` on Windows, an `rdev` listener elsewhere)
//! - Per-monitor DPI awareness on Windows
//! - Discarding terminal input typed while capturing
//!
//! Each area implements one of the collaborator traits from `clickloop-core`.

mod console;
mod display;
mod dpi;
mod error;
mod pointer;
mod probe;

pub use display::SystemDisplays;
pub use console::discard_pending_input;
pub use dpi::set_dpi_aware;
pub use error::{PlatformError, PlatformResult};
pub use pointer::{EnigoPointer, NoopPointer};
pub use probe::SystemProbe;
