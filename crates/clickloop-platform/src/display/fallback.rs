//! Single-display enumeration for platforms without a native backend.
//!
//! Only the main display is visible through `enigo`; extra monitors are not reported.

use clickloop_core::{DisplayDevice, MonitorRegion};
use enigo::{Enigo, Mouse, Settings};

fn main_display() -> Result<(i32, i32), String> {
    let enigo = Enigo::new(&Settings::default()).map_err(|e| e.to_string())?;
    enigo.main_display().map_err(|e| e.to_string())
}

pub fn monitors() -> Result<Vec<MonitorRegion>, String> {
    let (width, height) = main_display()?;
    Ok(vec![MonitorRegion::new(0, 0, width, height, true)])
}

pub fn active_devices() -> Result<Vec<DisplayDevice>, String> {
    let (width, height) = main_display()?;
    Ok(vec![DisplayDevice {
        name: "main".into(),
        width,
        height,
    }])
}

pub fn virtual_origin() -> (i32, i32) {
    (0, 0)
}
