//! macOS display enumeration using Core Graphics.

use clickloop_core::{DisplayDevice, MonitorRegion};
use core_graphics::display::CGDisplay;

pub fn monitors() -> Result<Vec<MonitorRegion>, String> {
    let ids = CGDisplay::active_displays()
        .map_err(|code| format!("CGGetActiveDisplayList failed with error {code}"))?;
    let main = CGDisplay::main().id;

    Ok(ids
        .into_iter()
        .map(|id| {
            let bounds = CGDisplay::new(id).bounds();
            let left = bounds.origin.x as i32;
            let top = bounds.origin.y as i32;
            MonitorRegion {
                handle: Some(id as usize),
                ..MonitorRegion::new(
                    left,
                    top,
                    left + bounds.size.width as i32,
                    top + bounds.size.height as i32,
                    id == main,
                )
            }
        })
        .collect())
}

pub fn active_devices() -> Result<Vec<DisplayDevice>, String> {
    let ids = CGDisplay::active_displays()
        .map_err(|code| format!("CGGetActiveDisplayList failed with error {code}"))?;

    Ok(ids
        .into_iter()
        .map(|id| {
            let display = CGDisplay::new(id);
            DisplayDevice {
                name: format!("display {id}"),
                width: display.pixels_wide() as i32,
                height: display.pixels_high() as i32,
            }
        })
        .collect())
}

/// Core Graphics places the main display at the origin.
pub fn virtual_origin() -> (i32, i32) {
    (0, 0)
}
