//! Conversion between monitor-relative and virtual-screen coordinates.

use crate::{MonitorPoint, MonitorRegion, RangeError, VirtualPoint};

/// A virtual point resolved to the monitor that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub index: usize,
    pub region: MonitorRegion,
    /// Offset from the region's top-left corner.
    pub x: i32,
    pub y: i32,
}

/// Translate a monitor-relative point into virtual-screen space.
///
/// Fractional coordinates are truncated.
pub fn to_virtual(regions: &[MonitorRegion], point: MonitorPoint) -> Result<VirtualPoint, RangeError> {
    let region = regions.get(point.monitor).ok_or(RangeError::Monitor {
        index: point.monitor,
        available: regions.len(),
    })?;

    if !(0.0..f64::from(region.width())).contains(&point.x) {
        return Err(RangeError::X {
            monitor: point.monitor,
            value: point.x,
            width: region.width(),
        });
    }
    if !(0.0..f64::from(region.height())).contains(&point.y) {
        return Err(RangeError::Y {
            monitor: point.monitor,
            value: point.y,
            height: region.height(),
        });
    }

    Ok(VirtualPoint {
        x: region.left + point.x as i32,
        y: region.top + point.y as i32,
    })
}

/// Find the monitor containing a virtual point.
///
/// Returns `None` for points in the void between or around monitors.
/// When regions overlap the first one in enumeration order wins.
pub fn to_relative(regions: &[MonitorRegion], point: VirtualPoint) -> Option<Located> {
    regions
        .iter()
        .enumerate()
        .find(|(_, region)| region.contains(point))
        .map(|(index, region)| Located {
            index,
            region: *region,
            x: point.x - region.left,
            y: point.y - region.top,
        })
}
