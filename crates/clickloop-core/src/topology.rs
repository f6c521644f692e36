//! Display topology: an immutable snapshot of the monitor layout for one run.

use crate::mapper::{self, Located};
use crate::{Error, MonitorPoint, MonitorRegion, RangeError, Result, VirtualPoint};
use tracing::{debug, info, warn};

/// An active display device and its current resolution.
///
/// Used by the fallback strategy when monitor bounds are unreliable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDevice {
    pub name: String,
    pub width: i32,
    pub height: i32,
}

/// Platform display enumeration (implemented by clickloop-platform).
pub trait DisplaySource {
    /// Monitors with OS-reported bounds, in report order.
    fn monitors(&self) -> std::result::Result<Vec<MonitorRegion>, String>;

    /// Active display devices, in report order.
    fn active_devices(&self) -> std::result::Result<Vec<DisplayDevice>, String>;

    /// Top-left corner of the virtual screen.
    fn virtual_origin(&self) -> (i32, i32);
}

/// The monitor layout for one run. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    regions: Vec<MonitorRegion>,
}

impl Topology {
    pub fn from_regions(regions: Vec<MonitorRegion>) -> Result<Self> {
        if regions.is_empty() {
            return Err(Error::Enumeration("no monitors detected".into()));
        }
        if regions.iter().filter(|r| r.is_primary).count() > 1 {
            warn!("more than one monitor reports itself as primary");
        }
        Ok(Self { regions })
    }

    pub fn regions(&self) -> &[MonitorRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn primary(&self) -> Option<(usize, &MonitorRegion)> {
        self.regions.iter().enumerate().find(|(_, r)| r.is_primary)
    }

    /// Whether positions came from the fallback estimate.
    pub fn is_estimated(&self) -> bool {
        self.regions.iter().any(|r| r.approximate)
    }

    pub fn to_virtual(&self, point: MonitorPoint) -> std::result::Result<VirtualPoint, RangeError> {
        mapper::to_virtual(&self.regions, point)
    }

    pub fn locate(&self, point: VirtualPoint) -> Option<Located> {
        mapper::to_relative(&self.regions, point)
    }

    pub fn log_summary(&self) {
        info!("Detected monitors:");
        for (index, region) in self.regions.iter().enumerate() {
            info!("  Monitor {}: {}", index, region);
        }
        if self.is_estimated() {
            warn!("monitor positions are estimated and may not match the real layout");
        }
    }
}

/// Enumerate monitors, falling back to a device-based estimate when the
/// reported bounds are degenerate.
pub fn enumerate(source: &dyn DisplaySource) -> Result<Topology> {
    let monitors = source.monitors().map_err(Error::Enumeration)?;
    if monitors.is_empty() {
        return Err(Error::Enumeration("no monitors detected".into()));
    }

    if monitors.iter().all(|m| !m.is_degenerate()) {
        debug!(count = monitors.len(), "enumerated monitors");
        return Topology::from_regions(monitors);
    }

    warn!(
        count = monitors.len(),
        "monitor enumeration returned degenerate bounds, estimating layout from display devices"
    );
    let devices = source.active_devices().map_err(Error::Enumeration)?;
    let regions = estimate_layout(&devices, source.virtual_origin());
    if regions.is_empty() {
        return Err(Error::Enumeration(
            "no active display devices found by fallback enumeration".into(),
        ));
    }
    Topology::from_regions(regions)
}

/// Lay devices out left-to-right in report order.
///
/// The first device is taken as primary at the origin; the rest are placed
/// from the virtual-screen origin. Real arrangements (stacked, offset,
/// mixed sizes) are not recoverable here.
fn estimate_layout(devices: &[DisplayDevice], origin: (i32, i32)) -> Vec<MonitorRegion> {
    let mut regions: Vec<MonitorRegion> = Vec::with_capacity(devices.len());

    for device in devices {
        if device.width <= 0 || device.height <= 0 {
            warn!(name = %device.name, "skipping display device without a resolution");
            continue;
        }

        let is_primary = regions.is_empty();
        let (left, top) = if is_primary {
            (0, 0)
        } else {
            (origin.0 + regions.len() as i32 * device.width, origin.1)
        };

        regions.push(MonitorRegion {
            handle: None,
            left,
            top,
            right: left + device.width,
            bottom: top + device.height,
            is_primary,
            approximate: true,
        });
    }

    regions
}
