//! Windows display enumeration using Win32.

use clickloop_core::{DisplayDevice, MonitorRegion};
use std::ffi::OsString;
use std::mem;
use std::os::windows::ffi::OsStringExt;
use std::ptr;
use tracing::debug;
use windows_sys::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
use windows_sys::Win32::Graphics::Gdi::{
    EnumDisplayDevicesW, EnumDisplayMonitors, EnumDisplaySettingsW, GetMonitorInfoW, DEVMODEW,
    DISPLAY_DEVICEW, HDC, HMONITOR, MONITORINFO,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

const MONITORINFOF_PRIMARY: u32 = 0x1;
const DISPLAY_DEVICE_ACTIVE: u32 = 0x1;
const ENUM_CURRENT_SETTINGS: u32 = u32::MAX;

pub fn monitors() -> Result<Vec<MonitorRegion>, String> {
    let mut regions: Vec<MonitorRegion> = Vec::new();

    let ok = unsafe {
        EnumDisplayMonitors(
            ptr::null_mut(),
            ptr::null(),
            Some(monitor_callback),
            &mut regions as *mut Vec<MonitorRegion> as LPARAM,
        )
    };
    if ok == 0 {
        return Err("EnumDisplayMonitors failed".into());
    }

    debug!(count = regions.len(), "EnumDisplayMonitors");
    Ok(regions)
}

unsafe extern "system" fn monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let regions = &mut *(lparam as *mut Vec<MonitorRegion>);

    let mut info: MONITORINFO = mem::zeroed();
    info.cbSize = mem::size_of::<MONITORINFO>() as u32;
    if GetMonitorInfoW(hmonitor, &mut info) == 0 {
        // Record it as degenerate so the fallback layout kicks in.
        regions.push(MonitorRegion {
            handle: Some(hmonitor as usize),
            ..MonitorRegion::new(0, 0, 0, 0, false)
        });
        return TRUE;
    }

    let rect = info.rcMonitor;
    regions.push(MonitorRegion {
        handle: Some(hmonitor as usize),
        ..MonitorRegion::new(
            rect.left,
            rect.top,
            rect.right,
            rect.bottom,
            info.dwFlags & MONITORINFOF_PRIMARY != 0,
        )
    });

    TRUE
}

pub fn active_devices() -> Result<Vec<DisplayDevice>, String> {
    let mut devices = Vec::new();

    for index in 0u32.. {
        let mut device: DISPLAY_DEVICEW = unsafe { mem::zeroed() };
        device.cb = mem::size_of::<DISPLAY_DEVICEW>() as u32;
        if unsafe { EnumDisplayDevicesW(ptr::null(), index, &mut device, 0) } == 0 {
            break;
        }
        if device.StateFlags & DISPLAY_DEVICE_ACTIVE == 0 {
            continue;
        }

        let mut mode: DEVMODEW = unsafe { mem::zeroed() };
        mode.dmSize = mem::size_of::<DEVMODEW>() as u16;
        let found = unsafe {
            EnumDisplaySettingsW(device.DeviceName.as_ptr(), ENUM_CURRENT_SETTINGS, &mut mode)
        };
        let name = wide_to_string(&device.DeviceName);
        if found == 0 {
            debug!(%name, "no current display settings");
            continue;
        }

        devices.push(DisplayDevice {
            name,
            width: mode.dmPelsWidth as i32,
            height: mode.dmPelsHeight as i32,
        });
    }

    debug!(count = devices.len(), "EnumDisplayDevicesW");
    Ok(devices)
}

pub fn virtual_origin() -> (i32, i32) {
    unsafe {
        (
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
        )
    }
}

fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    OsString::from_wide(&buf[..len])
        .to_string_lossy()
        .into_owned()
}
