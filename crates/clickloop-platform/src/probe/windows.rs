//! Windows signal polling using Win32.

use crate::PlatformResult;
use clickloop_core::{InputState, Signal, SignalSet, VirtualPoint};
use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VK_ESCAPE, VK_LBUTTON, VK_RETURN, VK_SPACE,
};
use windows_sys::Win32::UI::WindowsAndMessaging::GetCursorPos;

const KEY_DOWN: u16 = 0x8000;

const KEYS: [(u16, Signal); 4] = [
    (VK_SPACE, Signal::Space),
    (VK_RETURN, Signal::Enter),
    (VK_LBUTTON, Signal::PrimaryButton),
    (VK_ESCAPE, Signal::Escape),
];

pub struct Probe;

impl Probe {
    pub fn new() -> PlatformResult<Self> {
        Ok(Self)
    }

    pub fn poll(&mut self) -> Result<InputState, String> {
        let mut point = POINT { x: 0, y: 0 };
        if unsafe { GetCursorPos(&mut point) } == 0 {
            return Err("GetCursorPos failed".into());
        }

        let held = KEYS
            .iter()
            .filter(|(vk, _)| unsafe { GetAsyncKeyState(i32::from(*vk)) } as u16 & KEY_DOWN != 0)
            .map(|(_, signal)| *signal)
            .collect::<SignalSet>();

        Ok(InputState {
            pointer: VirtualPoint::new(point.x, point.y),
            held,
        })
    }
}
