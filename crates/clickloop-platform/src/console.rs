//! Terminal input housekeeping.
//!
//! Capture keys (Space, Enter) also reach the terminal, so by the time
//! `pick` prompts for a save path stdin may already hold stray input.

/// Drop any unread console input.
#[cfg(windows)]
pub fn discard_pending_input() {
    use windows_sys::Win32::System::Console::{
        FlushConsoleInputBuffer, GetStdHandle, STD_INPUT_HANDLE,
    };

    unsafe {
        let handle = GetStdHandle(STD_INPUT_HANDLE);
        if FlushConsoleInputBuffer(handle) == 0 {
            tracing::debug!("FlushConsoleInputBuffer failed (stdin is not a console)");
        }
    }
}

/// Drop any unread terminal input.
#[cfg(unix)]
pub fn discard_pending_input() {
    if unsafe { libc::tcflush(libc::STDIN_FILENO, libc::TCIFLUSH) } != 0 {
        tracing::debug!("tcflush failed (stdin is not a terminal)");
    }
}

#[cfg(not(any(windows, unix)))]
pub fn discard_pending_input() {}
