//! rdev-based signal polling for macOS/Linux.
//!
//! `rdev::listen` runs on its own thread and forwards key and button
//! transitions over a channel; each poll folds them into the held set.
//! The pointer position is read through `enigo`.

use crate::{PlatformError, PlatformResult};
use clickloop_core::{InputState, Signal, SignalSet, VirtualPoint};
use crossbeam_channel::{unbounded, Receiver};
use enigo::{Enigo, Mouse, Settings};
use rdev::{listen, Button, Event, EventType, Key};
use std::thread;
use tracing::{debug, error};

/// A key or button changed state.
#[derive(Debug, Clone, Copy)]
struct Transition {
    signal: Signal,
    down: bool,
}

fn transition(event: &EventType) -> Option<Transition> {
    let (signal, down) = match event {
        EventType::KeyPress(key) => (key_signal(*key)?, true),
        EventType::KeyRelease(key) => (key_signal(*key)?, false),
        EventType::ButtonPress(Button::Left) => (Signal::PrimaryButton, true),
        EventType::ButtonRelease(Button::Left) => (Signal::PrimaryButton, false),
        _ => return None,
    };
    Some(Transition { signal, down })
}

fn key_signal(key: Key) -> Option<Signal> {
    match key {
        Key::Space => Some(Signal::Space),
        Key::Return | Key::KpReturn => Some(Signal::Enter),
        Key::Escape => Some(Signal::Escape),
        _ => None,
    }
}

/// Held-signal state built from transitions.
///
/// A press that is released again before the next poll is still reported
/// once, so quick taps are not lost between polls.
#[derive(Debug, Default)]
struct HeldState {
    held: SignalSet,
    pressed: SignalSet,
}

impl HeldState {
    fn apply(&mut self, transition: Transition) {
        if transition.down {
            self.held.insert(transition.signal);
            self.pressed.insert(transition.signal);
        } else {
            self.held.remove(transition.signal);
        }
    }

    fn take(&mut self) -> SignalSet {
        let mut snapshot = self.held;
        for signal in Signal::ALL {
            if self.pressed.contains(signal) {
                snapshot.insert(signal);
            }
        }
        self.pressed = SignalSet::empty();
        snapshot
    }
}

pub struct Probe {
    transitions: Receiver<Transition>,
    state: HeldState,
    enigo: Enigo,
}

impl Probe {
    pub fn new() -> PlatformResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| PlatformError::ListenerInit(format!("failed to create Enigo: {e}")))?;

        let (tx, rx) = unbounded::<Transition>();
        thread::Builder::new()
            .name("clickloop-input-listener".into())
            .spawn(move || {
                debug!("rdev::listen thread starting");
                let callback = move |event: Event| {
                    if let Some(t) = transition(&event.event_type) {
                        let _ = tx.send(t);
                    }
                };
                if let Err(error) = listen(callback) {
                    error!(?error, "rdev listen error");
                }
                debug!("rdev::listen thread exiting");
            })
            .map_err(|e| PlatformError::ListenerInit(e.to_string()))?;

        Ok(Self {
            transitions: rx,
            state: HeldState::default(),
            enigo,
        })
    }

    pub fn poll(&mut self) -> Result<InputState, String> {
        for t in self.transitions.try_iter() {
            self.state.apply(t);
        }

        let (x, y) = self.enigo.location().map_err(|e| e.to_string())?;
        Ok(InputState {
            pointer: VirtualPoint::new(x, y),
            held: self.state.take(),
        })
    }
}
