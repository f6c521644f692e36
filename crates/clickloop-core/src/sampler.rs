//! Interactive capture: polls pointer and key state, turns rising edges into
//! captured points.

use crate::mapper::Located;
use crate::{CaptureSession, CapturedPoint, Error, InterruptFlag, Result, Topology, VirtualPoint};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Trigger inputs the sampler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Space bar (capture).
    Space,
    /// Enter / Return (capture).
    Enter,
    /// Left mouse button (capture).
    PrimaryButton,
    /// Escape (finish).
    Escape,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Self::Space, Self::Enter, Self::PrimaryButton, Self::Escape];

    const fn bit(self) -> u8 {
        match self {
            Self::Space => 1 << 0,
            Self::Enter => 1 << 1,
            Self::PrimaryButton => 1 << 2,
            Self::Escape => 1 << 3,
        }
    }

    /// Whether this signal records a point.
    pub const fn is_capture(self) -> bool {
        !matches!(self, Self::Escape)
    }
}

/// A set of currently held signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSet(u8);

impl SignalSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, signal: Signal) {
        self.0 |= signal.bit();
    }

    pub fn remove(&mut self, signal: Signal) {
        self.0 &= !signal.bit();
    }

    pub fn with(mut self, signal: Signal) -> Self {
        self.insert(signal);
        self
    }

    pub const fn contains(self, signal: Signal) -> bool {
        self.0 & signal.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Any capture signal is held.
    pub fn capture_held(self) -> bool {
        Signal::ALL
            .iter()
            .any(|signal| signal.is_capture() && self.contains(*signal))
    }

    pub fn finish_held(self) -> bool {
        self.contains(Signal::Escape)
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        let mut set = Self::empty();
        for signal in iter {
            set.insert(signal);
        }
        set
    }
}

/// One reading of the live input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub pointer: VirtualPoint,
    pub held: SignalSet,
}

/// Live pointer and key polling (implemented by clickloop-platform).
pub trait InputProbe {
    fn poll(&mut self) -> std::result::Result<InputState, String>;
}

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Sleep between polls.
    pub poll_interval: Duration,
    /// Treat signals already held on the first poll as old, so a key still
    /// down from launching the command does not capture. Off by default.
    pub ignore_held_at_start: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            ignore_held_at_start: false,
        }
    }
}

/// State of the sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplerState {
    /// Waiting for the first poll to record held signals
    /// (only with [`SamplerConfig::ignore_held_at_start`]).
    #[default]
    Idle,
    /// Polling for captures.
    Sampling,
    /// Finish signal seen; the session is complete.
    Finishing,
    /// Interrupted; the session must not be persisted.
    Aborted,
}

/// Pointer position with the monitor it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub position: VirtualPoint,
    pub located: Option<Located>,
}

/// Events emitted by the sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplerEvent {
    /// A successful poll (for live status display).
    Tick { sample: Sample, captured: usize },
    /// A point was appended to the session. `index` is 1-based.
    Captured { index: usize, point: CapturedPoint },
    /// The finish signal was seen.
    Finished { captured: usize },
}

/// Polling state machine that builds a [`CaptureSession`].
pub struct CaptureSampler<'a> {
    topology: &'a Topology,
    config: SamplerConfig,
    state: SamplerState,
    session: CaptureSession,
    capture_was_held: bool,
    finish_was_held: bool,
    probe_failures: usize,
}

impl<'a> CaptureSampler<'a> {
    pub fn new(topology: &'a Topology, config: SamplerConfig) -> Self {
        Self {
            topology,
            config,
            state: if config.ignore_held_at_start {
                SamplerState::Idle
            } else {
                SamplerState::Sampling
            },
            session: CaptureSession::new(),
            capture_was_held: false,
            finish_was_held: false,
            probe_failures: 0,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Probe reads that have failed in a row.
    pub fn consecutive_probe_failures(&self) -> usize {
        self.probe_failures
    }

    /// Run one poll iteration.
    ///
    /// Nothing counts as held before the first poll, so a signal already
    /// down on it is an edge unless `ignore_held_at_start` is set.
    /// A capture edge is handled before a finish edge seen in the same poll.
    /// A failed probe read skips the iteration; only the first of a run of
    /// failures is logged as a warning.
    pub fn poll<P: InputProbe + ?Sized>(&mut self, probe: &mut P) -> Vec<SamplerEvent> {
        if matches!(self.state, SamplerState::Finishing | SamplerState::Aborted) {
            return Vec::new();
        }

        let input = match probe.poll() {
            Ok(input) => input,
            Err(reason) => {
                self.probe_failures += 1;
                if self.probe_failures == 1 {
                    warn!(%reason, "failed to read input state, skipping poll");
                } else {
                    debug!(%reason, failures = self.probe_failures, "input state still unreadable");
                }
                return Vec::new();
            }
        };
        if self.probe_failures > 0 {
            debug!(failures = self.probe_failures, "input state readable again");
            self.probe_failures = 0;
        }

        let capture_held = input.held.capture_held();
        let finish_held = input.held.finish_held();
        let priming = self.state == SamplerState::Idle;
        let capture_edge = capture_held && !self.capture_was_held && !priming;
        let finish_edge = finish_held && !self.finish_was_held && !priming;
        self.capture_was_held = capture_held;
        self.finish_was_held = finish_held;
        if priming {
            debug!("capture sampling started");
            self.state = SamplerState::Sampling;
        }

        let sample = Sample {
            position: input.pointer,
            located: self.topology.locate(input.pointer),
        };
        let mut events = vec![SamplerEvent::Tick {
            sample,
            captured: self.session.len(),
        }];

        if capture_edge {
            let point = self.capture(sample);
            let index = self.session.push(point);
            debug!("Captured coordinate {}: {}", index, point);
            events.push(SamplerEvent::Captured { index, point });
        }

        if finish_edge {
            debug!(captured = self.session.len(), "Capture finished");
            self.state = SamplerState::Finishing;
            events.push(SamplerEvent::Finished {
                captured: self.session.len(),
            });
        }

        events
    }

    /// Poll until the finish signal, sleeping between polls.
    ///
    /// Returns the captured session. If `interrupt` is raised the sampler
    /// moves to [`SamplerState::Aborted`] and returns [`Error::Interrupted`].
    pub fn run<P, F>(
        &mut self,
        probe: &mut P,
        interrupt: &InterruptFlag,
        mut on_event: F,
    ) -> Result<CaptureSession>
    where
        P: InputProbe + ?Sized,
        F: FnMut(&SamplerEvent),
    {
        loop {
            if interrupt.is_raised() {
                warn!(
                    discarded = self.session.len(),
                    "capture interrupted, nothing will be saved"
                );
                self.state = SamplerState::Aborted;
                return Err(Error::Interrupted);
            }

            for event in self.poll(probe) {
                on_event(&event);
            }

            if self.state == SamplerState::Finishing {
                return Ok(std::mem::take(&mut self.session));
            }

            thread::sleep(self.config.poll_interval);
        }
    }

    fn capture(&self, sample: Sample) -> CapturedPoint {
        match sample.located {
            Some(located) => CapturedPoint {
                monitor: located.index,
                x: located.x,
                y: located.y,
                virtual_point: sample.position,
                outside: false,
            },
            None => {
                warn!(
                    "Pointer at {} is outside all monitors, recording it against monitor 0",
                    sample.position
                );
                CapturedPoint {
                    monitor: 0,
                    x: sample.position.x,
                    y: sample.position.y,
                    virtual_point: sample.position,
                    outside: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonitorRegion;
    use std::collections::VecDeque;

    /// Replays a fixed script of readings, then reports Escape forever.
    struct ScriptedProbe {
        script: VecDeque<std::result::Result<InputState, String>>,
        polls: usize,
    }

    impl ScriptedProbe {
        fn new(script: Vec<std::result::Result<InputState, String>>) -> Self {
            Self {
                script: script.into(),
                polls: 0,
            }
        }
    }

    impl InputProbe for ScriptedProbe {
        fn poll(&mut self) -> std::result::Result<InputState, String> {
            self.polls += 1;
            self.script
                .pop_front()
                .unwrap_or_else(|| Ok(at(0, 0, &[Signal::Escape])))
        }
    }

    fn at(x: i32, y: i32, held: &[Signal]) -> InputState {
        InputState {
            pointer: VirtualPoint::new(x, y),
            held: held.iter().copied().collect(),
        }
    }

    fn topology() -> Topology {
        Topology::from_regions(vec![
            MonitorRegion::new(0, 0, 1920, 1080, true),
            MonitorRegion::new(1920, 0, 3840, 1080, false),
        ])
        .unwrap()
    }

    fn drain(sampler: &mut CaptureSampler<'_>, probe: &mut ScriptedProbe, polls: usize) -> Vec<SamplerEvent> {
        (0..polls).flat_map(|_| sampler.poll(probe)).collect()
    }

    fn captures(events: &[SamplerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SamplerEvent::Captured { .. }))
            .count()
    }

    #[test]
    fn test_signal_set() {
        let set = SignalSet::empty().with(Signal::Enter);
        assert!(set.contains(Signal::Enter));
        assert!(!set.contains(Signal::Space));
        assert!(set.capture_held());
        assert!(!set.finish_held());

        let mut set = SignalSet::empty().with(Signal::Escape);
        assert!(!set.capture_held());
        assert!(set.finish_held());
        set.remove(Signal::Escape);
        assert!(set.is_empty());
    }

    #[test]
    fn test_held_signal_captures_once() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        assert_eq!(sampler.state(), SamplerState::Sampling);
        let mut probe =
            ScriptedProbe::new((0..5).map(|_| Ok(at(100, 100, &[Signal::Space]))).collect());

        let events = drain(&mut sampler, &mut probe, 5);
        assert_eq!(captures(&events), 1);
        assert!(matches!(events[1], SamplerEvent::Captured { index: 1, .. }));
        assert_eq!(sampler.session().len(), 1);
        assert_eq!(sampler.state(), SamplerState::Sampling);
    }

    #[test]
    fn test_release_and_press_captures_again() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(10, 20, &[Signal::PrimaryButton])),
            Ok(at(10, 20, &[])),
            Ok(at(2000, 30, &[Signal::Enter])),
        ]);

        drain(&mut sampler, &mut probe, 4);
        let points = sampler.session().points();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].monitor, points[0].x, points[0].y), (0, 10, 20));
        assert_eq!((points[1].monitor, points[1].x, points[1].y), (1, 80, 30));
        assert_eq!(points[1].virtual_point, VirtualPoint::new(2000, 30));
    }

    #[test]
    fn test_switching_capture_keys_while_held_is_not_an_edge() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(5, 5, &[Signal::Space])),
            Ok(at(5, 5, &[Signal::Space, Signal::Enter])),
            Ok(at(5, 5, &[Signal::Enter])),
        ]);

        drain(&mut sampler, &mut probe, 4);
        assert_eq!(sampler.session().len(), 1);
    }

    #[test]
    fn test_signal_held_on_first_poll_captures() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(5, 5, &[Signal::Enter])),
            Ok(at(5, 5, &[Signal::Enter])),
        ]);

        drain(&mut sampler, &mut probe, 2);
        assert_eq!(sampler.session().len(), 1);
    }

    #[test]
    fn test_signal_held_at_start_is_ignored_when_enabled() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(
            &topology,
            SamplerConfig {
                ignore_held_at_start: true,
                ..Default::default()
            },
        );
        assert_eq!(sampler.state(), SamplerState::Idle);
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(5, 5, &[Signal::Enter])),
            Ok(at(5, 5, &[Signal::Enter])),
            Ok(at(5, 5, &[])),
            Ok(at(5, 5, &[Signal::Enter])),
        ]);

        drain(&mut sampler, &mut probe, 2);
        assert!(sampler.session().is_empty());
        assert_eq!(sampler.state(), SamplerState::Sampling);
        drain(&mut sampler, &mut probe, 2);
        assert_eq!(sampler.session().len(), 1);
    }

    #[test]
    fn test_outside_capture_falls_back_to_monitor_zero() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(-40, 2000, &[Signal::Space])),
        ]);

        let events = drain(&mut sampler, &mut probe, 2);
        let point = sampler.session().points()[0];
        assert!(point.outside);
        assert_eq!((point.monitor, point.x, point.y), (0, -40, 2000));
        assert!(events.iter().any(|e| matches!(
            e,
            SamplerEvent::Tick {
                sample: Sample { located: None, .. },
                ..
            }
        )));
    }

    #[test]
    fn test_probe_failure_skips_iteration() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(1, 1, &[Signal::Space])),
            Err("GetCursorPos failed".into()),
            Ok(at(1, 1, &[Signal::Space])),
        ]);

        let events = drain(&mut sampler, &mut probe, 4);
        assert_eq!(captures(&events), 1);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_repeated_probe_failures_are_counted_and_reset() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut script: Vec<std::result::Result<InputState, String>> =
            (0..3).map(|_| Err("GetCursorPos failed".to_string())).collect();
        script.push(Ok(at(1, 1, &[Signal::Space])));
        let mut probe = ScriptedProbe::new(script);

        assert!(drain(&mut sampler, &mut probe, 3).is_empty());
        assert_eq!(sampler.consecutive_probe_failures(), 3);

        let events = sampler.poll(&mut probe);
        assert_eq!(captures(&events), 1);
        assert_eq!(sampler.consecutive_probe_failures(), 0);
    }

    #[test]
    fn test_capture_precedes_finish_in_same_poll() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(7, 8, &[Signal::Space, Signal::Escape])),
            Ok(at(9, 9, &[])),
            Ok(at(9, 9, &[Signal::Space])),
        ]);

        let events = drain(&mut sampler, &mut probe, 2);
        assert!(matches!(events[1], SamplerEvent::Tick { .. }));
        assert!(matches!(events[2], SamplerEvent::Captured { index: 1, .. }));
        assert_eq!(events[3], SamplerEvent::Finished { captured: 1 });
        assert_eq!(sampler.state(), SamplerState::Finishing);

        // Finished samplers ignore further input.
        assert!(sampler.poll(&mut probe).is_empty());
        assert_eq!(sampler.session().len(), 1);
    }

    #[test]
    fn test_run_returns_session_on_escape() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(
            &topology,
            SamplerConfig {
                poll_interval: Duration::from_millis(1),
                ..Default::default()
            },
        );
        let mut probe = ScriptedProbe::new(vec![
            Ok(at(0, 0, &[])),
            Ok(at(3, 4, &[Signal::Space])),
            Ok(at(3, 4, &[])),
        ]);

        let mut ticks = 0;
        let session = sampler
            .run(&mut probe, &InterruptFlag::new(), |event| {
                if matches!(event, SamplerEvent::Tick { .. }) {
                    ticks += 1;
                }
            })
            .unwrap();

        assert_eq!(session.len(), 1);
        assert_eq!(ticks, 4);
        assert_eq!(sampler.state(), SamplerState::Finishing);
    }

    #[test]
    fn test_run_interrupt_aborts() {
        let topology = topology();
        let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
        let mut probe = ScriptedProbe::new(vec![]);
        let interrupt = InterruptFlag::new();
        interrupt.raise();

        let err = sampler.run(&mut probe, &interrupt, |_| {}).unwrap_err();
        assert!(err.is_interrupted());
        assert_eq!(sampler.state(), SamplerState::Aborted);
        assert_eq!(probe.polls, 0);
    }
}
