//! End-to-end flows through the public API with in-memory collaborators.

use clickloop_core::{
    enumerate, finish, ButtonPhase, CaptureSampler, ConfigDocument, Destination, DisplayDevice,
    DisplaySource, Error, FinishOutcome, InputProbe, InputState, InterruptFlag, LoopScheduler,
    MonitorRegion, Overrides, Pacer, PointerDriver, SamplerConfig, Signal, SignalSet,
    VirtualPoint,
};
use std::collections::VecDeque;
use std::fs;
use std::time::Duration;

struct TwoMonitors;

impl DisplaySource for TwoMonitors {
    fn monitors(&self) -> Result<Vec<MonitorRegion>, String> {
        Ok(vec![
            MonitorRegion::new(0, 0, 1920, 1080, true),
            MonitorRegion::new(1920, 0, 3840, 1080, false),
        ])
    }

    fn active_devices(&self) -> Result<Vec<DisplayDevice>, String> {
        Err("not needed".into())
    }

    fn virtual_origin(&self) -> (i32, i32) {
        (0, 0)
    }
}

#[derive(Default)]
struct RecordingDriver {
    clicks: Vec<(i32, i32)>,
    position: (i32, i32),
}

impl PointerDriver for RecordingDriver {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), String> {
        self.position = (x, y);
        Ok(())
    }

    fn button(&mut self, phase: ButtonPhase) -> Result<(), String> {
        if phase == ButtonPhase::Release {
            self.clicks.push(self.position);
        }
        Ok(())
    }
}

#[derive(Default)]
struct InstantPacer {
    total: Duration,
}

impl Pacer for &mut InstantPacer {
    fn pause(&mut self, duration: Duration, interrupt: &InterruptFlag) -> bool {
        self.total += duration;
        !interrupt.is_raised()
    }
}

struct ScriptedProbe(VecDeque<InputState>);

impl InputProbe for ScriptedProbe {
    fn poll(&mut self) -> Result<InputState, String> {
        self.0.pop_front().ok_or_else(|| "script exhausted".to_string())
    }
}

fn state(x: i32, y: i32, held: &[Signal]) -> InputState {
    InputState {
        pointer: VirtualPoint::new(x, y),
        held: held.iter().copied().collect::<SignalSet>(),
    }
}

#[test]
fn test_load_override_validate_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coordinates.json");
    fs::write(
        &path,
        r#"{
            "loops": 5,
            "wait_between_clicks": 0.5,
            "coordinates": [
                {"monitor": 0, "x": 100, "y": 200},
                {"monitor": 1, "x": 300.7, "y": 400}
            ]
        }"#,
    )
    .unwrap();

    let mut document = ConfigDocument::load(&path).unwrap();
    document.apply(&Overrides {
        loops: Some(2),
        ..Default::default()
    });
    let config = document.validate().unwrap();
    assert_eq!(config.loops, 2);
    assert_eq!(config.wait_between_loops, 2.0);

    let topology = enumerate(&TwoMonitors).unwrap();
    let mut driver = RecordingDriver::default();
    let mut pacer = InstantPacer::default();
    let summary = LoopScheduler::new(&mut driver, &mut pacer, InterruptFlag::new())
        .run(&config, &topology)
        .unwrap();

    assert_eq!(summary.clicks, 4);
    assert_eq!(
        driver.clicks,
        vec![(100, 200), (2220, 400), (100, 200), (2220, 400)]
    );
    // Two inter-click waits and one inter-loop wait.
    assert_eq!(pacer.total, Duration::from_secs(3));
}

#[test]
fn test_missing_file_fails_validation_not_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let document = ConfigDocument::load_or_default(&path).unwrap();
    let err = document.validate().unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "coordinates"));
}

#[test]
fn test_out_of_range_point_clicks_nothing() {
    let document = ConfigDocument::parse(
        r#"{"loops": 1, "coordinates": [{"monitor": 0, "x": 1, "y": 1}, {"monitor": 1, "x": 1920, "y": 0}]}"#,
    )
    .unwrap();
    let config = document.validate().unwrap();
    let topology = enumerate(&TwoMonitors).unwrap();

    let mut driver = RecordingDriver::default();
    let mut pacer = InstantPacer::default();
    let err = LoopScheduler::new(&mut driver, &mut pacer, InterruptFlag::new())
        .run(&config, &topology)
        .unwrap_err();

    assert!(matches!(err, Error::Range(_)));
    assert!(driver.clicks.is_empty());
}

#[test]
fn test_pick_persist_then_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("coordinates.json");
    let topology = enumerate(&TwoMonitors).unwrap();

    let mut probe = ScriptedProbe(VecDeque::from(vec![
        state(0, 0, &[]),
        state(150, 250, &[Signal::Space]),
        state(150, 250, &[Signal::Space]),
        state(150, 250, &[]),
        state(2500, 600, &[Signal::PrimaryButton]),
        state(2500, 600, &[]),
        state(2500, 600, &[Signal::Escape]),
    ]));
    let mut sampler = CaptureSampler::new(
        &topology,
        SamplerConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        },
    );
    let session = sampler
        .run(&mut probe, &InterruptFlag::new(), |_| {})
        .unwrap();
    assert_eq!(session.len(), 2);

    let outcome = finish(&session, |_| Destination::Path(path.clone()), true).unwrap();
    assert_eq!(
        outcome,
        FinishOutcome::Saved {
            path: path.clone(),
            count: 2
        }
    );

    // A second pick merges after the first.
    let mut probe = ScriptedProbe(VecDeque::from(vec![
        state(10, 10, &[Signal::Enter]),
        state(10, 10, &[Signal::Escape]),
    ]));
    let mut sampler = CaptureSampler::new(
        &topology,
        SamplerConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        },
    );
    let session = sampler
        .run(&mut probe, &InterruptFlag::new(), |_| {})
        .unwrap();
    finish(&session, |_| Destination::Path(path.clone()), true).unwrap();

    let config = ConfigDocument::load(&path).unwrap().validate().unwrap();
    assert_eq!(config.loops, 10);
    assert_eq!(config.coordinates.len(), 3);

    let mut driver = RecordingDriver::default();
    let mut pacer = InstantPacer::default();
    LoopScheduler::new(&mut driver, &mut pacer, InterruptFlag::new())
        .run(
            &clickloop_core::TargetConfig {
                loops: 1,
                ..config
            },
            &topology,
        )
        .unwrap();
    assert_eq!(driver.clicks, vec![(150, 250), (2500, 600), (10, 10)]);
}
