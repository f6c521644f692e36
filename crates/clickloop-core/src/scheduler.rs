//! Loop scheduler: replays resolved targets through the click executor.

use crate::{click_at, Error, InterruptFlag, PointerDriver, Result, TargetConfig, Topology, VirtualPoint};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Blocking waits between clicks and passes.
pub trait Pacer {
    /// Wait for `duration`. Returns false if the wait was cut short by an interrupt.
    fn pause(&mut self, duration: Duration, interrupt: &InterruptFlag) -> bool;
}

/// Sleeps on the current thread in short slices so an interrupt is noticed
/// without waiting out a long delay.
#[derive(Debug, Clone, Copy)]
pub struct SlicedSleep {
    pub slice: Duration,
}

impl Default for SlicedSleep {
    fn default() -> Self {
        Self {
            slice: Duration::from_millis(50),
        }
    }
}

/// Shortest slice actually slept; a zero slice would never make progress.
const MIN_SLICE: Duration = Duration::from_millis(1);

impl Pacer for SlicedSleep {
    fn pause(&mut self, duration: Duration, interrupt: &InterruptFlag) -> bool {
        let slice = self.slice.max(MIN_SLICE);
        let mut remaining = duration;
        while !remaining.is_zero() {
            if interrupt.is_raised() {
                return false;
            }
            let chunk = remaining.min(slice);
            thread::sleep(chunk);
            remaining -= chunk;
        }
        !interrupt.is_raised()
    }
}

/// Totals for a run that finished normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: u32,
    pub clicks: u64,
}

/// Drives repeated passes over the configured targets.
pub struct LoopScheduler<'a, D: ?Sized, P> {
    driver: &'a mut D,
    pacer: P,
    interrupt: InterruptFlag,
}

impl<'a, D, P> LoopScheduler<'a, D, P>
where
    D: PointerDriver + ?Sized,
    P: Pacer,
{
    pub fn new(driver: &'a mut D, pacer: P, interrupt: InterruptFlag) -> Self {
        Self {
            driver,
            pacer,
            interrupt,
        }
    }

    /// Run `config.loops` passes over `config.coordinates`.
    ///
    /// Every target is resolved before the first click, so a bad coordinate
    /// never leaves a run half done. The first click failure aborts the run.
    /// An interrupt stops before the next click and yields [`Error::Interrupted`].
    pub fn run(&mut self, config: &TargetConfig, topology: &Topology) -> Result<RunSummary> {
        if config.loops == 0 || config.coordinates.is_empty() {
            info!(
                loops = config.loops,
                coordinates = config.coordinates.len(),
                "Nothing to click"
            );
            return Ok(RunSummary::default());
        }

        let targets = config
            .coordinates
            .iter()
            .map(|point| topology.to_virtual(*point))
            .collect::<std::result::Result<Vec<VirtualPoint>, _>>()?;

        info!("Starting click loop: {} iterations", config.loops);
        info!("Coordinates to click: {}", targets.len());
        info!("Wait between clicks: {}s", config.wait_between_clicks);
        info!("Wait between loops: {}s", config.wait_between_loops);

        let click_interval = config.click_interval();
        let loop_interval = config.loop_interval();
        let mut summary = RunSummary::default();

        for pass in 1..=config.loops {
            info!("Loop {}/{}", pass, config.loops);

            for (index, target) in targets.iter().enumerate() {
                if self.interrupt.is_raised() {
                    return Err(Error::Interrupted);
                }

                let point = &config.coordinates[index];
                debug!(
                    "Clicking monitor {} at ({}, {}) [virtual: {}]",
                    point.monitor, point.x, point.y, target
                );
                click_at(&mut *self.driver, *target)?;
                summary.clicks += 1;

                if index + 1 < targets.len() {
                    self.wait(click_interval)?;
                }
            }

            summary.passes = pass;
            if pass < config.loops {
                debug!("Waiting {}s before next loop", config.wait_between_loops);
                self.wait(loop_interval)?;
            }
        }

        info!(
            passes = summary.passes,
            clicks = summary.clicks,
            "Click loop completed"
        );
        Ok(summary)
    }

    fn wait(&mut self, duration: Duration) -> Result<()> {
        if self.pacer.pause(duration, &self.interrupt) {
            Ok(())
        } else {
            Err(Error::Interrupted)
        }
    }
}
