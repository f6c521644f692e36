//! `clickloop run`: replay the configured coordinates.

use anyhow::{Context, Result};
use clap::Args;
use clickloop_core::{
    enumerate, ConfigDocument, InterruptFlag, LoopScheduler, Overrides, PointerDriver,
    SlicedSleep, DEFAULT_CONFIG_PATH,
};
use clickloop_platform::{EnigoPointer, NoopPointer, SystemDisplays};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Number of passes (overrides the file)
    #[arg(short, long, allow_negative_numbers = true)]
    pub loops: Option<i64>,

    /// Seconds between clicks (overrides the file)
    #[arg(long = "wait-clicks", allow_negative_numbers = true)]
    pub wait_between_clicks: Option<f64>,

    /// Seconds between passes (overrides the file)
    #[arg(long = "wait-loops", allow_negative_numbers = true)]
    pub wait_between_loops: Option<f64>,

    /// Resolve and schedule everything without moving the pointer
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            loops: self.loops,
            wait_between_clicks: self.wait_between_clicks,
            wait_between_loops: self.wait_between_loops,
        }
    }
}

pub fn execute(args: RunArgs, interrupt: InterruptFlag) -> Result<()> {
    let mut document = ConfigDocument::load_or_default(&args.config)?;
    document.apply(&args.overrides());
    let config = document.validate()?;

    let topology = enumerate(&SystemDisplays)?;
    topology.log_summary();

    let mut driver: Box<dyn PointerDriver> = if args.dry_run {
        info!("Dry run: no clicks will be sent");
        Box::new(NoopPointer::default())
    } else {
        Box::new(EnigoPointer::new().context("cannot control the pointer")?)
    };

    let summary = LoopScheduler::new(driver.as_mut(), SlicedSleep::default(), interrupt)
        .run(&config, &topology)?;

    info!(
        "Done: {} click(s) over {} loop(s)",
        summary.clicks, summary.passes
    );
    Ok(())
}
