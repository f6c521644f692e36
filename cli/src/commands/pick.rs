//! `clickloop pick`: capture pointer positions and save them.

use anyhow::{Context, Result};
use clap::Args;
use clickloop_core::{
    enumerate, finish, CaptureSampler, Destination, Error, FinishOutcome,
    InterruptFlag, SamplerConfig, SamplerEvent, Topology, DEFAULT_CONFIG_PATH,
};
use clickloop_platform::{discard_pending_input, SystemDisplays, SystemProbe};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PickArgs {
    /// File to save into (prompts when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Replace the file's coordinates instead of appending to them
    #[arg(long)]
    pub overwrite: bool,
}

pub fn execute(args: PickArgs, interrupt: InterruptFlag) -> Result<()> {
    let topology = enumerate(&SystemDisplays)?;
    print_banner(&topology);

    let mut probe = SystemProbe::new().context("cannot read keyboard and mouse state")?;
    let mut sampler = CaptureSampler::new(&topology, SamplerConfig::default());
    let mut status = StatusLine::default();
    let captured = sampler.run(&mut probe, &interrupt, |event| status.update(event));
    status.clear();
    let session = captured?;

    if !session.is_empty() {
        println!();
        println!("Captured {} coordinate(s):", session.len());
        for (index, point) in session.points().iter().enumerate() {
            println!("  {}. {}", index + 1, point);
        }
        println!();
    }

    let outcome = finish(
        &session,
        |_| choose_destination(args.config.as_deref(), &interrupt),
        !args.overwrite,
    )?;
    if interrupt.is_raised() {
        return Err(Error::Interrupted.into());
    }

    match outcome {
        FinishOutcome::NothingCaptured => println!("No coordinates captured."),
        FinishOutcome::Skipped { count } => println!("Discarded {} coordinate(s).", count),
        FinishOutcome::Saved { path, count } => {
            println!("Saved {} coordinate(s) to {}", count, path.display())
        }
    }
    Ok(())
}

fn print_banner(topology: &Topology) {
    println!("=== Coordinate Picker ===");
    println!();
    println!("Detected monitors:");
    for (index, region) in topology.regions().iter().enumerate() {
        println!("  Monitor {}: {}", index, region);
    }
    println!();
    println!("Move the mouse to a target and press SPACE, ENTER or click to capture it.");
    println!("Press ESC when done, or Ctrl+C to quit without saving.");
    println!();
}

/// Use the preset path, or ask. Ctrl+C during the prompt skips saving.
fn choose_destination(preset: Option<&Path>, interrupt: &InterruptFlag) -> Destination {
    if let Some(path) = preset {
        return Destination::Path(path.to_path_buf());
    }

    discard_pending_input();
    let default = Path::new(DEFAULT_CONFIG_PATH);
    print!(
        "Save to [{}]? (Enter for default, n to skip, or type a path): ",
        default.display()
    );
    let _ = io::stdout().flush();

    let mut line = String::new();
    let reply = match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.as_str()),
    };
    if interrupt.is_raised() {
        return Destination::Skip;
    }
    Destination::from_reply(reply, default)
}

/// One redrawn console line showing where the pointer is.
#[derive(Default)]
struct StatusLine {
    last: String,
}

impl StatusLine {
    fn update(&mut self, event: &SamplerEvent) {
        match event {
            SamplerEvent::Tick { sample, captured } => {
                let text = match &sample.located {
                    Some(located) => format!(
                        "Monitor {}: ({}, {})  virtual {}  captured: {}",
                        located.index, located.x, located.y, sample.position, captured
                    ),
                    None => format!(
                        "OUTSIDE  virtual {}  captured: {}",
                        sample.position, captured
                    ),
                };
                if text != self.last {
                    self.draw(&text);
                    self.last = text;
                }
            }
            SamplerEvent::Captured { index, point } => {
                self.clear();
                println!("Captured #{}: {}", index, point);
            }
            SamplerEvent::Finished { .. } => {}
        }
    }

    fn draw(&self, text: &str) {
        let pad = self.last.len().saturating_sub(text.len());
        print!("\r{}{}", text, " ".repeat(pad));
        let _ = io::stdout().flush();
    }

    fn clear(&mut self) {
        if !self.last.is_empty() {
            print!("\r{}\r", " ".repeat(self.last.len()));
            let _ = io::stdout().flush();
            self.last.clear();
        }
    }
}
