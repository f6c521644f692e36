//! `clickloop monitors`: print the detected layout.

use anyhow::Result;
use clickloop_core::enumerate;
use clickloop_platform::SystemDisplays;

pub fn execute() -> Result<()> {
    let topology = enumerate(&SystemDisplays)?;

    println!("Detected {} monitor(s):", topology.len());
    for (index, region) in topology.regions().iter().enumerate() {
        println!("  Monitor {}: {}", index, region);
    }
    if topology.is_estimated() {
        println!();
        println!("Positions are estimated from display resolutions and may not match the real layout.");
    }
    Ok(())
}
