//! Pointer injection.

use crate::{PlatformError, PlatformResult};
use clickloop_core::{ButtonPhase, PointerDriver};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::{debug, info};

/// Real pointer driver using the `enigo` crate.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> PlatformResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| PlatformError::PointerInit(format!("failed to create Enigo: {e}")))?;
        Ok(Self { enigo })
    }
}

impl PointerDriver for EnigoPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), String> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| e.to_string())
    }

    fn button(&mut self, phase: ButtonPhase) -> Result<(), String> {
        let direction = match phase {
            ButtonPhase::Press => Direction::Press,
            ButtonPhase::Release => Direction::Release,
        };
        self.enigo
            .button(Button::Left, direction)
            .map_err(|e| e.to_string())
    }
}

/// Pointer driver that only logs, for dry runs.
#[derive(Debug, Default)]
pub struct NoopPointer {
    position: Option<(i32, i32)>,
}

impl PointerDriver for NoopPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), String> {
        debug!(x, y, "NoopPointer: would move pointer");
        self.position = Some((x, y));
        Ok(())
    }

    fn button(&mut self, phase: ButtonPhase) -> Result<(), String> {
        if phase == ButtonPhase::Release {
            if let Some((x, y)) = self.position {
                info!("[dry run] click at ({}, {})", x, y);
            }
        }
        Ok(())
    }
}
