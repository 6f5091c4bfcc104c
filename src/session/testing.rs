//! Test doubles for the PTY and rasterizer seams.

use std::sync::{Arc, Mutex};

use image::RgbaImage;

use super::pty::{DataCallback, PtyChannel, PtyCommand, PtySpawner};
use crate::error::{CaptureError, Result};
use crate::raster::Rasterizer;

/// Shared record of everything fake channels saw.
#[derive(Debug, Default)]
struct Log {
    written: Vec<u8>,
    commands: Vec<PtyCommand>,
}

/// Spawns [`EchoPty`] channels, or fails every spawn.
#[derive(Clone, Default)]
pub struct FakeSpawner {
    log: Arc<Mutex<Log>>,
    fail: bool,
}

impl FakeSpawner {
    pub fn echo() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Bytes written to every spawned channel, in order.
    pub fn written(&self) -> Vec<u8> {
        self.log.lock().unwrap().written.clone()
    }

    pub fn commands(&self) -> Vec<PtyCommand> {
        self.log.lock().unwrap().commands.clone()
    }
}

impl PtySpawner for FakeSpawner {
    fn spawn(&self, command: &PtyCommand) -> Result<Box<dyn PtyChannel>> {
        if self.fail {
            return Err(CaptureError::Pty(format!("cannot spawn {}", command.program)));
        }
        self.log.lock().unwrap().commands.push(command.clone());
        Ok(Box::new(EchoPty {
            log: Arc::clone(&self.log),
            callback: None,
            alive: true,
        }))
    }
}

/// Sends every write straight back as output, like a terminal in echo mode.
pub struct EchoPty {
    log: Arc<Mutex<Log>>,
    callback: Option<DataCallback>,
    alive: bool,
}

impl PtyChannel for EchoPty {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.alive {
            return Err(CaptureError::Pty("process exited".to_string()));
        }
        self.log.lock().unwrap().written.extend_from_slice(bytes);
        if let Some(callback) = self.callback.as_mut() {
            callback(bytes);
        }
        Ok(())
    }

    fn on_data(&mut self, callback: DataCallback) -> Result<()> {
        self.callback = Some(callback);
        Ok(())
    }

    fn kill(&mut self) -> Result<()> {
        self.alive = false;
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        self.alive
    }
}

/// Rasterizes any document to a single black pixel.
pub struct SolidRasterizer;

impl Rasterizer for SolidRasterizer {
    fn rasterize(&self, _svg: &str) -> Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255])))
    }
}
