//! GIF output via the `image` crate.

use image::codecs::gif::{GifEncoder as ImageGifEncoder, Repeat};
use image::{Delay, Frame};

use super::{AnimationEncoder, TimedFrame};
use crate::error::{CaptureError, Result};

/// Quantization speed used when none is given (1 = best, 30 = fastest).
pub const DEFAULT_SPEED: i32 = 10;

/// Looping GIF encoder.
#[derive(Debug, Clone)]
pub struct GifEncoder {
    speed: i32,
}

impl GifEncoder {
    pub fn new(speed: i32) -> Self {
        Self {
            speed: speed.clamp(1, 30),
        }
    }
}

impl Default for GifEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl AnimationEncoder for GifEncoder {
    fn extension(&self) -> &'static str {
        "gif"
    }

    fn encode(&self, frames: &[TimedFrame], fps: u32) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            // The trailer is written when the encoder drops
            let mut encoder = ImageGifEncoder::new_with_speed(&mut bytes, self.speed);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| CaptureError::Encode(e.to_string()))?;

            for frame in frames {
                let (numer, denom) = frame.delay_ms(fps);
                let delay = Delay::from_numer_denom_ms(numer, denom);
                encoder
                    .encode_frame(Frame::from_parts(frame.image.clone(), 0, 0, delay))
                    .map_err(|e| CaptureError::Encode(e.to_string()))?;
            }
        }
        Ok(bytes)
    }
}
