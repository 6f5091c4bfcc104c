//! SVG to bitmap conversion.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::{CaptureError, Result};

/// Default scale applied when rasterizing, for crisp text on high-DPI displays.
pub const DEFAULT_ZOOM: f32 = 2.0;

/// Turns a vector document into pixels.
///
/// Implementations must be usable from the recording thread.
pub trait Rasterizer: Send + Sync {
    /// Rasterize an SVG document. Failures are reported as [`CaptureError::Render`].
    fn rasterize(&self, svg: &str) -> Result<RgbaImage>;
}

/// [`Rasterizer`] backed by `resvg`.
///
/// System fonts are loaded once at construction and shared by every call.
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    zoom: f32,
}

impl ResvgRasterizer {
    pub fn new(zoom: f32) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "Loaded system fonts");
        Self::with_fontdb(Arc::new(fontdb), zoom)
    }

    /// Create with a specific font database (for testing).
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>, zoom: f32) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            DEFAULT_ZOOM
        };
        Self { fontdb, zoom }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &str) -> Result<RgbaImage> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| CaptureError::Render(format!("invalid SVG: {}", e)))?;

        let size = tree
            .size()
            .to_int_size()
            .scale_by(self.zoom)
            .ok_or_else(|| CaptureError::Render("image size out of range".to_string()))?;
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            CaptureError::Render(format!(
                "cannot allocate {}x{} pixmap",
                size.width(),
                size.height()
            ))
        })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.zoom, self.zoom),
            &mut pixmap.as_mut(),
        );

        // tiny-skia stores premultiplied alpha
        let data: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        RgbaImage::from_raw(size.width(), size.height(), data)
            .ok_or_else(|| CaptureError::Render("pixel buffer size mismatch".to_string()))
    }
}

/// Encode a bitmap as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Decode PNG bytes back into a bitmap.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|e| CaptureError::Render(format!("unreadable frame: {}", e)))
}
