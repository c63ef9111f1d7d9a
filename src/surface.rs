//! The persistent drawing surface.
//!
//! An off-screen RGBA raster that accumulates committed stroke segments for
//! the lifetime of a drawing session. Content only ever changes by appending
//! segments or by a full clear; the visible output is always composited
//! fresh from this buffer and the live frame, never mutated in place.

use crate::constants::FLATTEN_BACKGROUND;
use crate::cursor::Cursor;
use crate::error::Result;
use image::{Rgba, RgbaImage};
use std::io::Cursor as IoCursor;
use std::path::Path;

/// Off-screen raster buffer holding all committed strokes
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    image: RgbaImage,
}

impl DrawingSurface {
    /// Create an empty, fully transparent surface
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])) }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Read access for compositing and serialization
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when nothing has been drawn since the last clear
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Wipe the surface back to fully transparent
    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    /// Append one stroke segment from `a` to `b`.
    ///
    /// The segment is rasterized with Bresenham stepping, stamping a filled
    /// disc of the stroke width at every step so joints between consecutive
    /// segments are seamless.
    pub fn stroke_segment(&mut self, a: Cursor, b: Cursor, color: [u8; 4], width: u32) {
        let radius = (width.max(1) / 2) as i32;
        let (mut x0, mut y0) = (a.x, a.y);
        let (x1, y1) = (b.x, b.y);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp_disc(x0, y0, radius, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Stamp a filled disc centered at (cx, cy)
    fn stamp_disc(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
        if radius == 0 {
            self.put_pixel(cx, cy, color);
            return;
        }
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Set a pixel if (x, y) lies inside the surface
    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        self.image.put_pixel(x, y, Rgba(color));
    }

    /// Flatten onto an opaque background for export and analysis
    #[must_use]
    pub fn flattened(&self) -> RgbaImage {
        let bg = FLATTEN_BACKGROUND;
        let mut out = RgbaImage::from_pixel(self.width(), self.height(), Rgba(bg));
        for (x, y, p) in self.image.enumerate_pixels() {
            if p.0[3] > 0 {
                out.put_pixel(x, y, *p);
            }
        }
        out
    }

    /// Encode the flattened drawing as a PNG byte buffer
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.flattened()
            .write_to(&mut IoCursor::new(&mut buf), image::ImageFormat::Png)?;
        Ok(buf)
    }

    /// Write the flattened drawing to a PNG file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.flattened().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Count of pixels touched by at least one stroke, used by tests
    #[must_use]
    pub fn painted_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }
}
