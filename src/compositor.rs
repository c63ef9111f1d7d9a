//! Frame compositing.
//!
//! Each tick the visible output is rebuilt from scratch: the live video
//! frame scaled to output size, the drawing surface alpha-blended on top at
//! identical alignment, then optional debug overlays (hand skeleton, cursor
//! crosshair, gesture label). The drawing surface is only read here, which
//! is what lets a drawing persist across frames with no hand in view.

use crate::config::OverlayConfig;
use crate::constants::{
    CROSSHAIR_COLOR, HAND_SKELETON, LABEL_COLOR, SKELETON_BONE_COLOR, SKELETON_JOINT_COLOR,
};
use crate::cursor::{Cursor, CursorMapper};
use crate::gesture::GestureState;
use crate::landmarks::LandmarkSet;
use crate::surface::DrawingSurface;
use image::{Rgba, RgbaImage, RgbImage};

/// Per-frame inputs for the optional debug overlay pass
pub struct DebugOverlay<'a> {
    pub landmarks: Option<&'a LandmarkSet>,
    pub state: GestureState,
    pub cursor: Option<Cursor>,
    pub mapper: &'a CursorMapper,
    pub settings: &'a OverlayConfig,
}

/// Compose one output frame.
///
/// The video frame is scaled to the surface dimensions with nearest-neighbor
/// sampling; the drawing layer is blended over it without any further
/// mirroring, since cursor coordinates were already computed in output space.
#[must_use]
pub fn compose(
    frame: &RgbImage,
    surface: &DrawingSurface,
    overlay: Option<&DebugOverlay<'_>>,
) -> RgbaImage {
    let (w, h) = (surface.width(), surface.height());
    let mut out = scale_frame(frame, w, h);
    blend_over(&mut out, surface.as_image());

    if let Some(dbg) = overlay {
        if dbg.settings.skeleton {
            if let Some(landmarks) = dbg.landmarks {
                draw_skeleton(&mut out, landmarks, dbg.mapper);
            }
        }
        if dbg.settings.crosshair {
            if let Some(cursor) = dbg.cursor {
                draw_crosshair(&mut out, cursor.x, cursor.y, 10, CROSSHAIR_COLOR);
            }
        }
        if dbg.settings.label {
            draw_text_5x7(&mut out, 8, 8, dbg.state.label(), LABEL_COLOR);
        }
    }

    out
}

/// Scale the video frame to output dimensions, promoting to RGBA
fn scale_frame(frame: &RgbImage, width: u32, height: u32) -> RgbaImage {
    let (fw, fh) = frame.dimensions();
    let mut out = RgbaImage::new(width, height);
    if fw == 0 || fh == 0 {
        return out;
    }
    for (x, y, p) in out.enumerate_pixels_mut() {
        let sx = (x as u64 * fw as u64 / width as u64).min(fw as u64 - 1) as u32;
        let sy = (y as u64 * fh as u64 / height as u64).min(fh as u64 - 1) as u32;
        let src = frame.get_pixel(sx, sy).0;
        *p = Rgba([src[0], src[1], src[2], 255]);
    }
    out
}

/// Alpha-blend `top` over `base` in place, assuming equal dimensions
fn blend_over(base: &mut RgbaImage, top: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(top.pixels()) {
        let a = u16::from(src.0[3]);
        if a == 0 {
            continue;
        }
        if a == 255 {
            *dst = *src;
            continue;
        }
        for c in 0..3 {
            let s = u16::from(src.0[c]);
            let d = u16::from(dst.0[c]);
            dst.0[c] = ((s * a + d * (255 - a)) / 255) as u8;
        }
        dst.0[3] = 255;
    }
}

/// Draw the hand skeleton through the same cursor transform the strokes use,
/// so the overlay lines up with what the user perceives
fn draw_skeleton(out: &mut RgbaImage, landmarks: &LandmarkSet, mapper: &CursorMapper) {
    for &(a, b) in &HAND_SKELETON {
        let pa = mapper.map(landmarks.point(a));
        let pb = mapper.map(landmarks.point(b));
        draw_line(out, pa.x, pa.y, pb.x, pb.y, SKELETON_BONE_COLOR);
    }
    for p in landmarks.points() {
        let c = mapper.map(*p);
        draw_disc(out, c.x, c.y, 2, SKELETON_JOINT_COLOR);
    }
}

/// Set a pixel if (x, y) is inside the image
#[inline]
fn put_pixel(img: &mut RgbaImage, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    img.put_pixel(x, y, Rgba(color));
}

/// Thin Bresenham line between two points
fn draw_line(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 4]) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(img, x0, y0, color);
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

/// Small filled disc, used for skeleton joints
fn draw_disc(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Crosshair with a small gap at the center, marking the cursor
fn draw_crosshair(img: &mut RgbaImage, cx: i32, cy: i32, size: i32, color: [u8; 4]) {
    draw_line(img, cx - size, cy, cx - 2, cy, color);
    draw_line(img, cx + 2, cy, cx + size, cy, color);
    draw_line(img, cx, cy - size, cx, cy - 2, color);
    draw_line(img, cx, cy + 2, cx, cy + size, color);
    put_pixel(img, cx, cy, color);
}

/// 5x7 glyph bitmaps for the gesture labels.
///
/// Each u8 is a row; the low 5 bits are the pixels with bit 4 leftmost.
/// Only the characters the labels need are defined.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g {
        ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
            Some([$a, $b, $c, $d, $e, $f, $g])
        };
    }

    match ch {
        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'N' => g!(0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        ' ' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000),
        _ => None,
    }
}

/// Draw one glyph with a 1-pixel shadow for contrast over video
fn draw_char_5x7(img: &mut RgbaImage, x: i32, y: i32, ch: char, color: [u8; 4]) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(img, x + rx + 1, y + ry as i32 + 1, [0, 0, 0, 255]);
                }
            }
        }
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(img, x + rx, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a label string using the 5x7 glyphs
fn draw_text_5x7(img: &mut RgbaImage, mut x: i32, y: i32, text: &str, color: [u8; 4]) {
    for ch in text.chars() {
        draw_char_5x7(img, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;

    fn frame(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, image::Rgb(rgb))
    }

    #[test]
    fn test_compose_blank_surface_reproduces_frame() {
        let surface = DrawingSurface::new(32, 32);
        let out = compose(&frame(32, 32, [10, 20, 30]), &surface, None);
        assert_eq!(out.dimensions(), (32, 32));
        assert_eq!(out.get_pixel(16, 16).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_compose_overlays_strokes() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.stroke_segment(Cursor::new(4, 16), Cursor::new(28, 16), [255, 0, 0, 255], 1);
        let out = compose(&frame(32, 32, [10, 20, 30]), &surface, None);
        assert_eq!(out.get_pixel(16, 16).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(16, 8).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_compose_scales_frame_to_surface() {
        let surface = DrawingSurface::new(64, 48);
        let out = compose(&frame(32, 24, [99, 99, 99]), &surface, None);
        assert_eq!(out.dimensions(), (64, 48));
        assert_eq!(out.get_pixel(63, 47).0, [99, 99, 99, 255]);
    }

    #[test]
    fn test_compose_does_not_touch_surface() {
        let mut surface = DrawingSurface::new(16, 16);
        surface.stroke_segment(Cursor::new(2, 2), Cursor::new(12, 12), [0, 255, 0, 255], 2);
        let before = surface.painted_pixel_count();
        let _ = compose(&frame(16, 16, [0, 0, 0]), &surface, None);
        let _ = compose(&frame(16, 16, [7, 7, 7]), &surface, None);
        assert_eq!(surface.painted_pixel_count(), before);
    }

    #[test]
    fn test_label_overlay_draws_pixels() {
        let surface = DrawingSurface::new(96, 48);
        let mapper = CursorMapper::new(96, 48, true);
        let settings = OverlayConfig { skeleton: false, crosshair: false, label: true };
        let overlay = DebugOverlay {
            landmarks: None,
            state: GestureState::Idle,
            cursor: None,
            mapper: &mapper,
            settings: &settings,
        };
        let base = compose(&frame(96, 48, [0, 0, 0]), &surface, None);
        let labeled = compose(&frame(96, 48, [0, 0, 0]), &surface, Some(&overlay));
        assert_ne!(base, labeled);
    }

    #[test]
    fn test_all_label_glyphs_defined() {
        for state in [
            GestureState::Drawing,
            GestureState::Hovering,
            GestureState::Erasing,
            GestureState::Idle,
        ] {
            for ch in state.label().chars() {
                assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
            }
        }
    }
}
