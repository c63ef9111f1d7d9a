//! Offline trace replay.
//!
//! The engine's landmark source boundary, implemented for recorded input: a
//! JSON-lines trace with one entry per video frame, each carrying either a
//! hand's 21 landmarks or null for a frame with no detection. Replay drives
//! a `DrawingSession` against a background frame exactly the way a live
//! camera callback would, which makes whole-session behavior reproducible.

use crate::error::{Error, Result};
use crate::gesture::GestureState;
use crate::landmarks::LandmarkSet;
use crate::session::DrawingSession;
use image::{Rgb, RgbImage};
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

/// One line of a landmark trace file
#[derive(Debug, Deserialize)]
struct TraceFrame {
    /// 21 landmarks as `[x, y, z]` triples, or null when no hand was seen
    landmarks: Option<Vec<[f32; 3]>>,
}

/// Summary of one replay run
#[derive(Debug)]
pub struct ReplaySummary {
    /// Frames processed
    pub frames: usize,
    /// Frames where a hand was present
    pub frames_with_hand: usize,
    /// Gesture state after the last frame
    pub final_state: GestureState,
    /// Painted pixels left on the surface
    pub painted_pixels: usize,
}

/// Read a landmark trace from a JSON-lines file.
///
/// A line that is not valid JSON fails the whole read; a line whose landmark
/// values are unusable (wrong count, non-finite) is logged and treated as a
/// frame with no hand, matching the engine's per-frame error policy.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not valid JSON.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<Option<LandmarkSet>>> {
    let content = std::fs::read_to_string(&path)?;
    let mut frames = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let frame: TraceFrame = serde_json::from_str(line)
            .map_err(|e| Error::Trace(format!("Line {}: {e}", line_no + 1)))?;
        let landmarks = match frame.landmarks {
            None => None,
            Some(points) => {
                let flat: Vec<f32> = points.iter().flatten().copied().collect();
                match LandmarkSet::from_flat(&flat) {
                    Ok(set) => Some(set),
                    Err(e) => {
                        warn!("Line {}: unusable landmarks ({e}), treating as no hand", line_no + 1);
                        None
                    }
                }
            }
        };
        frames.push(landmarks);
    }
    info!("Loaded {} trace frames from {}", frames.len(), path.as_ref().display());
    Ok(frames)
}

/// Replay a trace through a session.
///
/// Every frame is composited against `background`; when `out_dir` is given
/// the composites are written there as numbered PNGs.
///
/// # Errors
///
/// Returns an error if a composite cannot be written.
pub fn run_replay(
    session: &mut DrawingSession,
    trace: &[Option<LandmarkSet>],
    background: &RgbImage,
    out_dir: Option<&Path>,
) -> Result<ReplaySummary> {
    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
    }

    let start = Instant::now();
    let mut last_report = Instant::now();
    let mut frames_since_report = 0u32;
    let mut frames_with_hand = 0usize;

    for (i, landmarks) in trace.iter().enumerate() {
        if landmarks.is_some() {
            frames_with_hand += 1;
        }
        let output = session.process_frame(landmarks.as_ref(), Some(background));

        if let (Some(dir), Some(composite)) = (out_dir, output.composite) {
            let path = dir.join(format!("frame_{i:05}.png"));
            composite.save_with_format(&path, image::ImageFormat::Png)?;
        }

        frames_since_report += 1;
        if last_report.elapsed().as_secs() >= 1 {
            let fps = f64::from(frames_since_report) / last_report.elapsed().as_secs_f64();
            debug!("Replay at frame {}: {:.1} fps", i + 1, fps);
            frames_since_report = 0;
            last_report = Instant::now();
        }
    }

    let summary = ReplaySummary {
        frames: trace.len(),
        frames_with_hand,
        final_state: session.gesture_state(),
        painted_pixels: session.surface().painted_pixel_count(),
    };
    info!(
        "Replay finished: {} frames ({} with hand) in {:.2}s, {} painted pixels",
        summary.frames,
        summary.frames_with_hand,
        start.elapsed().as_secs_f64(),
        summary.painted_pixels
    );
    Ok(summary)
}

/// A neutral gradient frame for replays with no recorded video
#[must_use]
pub fn synthetic_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let gx = if width > 1 { (x * 160 / (width - 1)) as u8 } else { 0 };
        let gy = if height > 1 { (y * 160 / (height - 1)) as u8 } else { 0 };
        Rgb([24 + gx / 4, 24 + gy / 4, 40 + gx / 8 + gy / 8])
    })
}
