//! The drawing session: per-frame orchestration and stroke accumulation.
//!
//! One `DrawingSession` owns the drawing surface, the stroke continuity
//! anchor, and the previous gesture state. Everything runs synchronously
//! inside `process_frame`, driven by whatever delivers frames; there is no
//! hidden global state, so the whole engine can be exercised with synthetic
//! landmark input and no camera.

use crate::compositor::{compose, DebugOverlay};
use crate::config::Config;
use crate::cursor::{Cursor, CursorMapper, ExponentialSmoother};
use crate::error::Result;
use crate::gesture::{classify, GestureState};
use crate::landmarks::LandmarkSet;
use crate::surface::DrawingSurface;
use image::{RgbaImage, RgbImage};
use log::{debug, info};

/// Result of processing a single frame
pub struct FrameOutput {
    /// Gesture state classified this frame
    pub state: GestureState,
    /// Cursor position, when a hand was present
    pub cursor: Option<Cursor>,
    /// Composited output, or `None` when no video frame was available
    pub composite: Option<RgbaImage>,
}

/// A live drawing session
pub struct DrawingSession {
    config: Config,
    surface: DrawingSurface,
    mapper: CursorMapper,
    smoother: Option<ExponentialSmoother>,
    continuity: Option<Cursor>,
    prev_state: GestureState,
}

impl DrawingSession {
    /// Create a session from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let surface = DrawingSurface::new(config.canvas.width, config.canvas.height);
        let mapper = CursorMapper::new(config.canvas.width, config.canvas.height, config.canvas.mirror_x);
        let smoother = config
            .smoothing
            .enabled
            .then(|| ExponentialSmoother::new(config.smoothing.alpha));
        info!(
            "Drawing session started ({}x{}, mirror_x={})",
            config.canvas.width, config.canvas.height, config.canvas.mirror_x
        );
        Ok(Self {
            config,
            surface,
            mapper,
            smoother,
            continuity: None,
            prev_state: GestureState::Idle,
        })
    }

    /// Process one frame of input.
    ///
    /// `landmarks` is the hand detected this frame, if any; callers that hit
    /// a corrupt landmark set pass `None`, which classifies as `Idle` and
    /// never aborts the session. `frame` is the raw video image; when it is
    /// absent the drawing state still advances but compositing is skipped
    /// for this tick.
    pub fn process_frame(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        frame: Option<&RgbImage>,
    ) -> FrameOutput {
        let state = landmarks.map_or(GestureState::Idle, classify);
        let cursor = landmarks.map(|l| {
            let tip = match &mut self.smoother {
                Some(s) => s.apply(l.index_tip()),
                None => l.index_tip(),
            };
            self.mapper.map(tip)
        });
        if landmarks.is_none() {
            if let Some(s) = &mut self.smoother {
                s.reset();
            }
        }

        if state != self.prev_state {
            debug!("Gesture {} -> {}", self.prev_state, state);
        }
        self.accumulate(state, cursor);
        self.prev_state = state;

        let composite = frame.map(|f| {
            let overlay_enabled = self.config.overlay.skeleton
                || self.config.overlay.crosshair
                || self.config.overlay.label;
            if overlay_enabled {
                let overlay = DebugOverlay {
                    landmarks,
                    state,
                    cursor,
                    mapper: &self.mapper,
                    settings: &self.config.overlay,
                };
                compose(f, &self.surface, Some(&overlay))
            } else {
                compose(f, &self.surface, None)
            }
        });

        FrameOutput { state, cursor, composite }
    }

    /// Apply one frame's gesture to the surface and continuity anchor
    fn accumulate(&mut self, state: GestureState, cursor: Option<Cursor>) {
        match state {
            GestureState::Drawing => {
                if let Some(cursor) = cursor {
                    match self.continuity {
                        // A segment needs two points; the first Drawing frame
                        // only records the anchor.
                        None => self.continuity = Some(cursor),
                        Some(anchor) => {
                            self.surface.stroke_segment(
                                anchor,
                                cursor,
                                self.config.stroke.color,
                                self.config.stroke.width,
                            );
                            self.continuity = Some(cursor);
                        }
                    }
                }
            }
            GestureState::Erasing => self.reset_drawing(),
            // Breaking continuity here is what prevents a jump-line when
            // drawing resumes somewhere else later.
            GestureState::Hovering | GestureState::Idle => self.continuity = None,
        }
    }

    /// Clear the drawing on explicit user request.
    ///
    /// Funnels through the same reset as the erase gesture so the two can
    /// never diverge.
    pub fn clear_drawing(&mut self) {
        info!("Drawing cleared");
        self.reset_drawing();
    }

    /// The shared reset path for the erase gesture and the manual clear
    fn reset_drawing(&mut self) {
        self.surface.clear();
        self.continuity = None;
    }

    /// Tear the session down to a fresh state
    pub fn reset(&mut self) {
        self.reset_drawing();
        self.prev_state = GestureState::Idle;
        if let Some(s) = &mut self.smoother {
            s.reset();
        }
    }

    /// Read access to the persistent drawing surface
    #[must_use]
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// The gesture state of the most recent frame
    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.prev_state
    }

    /// True while a stroke is in progress (a continuity anchor is held)
    #[must_use]
    pub fn has_active_stroke(&self) -> bool {
        self.continuity.is_some()
    }

    /// Encode the current drawing as a PNG for export or analysis
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_drawing(&self) -> Result<Vec<u8>> {
        self.surface.encode_png()
    }
}
