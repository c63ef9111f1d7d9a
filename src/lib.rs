//! Gesture-driven freehand drawing engine.
//!
//! This library turns a per-frame stream of hand landmarks into a persistent
//! freehand drawing composited over live video:
//! 1. Gesture classification maps finger extension to a drawing intent
//!    (draw, hover, erase, idle) from the current frame alone
//! 2. Stroke accumulation connects consecutive drawing-state cursor
//!    positions into segments on an off-screen surface, breaking continuity
//!    whenever the gesture leaves the drawing state
//! 3. Compositing rebuilds the visible output every frame from the video
//!    frame, the drawing layer, and optional debug overlays
//! 4. On demand, the finished drawing is submitted to a remote
//!    content-understanding service for an explanation
//!
//! Hand-pose estimation and camera capture live outside this crate; the
//! engine consumes whatever delivers landmarks and frames, which keeps it
//! fully drivable from synthetic input.
//!
//! # Examples
//!
//! ```no_run
//! use air_canvas::{config::Config, landmarks::LandmarkSet, session::DrawingSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = DrawingSession::new(Config::default())?;
//!
//! // Per frame: landmarks from the pose estimator, image from the camera.
//! let landmarks = LandmarkSet::from_flat(&[0.5; 63])?;
//! let frame = image::RgbImage::new(640, 480);
//! let output = session.process_frame(Some(&landmarks), Some(&frame));
//! println!("gesture: {}", output.state);
//!
//! // Explicit user actions.
//! session.clear_drawing();
//! session.surface().save_png("drawing.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! Submitting a drawing for analysis:
//!
//! ```no_run
//! use air_canvas::analysis::{AnalysisDispatcher, AnalysisState};
//! use air_canvas::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut dispatcher = AnalysisDispatcher::new(config.analysis.clone());
//! dispatcher.request(std::fs::read("drawing.png")?)?;
//!
//! // Poll from the frame loop; the request never blocks a frame.
//! loop {
//!     match dispatcher.poll() {
//!         AnalysisState::Requesting => std::thread::sleep(std::time::Duration::from_millis(50)),
//!         AnalysisState::Succeeded(text) => {
//!             println!("{text}");
//!             break;
//!         }
//!         AnalysisState::Failed(e) => {
//!             eprintln!("{e}");
//!             break;
//!         }
//!         AnalysisState::Idle => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Drawing analysis dispatcher and service client
pub mod analysis;

/// Frame compositing and debug overlays
pub mod compositor;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Cursor mapping and optional smoothing
pub mod cursor;

/// Error types and result handling
pub mod error;

/// Gesture classification from hand landmarks
pub mod gesture;

/// Hand landmark types
pub mod landmarks;

/// Offline landmark trace replay
pub mod replay;

/// The drawing session state machine
pub mod session;

/// The persistent drawing surface
pub mod surface;

pub use error::{Error, Result};
