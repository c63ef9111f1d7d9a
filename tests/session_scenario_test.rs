//! End-to-end session scenarios driven with synthetic input


use air_canvas::config::Config;
use air_canvas::constants::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};
use air_canvas::cursor::Cursor;
use air_canvas::gesture::GestureState;
use air_canvas::session::DrawingSession;
use air_canvas::surface::DrawingSurface;
use image::RgbImage;
use test_helpers::{drawing_hand, erasing_hand, norm, test_config, test_session};

/// Tracing three sides of a square, then erasing
#[test]
fn test_square_scenario() {
    let mut session = test_session();
    let corners = [(10u32, 10u32), (10, 50), (50, 50), (50, 10)];
    for &(x, y) in &corners {
        let out = session.process_frame(Some(&drawing_hand(norm(x), norm(y))), None);
        assert_eq!(out.state, GestureState::Drawing);
    }

    // Exactly the three connected sides, nothing else
    let mut expected = DrawingSurface::new(100, 100);
    for w in corners.windows(2) {
        expected.stroke_segment(
            Cursor::new(w[0].0 as i32, w[0].1 as i32),
            Cursor::new(w[1].0 as i32, w[1].1 as i32),
            DEFAULT_STROKE_COLOR,
            DEFAULT_STROKE_WIDTH,
        );
    }
    assert_eq!(session.surface().as_image(), expected.as_image());

    // The fourth side was never drawn
    assert_eq!(session.surface().as_image().get_pixel(30, 10).0[3], 0);

    // All four fingers extended wipes everything
    session.process_frame(Some(&erasing_hand()), None);
    assert!(session.surface().is_blank());
}

/// The drawing persists through frames with no hand detected and keeps
/// appearing in every composite
#[test]
fn test_drawing_persists_without_hand() {
    let mut session = test_session();
    session.process_frame(Some(&drawing_hand(norm(20), norm(40))), None);
    session.process_frame(Some(&drawing_hand(norm(80), norm(40))), None);
    let painted = session.surface().painted_pixel_count();
    assert!(painted > 0);

    let frame = RgbImage::from_pixel(100, 100, image::Rgb([5, 5, 5]));
    for _ in 0..30 {
        let out = session.process_frame(None, Some(&frame));
        assert_eq!(out.state, GestureState::Idle);
        let composite = out.composite.expect("frame available, composite expected");
        // The stroke row shows stroke color, the background shows video
        assert_eq!(composite.get_pixel(50, 40).0, DEFAULT_STROKE_COLOR);
        assert_eq!(composite.get_pixel(50, 80).0, [5, 5, 5, 255]);
    }
    assert_eq!(session.surface().painted_pixel_count(), painted);
}

/// With mirroring on, strokes land on the horizontally flipped column
#[test]
fn test_mirrored_session_flips_cursor() {
    let mut config = test_config();
    config.canvas.mirror_x = true;
    let mut session = DrawingSession::new(config).unwrap();

    session.process_frame(Some(&drawing_hand(norm(10), norm(30))), None);
    session.process_frame(Some(&drawing_hand(norm(10), norm(60))), None);

    // Normalized x = 0.105 maps to column 89 when mirrored, not column 10
    let img = session.surface().as_image();
    assert!(img.get_pixel(89, 45).0[3] > 0);
    assert_eq!(img.get_pixel(10, 45).0[3], 0);
}

/// Session reset restores a fresh state but keeps the configuration
#[test]
fn test_session_reset() {
    let mut session = test_session();
    session.process_frame(Some(&drawing_hand(norm(10), norm(10))), None);
    session.process_frame(Some(&drawing_hand(norm(40), norm(40))), None);
    assert!(!session.surface().is_blank());
    assert_eq!(session.gesture_state(), GestureState::Drawing);

    session.reset();
    assert!(session.surface().is_blank());
    assert!(!session.has_active_stroke());
    assert_eq!(session.gesture_state(), GestureState::Idle);

    // Still fully usable afterwards
    session.process_frame(Some(&drawing_hand(norm(10), norm(10))), None);
    session.process_frame(Some(&drawing_hand(norm(40), norm(10))), None);
    assert!(!session.surface().is_blank());
}

/// Cursor smoothing affects stroke geometry but never state transitions
#[test]
fn test_smoothing_preserves_state_behavior() {
    let mut config = test_config();
    config.smoothing.enabled = true;
    config.smoothing.alpha = 0.3;
    let mut smoothed = DrawingSession::new(config).unwrap();
    let mut raw = test_session();

    let inputs = [(10u32, 10u32), (90, 10), (90, 90)];
    for &(x, y) in &inputs {
        let a = smoothed.process_frame(Some(&drawing_hand(norm(x), norm(y))), None);
        let b = raw.process_frame(Some(&drawing_hand(norm(x), norm(y))), None);
        assert_eq!(a.state, b.state);
    }
    // A single lost frame still interrupts the stroke in both
    assert!(smoothed.has_active_stroke());
    smoothed.process_frame(None, None);
    assert!(!smoothed.has_active_stroke());
}

/// A corrupt landmark set is the caller's cue to pass None, which must
/// behave exactly like a frame with no hand
#[test]
fn test_missing_landmarks_are_idle_not_fatal() {
    let mut session = test_session();
    for _ in 0..5 {
        let out = session.process_frame(None, None);
        assert_eq!(out.state, GestureState::Idle);
        assert!(out.cursor.is_none());
    }
    assert!(session.surface().is_blank());
}

/// Composite output dimensions follow the canvas, not the incoming frame
#[test]
fn test_composite_scales_input_frame() {
    let mut config = test_config();
    config.canvas.width = 120;
    config.canvas.height = 80;
    let mut session = DrawingSession::new(config).unwrap();
    let frame = RgbImage::from_pixel(64, 48, image::Rgb([200, 100, 50]));
    let out = session.process_frame(None, Some(&frame));
    let composite = out.composite.unwrap();
    assert_eq!(composite.dimensions(), (120, 80));
    assert_eq!(composite.get_pixel(119, 79).0, [200, 100, 50, 255]);
}
