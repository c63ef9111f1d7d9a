//! Gesture classification from hand landmarks.
//!
//! Classification is a pure function of the current frame's landmarks.
//! No history is kept here; stroke continuity across frames is the
//! session's concern.

use crate::landmarks::LandmarkSet;
use std::fmt;

/// Discrete drawing intent derived from the current hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Index finger alone extended: the cursor paints
    Drawing,
    /// Index and middle extended: the cursor moves without painting
    Hovering,
    /// All four non-thumb fingers extended: wipe the whole canvas
    Erasing,
    /// No hand, or an unrecognized finger combination
    #[default]
    Idle,
}

impl GestureState {
    /// Short uppercase label for the debug overlay
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drawing => "DRAWING",
            Self::Hovering => "HOVERING",
            Self::Erasing => "ERASING",
            Self::Idle => "IDLE",
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extension flags for the four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    /// Derive extension flags from one landmark set.
    ///
    /// A finger counts as extended when its tip sits above its proximal
    /// joint in image space, i.e. the tip has the smaller y coordinate.
    /// The thumb is ignored; it is unreliable under the camera angles
    /// this runs at.
    #[must_use]
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        let [index, middle, ring, pinky] =
            landmarks.finger_tip_pip_pairs().map(|(tip, pip)| tip.y < pip.y);
        Self { index, middle, ring, pinky }
    }
}

/// Classify one frame's landmarks into a gesture state.
///
/// Rules are checked in precedence order; any combination that matches
/// none of them degrades to `Idle` rather than erroring.
#[must_use]
pub fn classify(landmarks: &LandmarkSet) -> GestureState {
    let fingers = FingerStates::from_landmarks(landmarks);
    classify_fingers(fingers)
}

/// Classification on already-derived finger flags, split out for testing
#[must_use]
pub fn classify_fingers(f: FingerStates) -> GestureState {
    if f.index && !f.middle && !f.ring && !f.pinky {
        GestureState::Drawing
    } else if f.index && f.middle && !f.ring {
        // Pinky deliberately ignored: a relaxed pinky often reads as
        // half-extended and must not break hover.
        GestureState::Hovering
    } else if f.index && f.middle && f.ring && f.pinky {
        GestureState::Erasing
    } else {
        GestureState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, NUM_HAND_LANDMARKS, PINKY_PIP, PINKY_TIP,
        RING_PIP, RING_TIP,
    };

    /// Build a landmark set with the given fingers extended.
    ///
    /// Extended fingers get their tip above the joint, curled fingers the
    /// opposite, everything else sits at mid-frame.
    fn hand_with(index: bool, middle: bool, ring: bool, pinky: bool) -> LandmarkSet {
        let mut flat = vec![0.5; NUM_HAND_LANDMARKS * 3];
        let fingers = [
            (INDEX_TIP, INDEX_PIP, index),
            (MIDDLE_TIP, MIDDLE_PIP, middle),
            (RING_TIP, RING_PIP, ring),
            (PINKY_TIP, PINKY_PIP, pinky),
        ];
        for (tip, pip, extended) in fingers {
            let (tip_y, pip_y) = if extended { (0.3, 0.5) } else { (0.7, 0.5) };
            flat[tip * 3 + 1] = tip_y;
            flat[pip * 3 + 1] = pip_y;
        }
        LandmarkSet::from_flat(&flat).unwrap()
    }

    #[test]
    fn test_index_only_is_drawing() {
        assert_eq!(classify(&hand_with(true, false, false, false)), GestureState::Drawing);
    }

    #[test]
    fn test_index_middle_is_hovering() {
        assert_eq!(classify(&hand_with(true, true, false, false)), GestureState::Hovering);
        // Pinky state must not matter for hover
        assert_eq!(classify(&hand_with(true, true, false, true)), GestureState::Hovering);
    }

    #[test]
    fn test_all_four_is_erasing() {
        assert_eq!(classify(&hand_with(true, true, true, true)), GestureState::Erasing);
    }

    #[test]
    fn test_unrecognized_combinations_are_idle() {
        assert_eq!(classify(&hand_with(false, false, false, false)), GestureState::Idle);
        assert_eq!(classify(&hand_with(false, true, false, false)), GestureState::Idle);
        assert_eq!(classify(&hand_with(true, false, true, false)), GestureState::Idle);
        assert_eq!(classify(&hand_with(false, true, true, true)), GestureState::Idle);
    }

    #[test]
    fn test_ring_extended_blocks_hover() {
        // Index + middle + ring without pinky matches neither hover nor erase
        assert_eq!(classify(&hand_with(true, true, true, false)), GestureState::Idle);
    }

    #[test]
    fn test_tip_exactly_at_joint_is_not_extended() {
        let flat = vec![0.5; NUM_HAND_LANDMARKS * 3];
        let set = LandmarkSet::from_flat(&flat).unwrap();
        let f = FingerStates::from_landmarks(&set);
        assert!(!f.index && !f.middle && !f.ring && !f.pinky);
        assert_eq!(classify(&set), GestureState::Idle);
    }
}
