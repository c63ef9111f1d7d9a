//! Hand landmark types delivered once per frame by the external pose estimator.
//!
//! A detected hand arrives as 21 named points in normalized video space
//! (x and y in [0, 1], z is a relative depth hint). The set is transient:
//! it lives for one frame of processing and is never stored.

use crate::constants::{INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, NUM_HAND_LANDMARKS, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP};
use crate::error::{Error, Result};

/// A single landmark in normalized video space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NormalizedPoint {
    /// Create a point from normalized coordinates
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The full set of landmarks for one detected hand in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [NormalizedPoint; NUM_HAND_LANDMARKS],
}

impl LandmarkSet {
    /// Create a landmark set from 21 points, validating coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is non-finite or an x/y value is
    /// outside the normalized range with a small tolerance for estimator
    /// overshoot at the frame edge.
    pub fn new(points: [NormalizedPoint; NUM_HAND_LANDMARKS]) -> Result<Self> {
        for (i, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
                return Err(Error::Landmark(format!("Non-finite coordinate at landmark {i}")));
            }
            // Estimators report slightly out-of-frame points for partially
            // visible hands; anything far outside [0,1] is corrupt data.
            if !(-0.5..=1.5).contains(&p.x) || !(-0.5..=1.5).contains(&p.y) {
                return Err(Error::Landmark(format!(
                    "Landmark {i} outside normalized bounds: ({}, {})",
                    p.x, p.y
                )));
            }
        }
        Ok(Self { points })
    }

    /// Parse a landmark set from a flat `[x0, y0, z0, x1, y1, z1, ...]` slice
    ///
    /// # Errors
    ///
    /// Returns an error on wrong element count or invalid coordinates.
    pub fn from_flat(flat: &[f32]) -> Result<Self> {
        if flat.len() != NUM_HAND_LANDMARKS * 3 {
            return Err(Error::Landmark(format!(
                "Expected {} values, got {}",
                NUM_HAND_LANDMARKS * 3,
                flat.len()
            )));
        }
        let mut points = [NormalizedPoint::default(); NUM_HAND_LANDMARKS];
        for (i, chunk) in flat.chunks_exact(3).enumerate() {
            points[i] = NormalizedPoint::new(chunk[0], chunk[1], chunk[2]);
        }
        Self::new(points)
    }

    /// Access a landmark by its model index
    #[must_use]
    pub fn point(&self, index: usize) -> NormalizedPoint {
        self.points[index]
    }

    /// All 21 points in model order
    #[must_use]
    pub fn points(&self) -> &[NormalizedPoint; NUM_HAND_LANDMARKS] {
        &self.points
    }

    /// The index fingertip, which drives the drawing cursor
    #[must_use]
    pub fn index_tip(&self) -> NormalizedPoint {
        self.points[INDEX_TIP]
    }

    /// Fingertip and proximal-joint pairs for the four non-thumb fingers,
    /// in index/middle/ring/pinky order
    #[must_use]
    pub fn finger_tip_pip_pairs(&self) -> [(NormalizedPoint, NormalizedPoint); 4] {
        [
            (self.points[INDEX_TIP], self.points[INDEX_PIP]),
            (self.points[MIDDLE_TIP], self.points[MIDDLE_PIP]),
            (self.points[RING_TIP], self.points[RING_PIP]),
            (self.points[PINKY_TIP], self.points[PINKY_PIP]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_zeros() -> Vec<f32> {
        vec![0.0; NUM_HAND_LANDMARKS * 3]
    }

    #[test]
    fn test_from_flat_valid() {
        let set = LandmarkSet::from_flat(&flat_zeros()).unwrap();
        assert_eq!(set.points().len(), NUM_HAND_LANDMARKS);
    }

    #[test]
    fn test_from_flat_wrong_count() {
        assert!(LandmarkSet::from_flat(&[0.0; 10]).is_err());
        assert!(LandmarkSet::from_flat(&[]).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut flat = flat_zeros();
        flat[INDEX_TIP * 3 + 1] = f32::NAN;
        assert!(LandmarkSet::from_flat(&flat).is_err());

        let mut flat = flat_zeros();
        flat[0] = f32::INFINITY;
        assert!(LandmarkSet::from_flat(&flat).is_err());
    }

    #[test]
    fn test_rejects_far_out_of_bounds() {
        let mut flat = flat_zeros();
        flat[3] = 7.5;
        assert!(LandmarkSet::from_flat(&flat).is_err());
    }

    #[test]
    fn test_accepts_slight_overshoot() {
        let mut flat = flat_zeros();
        flat[3] = -0.05;
        flat[4] = 1.02;
        assert!(LandmarkSet::from_flat(&flat).is_ok());
    }

    #[test]
    fn test_index_tip_accessor() {
        let mut flat = flat_zeros();
        flat[INDEX_TIP * 3] = 0.25;
        flat[INDEX_TIP * 3 + 1] = 0.75;
        let set = LandmarkSet::from_flat(&flat).unwrap();
        assert_eq!(set.index_tip().x, 0.25);
        assert_eq!(set.index_tip().y, 0.75);
    }
}
