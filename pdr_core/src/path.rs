//! Ground-truth reference path with fractional-position lookup.

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// One surveyed waypoint. `step` orders the path; the values need not be
/// contiguous, only their relative order matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthPoint {
    pub step: i64,
    pub x: f64,
    pub y: f64,
}

/// Step-ordered waypoint sequence. Sorted once at construction and immutable
/// afterwards; every lookup works on fractional progress, never on literal
/// `step` values.
#[derive(Debug, Clone)]
pub struct GroundTruthPath {
    points: Vec<GroundTruthPoint>,
}

impl GroundTruthPath {
    /// Build from an unordered set of waypoints. Rejects the empty set:
    /// `position_at` has no meaning without at least one point.
    pub fn new(mut points: Vec<GroundTruthPoint>) -> Result<Self, BuildError> {
        if points.is_empty() {
            return Err(BuildError::EmptyGroundTruth);
        }
        points.sort_by_key(|p| p.step);
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        // Non-empty by construction.
        false
    }

    pub fn points(&self) -> &[GroundTruthPoint] {
        &self.points
    }

    /// Reference position at fractional progress `percent` (0.0 = first
    /// waypoint, 1.0 = last). Values outside [0, 1] clamp to the endpoints.
    /// In between, the position interpolates linearly on the segment
    /// containing `percent`. A single-point path returns its one point for
    /// any input.
    pub fn position_at(&self, percent: f64) -> (f64, f64) {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if self.points.len() == 1 {
            return (first.x, first.y);
        }
        if percent <= 0.0 {
            return (first.x, first.y);
        }
        if percent >= 1.0 {
            return (last.x, last.y);
        }

        // percent < 1 keeps index <= n-1 in exact arithmetic; the clamp guards
        // the rounded product.
        let n = (self.points.len() - 1) as f64;
        let index = ((percent * n) as usize).min(self.points.len() - 2);
        let t = percent * n - index as f64;
        let a = self.points[index];
        let b = self.points[index + 1];
        (t * b.x + (1.0 - t) * a.x, t * b.y + (1.0 - t) * a.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(step: i64, x: f64, y: f64) -> GroundTruthPoint {
        GroundTruthPoint { step, x, y }
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(
            GroundTruthPath::new(vec![]),
            Err(BuildError::EmptyGroundTruth)
        ));
    }

    #[test]
    fn single_point_ignores_percent() {
        let path = GroundTruthPath::new(vec![pt(7, 2.5, -3.0)]).unwrap();
        for p in [-1e9, -1.0, 0.0, 0.3, 1.0, 42.0, f64::INFINITY] {
            assert_eq!(path.position_at(p), (2.5, -3.0));
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let path =
            GroundTruthPath::new(vec![pt(0, 1.0, 2.0), pt(1, 3.0, 4.0), pt(2, 5.0, 0.0)]).unwrap();
        assert_eq!(path.position_at(0.0), (1.0, 2.0));
        assert_eq!(path.position_at(1.0), (5.0, 0.0));
        // Out of range clamps, not extrapolates.
        assert_eq!(path.position_at(-0.5), (1.0, 2.0));
        assert_eq!(path.position_at(2.0), (5.0, 0.0));
    }

    #[test]
    fn interpolates_within_segments() {
        let path = GroundTruthPath::new(vec![pt(0, 0.0, 0.0), pt(1, 0.0, 10.0)]).unwrap();
        let (x, y) = path.position_at(0.6);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 6.0);

        // Three points: percent 0.75 lands midway through the second segment.
        let path =
            GroundTruthPath::new(vec![pt(0, 0.0, 0.0), pt(1, 4.0, 0.0), pt(2, 4.0, 8.0)]).unwrap();
        let (x, y) = path.position_at(0.75);
        assert_relative_eq!(x, 4.0);
        assert_relative_eq!(y, 4.0);
    }

    #[test]
    fn segment_boundaries_are_continuous() {
        let path =
            GroundTruthPath::new(vec![pt(0, 0.0, 0.0), pt(1, 2.0, 2.0), pt(2, 6.0, -2.0)]).unwrap();
        let eps = 1e-12;
        let (xl, yl) = path.position_at(0.5 - eps);
        let (xr, yr) = path.position_at(0.5 + eps);
        assert_relative_eq!(xl, xr, epsilon = 1e-9);
        assert_relative_eq!(yl, yr, epsilon = 1e-9);
    }

    #[test]
    fn construction_sorts_by_step() {
        let path =
            GroundTruthPath::new(vec![pt(10, 5.0, 5.0), pt(-3, 0.0, 0.0), pt(4, 2.0, 2.0)])
                .unwrap();
        let steps: Vec<i64> = path.points().iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![-3, 4, 10]);
        assert_eq!(path.position_at(0.0), (0.0, 0.0));
        assert_eq!(path.position_at(1.0), (5.0, 5.0));
    }

    #[test]
    fn non_contiguous_steps_only_order_matters() {
        // Same geometry under wildly different step numbering.
        let a = GroundTruthPath::new(vec![pt(0, 0.0, 0.0), pt(1, 1.0, 1.0)]).unwrap();
        let b = GroundTruthPath::new(vec![pt(100, 0.0, 0.0), pt(9000, 1.0, 1.0)]).unwrap();
        assert_eq!(a.position_at(0.25), b.position_at(0.25));
    }
}
