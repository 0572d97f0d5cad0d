//! Trajectory scoring against the ground-truth path.
//!
//! Every aggregate here is a plain unnormalized sum: a longer or
//! more-stepped run contributes more total error, which is what the
//! calibration objective wants. Summation is left-to-right and sequential;
//! any future parallel reduction would be a documented source of last-ulp
//! floating-point nondeterminism.

use crate::config::{ModelCfg, PoseCfg};
use crate::engine;
use crate::path::GroundTruthPath;
use crate::types::{InertialSample, StepParams, TrajectoryPoint};

/// Euclidean deviation of `(x, y)` from the reference position at fractional
/// progress `percent`.
pub fn point_error(path: &GroundTruthPath, x: f64, y: f64, percent: f64) -> f64 {
    let (rx, ry) = path.position_at(percent);
    (x - rx).hypot(y - ry)
}

/// Total deviation of one traced run.
pub fn sequence_error(trajectory: &[TrajectoryPoint]) -> f64 {
    trajectory.iter().map(|p| p.error).sum()
}

/// Total deviation of a batch of runs traced under `params`. Pure: the
/// parameter pair is taken by value and no engine state is involved, so
/// perturbed probes can run in any order against the same batch.
pub fn batch_error(
    params: StepParams,
    model: &ModelCfg,
    pose: &PoseCfg,
    path: &GroundTruthPath,
    batches: &[Vec<InertialSample>],
) -> f64 {
    batches
        .iter()
        .map(|run| sequence_error(&engine::trace_with(params, model, pose, path, run)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::GroundTruthPoint;
    use approx::assert_relative_eq;

    fn line_path() -> GroundTruthPath {
        GroundTruthPath::new(vec![
            GroundTruthPoint {
                step: 0,
                x: 0.0,
                y: 0.0,
            },
            GroundTruthPoint {
                step: 1,
                x: 0.0,
                y: 10.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn point_error_is_euclidean() {
        let path = line_path();
        // Reference at percent 0.5 is (0, 5); deviation of (3, 1) is 5.
        assert_relative_eq!(point_error(&path, 3.0, 1.0, 0.5), 5.0);
        assert_relative_eq!(point_error(&path, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn sequence_error_sums_without_normalizing() {
        let sample = crate::types::InertialSample {
            accx: 0.0,
            accy: 0.0,
            accz: 0.0,
            gyrox: 0.0,
            gyroy: 0.0,
            gyroz: 0.0,
            timestamp_ms: 0,
        };
        let mk = |error: f64| TrajectoryPoint {
            sample,
            x: 0.0,
            y: 0.0,
            theta_deg: 0.0,
            error,
        };
        let traj = vec![mk(0.0), mk(1.5), mk(2.5)];
        assert_relative_eq!(sequence_error(&traj), 4.0);
        assert_relative_eq!(sequence_error(&[]), 0.0);
    }

    #[test]
    fn batch_error_sums_over_runs() {
        let path = line_path();
        let params = StepParams { k: 1.2, m: 0.0 };
        let model = ModelCfg::default();
        let pose = PoseCfg::default();

        let run: Vec<_> = (0..20)
            .map(|i| crate::types::InertialSample {
                accx: 0.1,
                accy: 0.0,
                accz: if i % 5 == 2 { 2000.0 } else { 100.0 },
                gyrox: 0.0,
                gyroy: 0.0,
                gyroz: 0.0,
                timestamp_ms: i * 20,
            })
            .collect();

        let one = batch_error(params, &model, &pose, &path, &[run.clone()]);
        let two = batch_error(params, &model, &pose, &path, &[run.clone(), run]);
        assert!(one > 0.0);
        assert_relative_eq!(two, 2.0 * one, epsilon = 1e-9);
    }
}
