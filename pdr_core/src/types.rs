//! Data records flowing through the engine.

use serde::{Deserialize, Serialize};

/// One raw inertial measurement: accelerometer and gyroscope triplets in
/// device units, stamped in milliseconds. The engine assumes strictly
/// increasing timestamps within a run; it does not enforce them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialSample {
    pub accx: f64,
    pub accy: f64,
    pub accz: f64,
    pub gyrox: f64,
    pub gyroy: f64,
    pub gyroz: f64,
    pub timestamp_ms: i64,
}

impl InertialSample {
    /// Accelerometer vector norm.
    pub fn acc_norm(&self) -> f64 {
        (self.accx * self.accx + self.accy * self.accy + self.accz * self.accz).sqrt()
    }

    /// Dot product of the accelerometer and gyroscope vectors. Projecting the
    /// angular rate onto the acceleration direction is what drives the
    /// heading correction.
    pub fn acc_gyro_dot(&self) -> f64 {
        self.accx * self.gyrox + self.accy * self.gyroy + self.accz * self.gyroz
    }
}

/// The two calibratable coefficients: step-length gain `k` and
/// heading-correction gain `m`.
///
/// Always passed by value into evaluations so a perturbed probe can never
/// alias the canonical pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    pub k: f64,
    pub m: f64,
}

/// One trajectory fix: the source sample plus the pose reached at that sample
/// and its scored deviation from the reference path.
///
/// `theta_deg` is the running heading in degrees, deliberately unbounded (not
/// wrapped to [0, 360)); the trigonometry downstream is periodic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    #[serde(flatten)]
    pub sample: InertialSample,
    pub x: f64,
    pub y: f64,
    pub theta_deg: f64,
    pub error: f64,
}
