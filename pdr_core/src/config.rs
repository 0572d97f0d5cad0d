//! Runtime configuration for the engine.
//!
//! These are the structs the engine computes with. They are separate from the
//! TOML-deserialized schema in `pdr_config`; the CLI converts between the two.

/// Sensor and step-length model constants.
///
/// The defaults match the capture hardware of the reference dataset: a ±2 g
/// accelerometer with 16384 counts per g, and a fixed unit-scaling gain on
/// the vertical excursion. Named here so other full-scale ranges can be
/// dropped in without touching the trace.
#[derive(Debug, Clone)]
pub struct ModelCfg {
    /// Accelerometer full-scale normalization divisor (raw counts).
    pub accel_full_scale: f64,
    /// Unit-scaling gain applied to the vertical-acceleration excursion.
    pub excursion_gain: f64,
    /// Exponent of the excursion-to-length relation. The quarter power is the
    /// Weinberg step-length model: smooth and monotonic, so the
    /// finite-difference calibration behaves.
    pub step_exponent: f64,
}

impl Default for ModelCfg {
    fn default() -> Self {
        Self {
            accel_full_scale: 16384.0,
            excursion_gain: 10.0,
            step_exponent: 0.25,
        }
    }
}

/// Initial pose emitted as the first trajectory point of every run.
#[derive(Debug, Clone)]
pub struct PoseCfg {
    pub x: f64,
    pub y: f64,
    /// Initial heading in degrees.
    pub theta_deg: f64,
}

impl Default for PoseCfg {
    fn default() -> Self {
        Self {
            x: -1.0,
            y: 3.4,
            theta_deg: 180.0,
        }
    }
}

/// Gradient-descent hyperparameters. Calibration runs only when a complete
/// set is attached to the engine and training is enabled.
#[derive(Debug, Clone)]
pub struct TrainingCfg {
    /// Finite-difference step for `k`. Must be nonzero.
    pub dk: f64,
    /// Finite-difference step for `m`. Must be nonzero.
    pub dm: f64,
    /// Learning rate. A large value can make the descent oscillate or
    /// diverge; there is no guard, the caller owns the choice.
    pub eta: f64,
    /// Fixed epoch count; no convergence check or early stopping.
    pub epochs: usize,
}

impl Default for TrainingCfg {
    fn default() -> Self {
        Self {
            dk: 0.01,
            dm: 0.01,
            eta: 1e-4,
            epochs: 10,
        }
    }
}
