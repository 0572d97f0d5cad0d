//! The engine proper: a single left-to-right pass that integrates heading,
//! detects footsteps from the vertical-acceleration excursion, and assembles
//! the trajectory.

use crate::config::{ModelCfg, PoseCfg, TrainingCfg};
use crate::error::BuildError;
use crate::path::{GroundTruthPath, GroundTruthPoint};
use crate::score;
use crate::train;
use crate::types::{InertialSample, StepParams, TrajectoryPoint};

/// Half-width of the peak-detection window: a footstep is a strict local
/// maximum of `accz` against the two samples on either side. The trace loop
/// bound and the ground-truth percent mapping both assume this margin; it is
/// a constant, not runtime config.
pub(crate) const PEAK_MARGIN: usize = 2;

/// Shortest run for which the detection loop executes at all. Anything
/// shorter yields the initial pose and nothing else.
const MIN_DETECT_LEN: usize = 5;

/// Calibratable dead-reckoning engine bound to one ground-truth path.
///
/// `trace` is read-only and reusable; only `fit` (or `predict` with training
/// enabled) mutates the parameter pair, after all probe evaluations of an
/// epoch have completed.
pub struct PdrEngine {
    params: StepParams,
    path: GroundTruthPath,
    model: ModelCfg,
    pose: PoseCfg,
    training: Option<TrainingCfg>,
    train_enabled: bool,
    training_batches: Vec<Vec<InertialSample>>,
}

impl PdrEngine {
    /// Start building an engine.
    pub fn builder() -> PdrEngineBuilder {
        PdrEngineBuilder::default()
    }

    /// Current parameter pair (the post-calibration values once training has
    /// run).
    pub fn params(&self) -> StepParams {
        self.params
    }

    pub fn ground_truth(&self) -> &GroundTruthPath {
        &self.path
    }

    /// Calibrate if fully configured, then run inference on `samples`.
    pub fn predict(&mut self, samples: &[InertialSample]) -> Vec<TrajectoryPoint> {
        self.fit();
        self.trace(samples)
    }

    /// Run calibration now. No-op unless training is enabled, a complete
    /// `TrainingCfg` is attached, and at least one training batch exists.
    /// Returns the (possibly updated) parameter pair.
    pub fn fit(&mut self) -> StepParams {
        if !self.train_enabled || self.training_batches.is_empty() {
            return self.params;
        }
        let Some(cfg) = &self.training else {
            return self.params;
        };
        self.params = train::descend(
            self.params,
            cfg,
            &self.model,
            &self.pose,
            &self.path,
            &self.training_batches,
        );
        self.params
    }

    /// Reconstruct the trajectory for one run with the engine's current
    /// parameters. Pure with respect to the engine: no state is touched.
    pub fn trace(&self, samples: &[InertialSample]) -> Vec<TrajectoryPoint> {
        trace_with(self.params, &self.model, &self.pose, &self.path, samples)
    }

    /// Total deviation of a batch of runs under the engine's current
    /// parameters.
    pub fn batch_error(&self, batches: &[Vec<InertialSample>]) -> f64 {
        score::batch_error(self.params, &self.model, &self.pose, &self.path, batches)
    }
}

/// The trace pass as a pure function: every input passed in, nothing shared,
/// nothing mutated. Calibration probes call this with perturbed by-value
/// `params`, which makes the three per-epoch evaluations independent.
pub(crate) fn trace_with(
    params: StepParams,
    model: &ModelCfg,
    pose: &PoseCfg,
    path: &GroundTruthPath,
    samples: &[InertialSample],
) -> Vec<TrajectoryPoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut x = pose.x;
    let mut y = pose.y;
    let mut theta = pose.theta_deg;
    let mut accz_min = samples[0].accz;
    let mut accz_max = samples[0].accz;

    out.push(TrajectoryPoint {
        sample: samples[0],
        x,
        y,
        theta_deg: theta,
        error: 0.0,
    });

    if samples.len() < MIN_DETECT_LEN {
        return out;
    }

    let n = samples.len();
    // The last two samples are never visited: the forward-looking half of the
    // peak window needs two samples ahead of the candidate.
    for i in 1..n - PEAK_MARGIN {
        let s = samples[i];
        accz_min = accz_min.min(s.accz);
        accz_max = accz_max.max(s.accz);

        // Heading correction: project the angular rate onto the acceleration
        // direction and integrate over the sample interval. An all-zero
        // accelerometer reading leaves the projection undefined; skip it.
        let a = s.acc_norm();
        if a > 0.0 {
            let dt = (s.timestamp_ms - samples[i - 1].timestamp_ms) as f64 / 1000.0;
            theta -= params.m * s.acc_gyro_dot() / a * dt;
        }

        // A footstep is a strict local maximum of accz over the 5-sample
        // window centered on i.
        if i >= PEAK_MARGIN
            && s.accz > samples[i - 1].accz
            && s.accz > samples[i - 2].accz
            && s.accz > samples[i + 1].accz
            && s.accz > samples[i + 2].accz
        {
            let excursion = (accz_max - accz_min) * model.excursion_gain / model.accel_full_scale;
            let length = params.k * excursion.powf(model.step_exponent);

            // y before x, both from the same heading value.
            let (sin_t, cos_t) = theta.to_radians().sin_cos();
            y += length * cos_t;
            x += length * sin_t;

            let percent = i as f64 / (n - 1) as f64;
            let error = score::point_error(path, x, y, percent);

            out.push(TrajectoryPoint {
                sample: s,
                x,
                y,
                theta_deg: theta,
                error,
            });

            accz_max = s.accz;
            accz_min = s.accz;
        }
    }

    out
}

/// Builder for `PdrEngine`. All inputs are validated on `build()`.
#[derive(Default)]
pub struct PdrEngineBuilder {
    k: Option<f64>,
    m: Option<f64>,
    waypoints: Vec<GroundTruthPoint>,
    model: Option<ModelCfg>,
    pose: Option<PoseCfg>,
    training: Option<TrainingCfg>,
    train_enabled: bool,
    training_batches: Vec<Vec<InertialSample>>,
}

impl PdrEngineBuilder {
    /// Set the step-length and heading-correction coefficients.
    pub fn with_params(mut self, k: f64, m: f64) -> Self {
        self.k = Some(k);
        self.m = Some(m);
        self
    }

    /// Provide the ground-truth waypoints (any order; sorted at build).
    pub fn with_ground_truth(mut self, waypoints: Vec<GroundTruthPoint>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Override the sensor/model constants.
    pub fn with_model(mut self, model: ModelCfg) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the initial pose.
    pub fn with_pose(mut self, pose: PoseCfg) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Attach gradient-descent hyperparameters.
    pub fn with_training(mut self, training: TrainingCfg) -> Self {
        self.training = Some(training);
        self
    }

    /// Attach the training batches used by calibration.
    pub fn with_training_batches(mut self, batches: Vec<Vec<InertialSample>>) -> Self {
        self.training_batches = batches;
        self
    }

    /// Enable or disable calibration. Even when enabled, calibration is a
    /// no-op until a complete `TrainingCfg` and at least one batch are
    /// attached.
    pub fn train(mut self, enabled: bool) -> Self {
        self.train_enabled = enabled;
        self
    }

    /// Validate and construct the engine.
    pub fn build(self) -> Result<PdrEngine, BuildError> {
        let k = self.k.ok_or(BuildError::MissingK)?;
        let m = self.m.ok_or(BuildError::MissingM)?;
        if !k.is_finite() {
            return Err(BuildError::InvalidConfig("k must be finite"));
        }
        if !m.is_finite() {
            return Err(BuildError::InvalidConfig("m must be finite"));
        }

        let model = self.model.unwrap_or_default();
        if !(model.accel_full_scale.is_finite() && model.accel_full_scale > 0.0) {
            return Err(BuildError::InvalidConfig("accel_full_scale must be > 0"));
        }
        if !(model.excursion_gain.is_finite() && model.excursion_gain > 0.0) {
            return Err(BuildError::InvalidConfig("excursion_gain must be > 0"));
        }
        if !(model.step_exponent.is_finite() && model.step_exponent > 0.0) {
            return Err(BuildError::InvalidConfig("step_exponent must be > 0"));
        }

        let pose = self.pose.unwrap_or_default();
        if !(pose.x.is_finite() && pose.y.is_finite() && pose.theta_deg.is_finite()) {
            return Err(BuildError::InvalidConfig("initial pose must be finite"));
        }

        if self.train_enabled
            && let Some(t) = &self.training
        {
            if !(t.dk.is_finite() && t.dk != 0.0) {
                return Err(BuildError::InvalidConfig("dk must be nonzero"));
            }
            if !(t.dm.is_finite() && t.dm != 0.0) {
                return Err(BuildError::InvalidConfig("dm must be nonzero"));
            }
            if !(t.eta.is_finite() && t.eta > 0.0) {
                return Err(BuildError::InvalidConfig("eta must be > 0"));
            }
            if t.epochs == 0 {
                return Err(BuildError::InvalidConfig("epochs must be >= 1"));
            }
        }

        let path = GroundTruthPath::new(self.waypoints)?;

        Ok(PdrEngine {
            params: StepParams { k, m },
            path,
            model,
            pose,
            training: self.training,
            train_enabled: self.train_enabled,
            training_batches: self.training_batches,
        })
    }
}
