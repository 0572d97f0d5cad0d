#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and data-file parsing for the PDR system.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - CSV loaders for inertial runs and ground-truth waypoints enforce exact
//!   headers and report malformed rows by line number.
//! - Batch handling: runs and waypoints carry a capture-batch identifier;
//!   `split_batches` regroups a flat row set into per-batch, time-ordered
//!   sample sequences.

use serde::Deserialize;

/// Inertial run CSV schema.
///
/// Expected headers:
/// batch,timestamp,accx,accy,accz,gyrox,gyroy,gyroz
///
/// Example:
/// batch,timestamp,accx,accy,accz,gyrox,gyroy,gyroz
/// 1,1677062400000,-112.0,34.5,16201.0,0.01,-0.02,0.15
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RunRow {
    pub batch: i64,
    pub timestamp: i64,
    pub accx: f64,
    pub accy: f64,
    pub accz: f64,
    pub gyrox: f64,
    pub gyroy: f64,
    pub gyroz: f64,
}

/// Ground-truth waypoint CSV schema.
///
/// Expected headers:
/// batch,step,x,y
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WaypointRow {
    pub batch: i64,
    pub step: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct EngineCfg {
    /// Step-length coefficient.
    pub k: f64,
    /// Heading-correction coefficient.
    pub m: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelCfg {
    /// Accelerometer full-scale normalization divisor (raw counts).
    pub accel_full_scale: f64,
    /// Unit-scaling gain on the vertical-acceleration excursion.
    pub excursion_gain: f64,
    /// Exponent of the excursion-to-length relation.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PoseCfg {
    pub x: f64,
    pub y: f64,
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrainingCfg {
    /// Run gradient descent before inference.
    pub enabled: bool,
    /// Finite-difference step for `k`.
    pub dk: f64,
    /// Finite-difference step for `m`.
    pub dm: f64,
    /// Learning rate.
    pub eta: f64,
    /// Fixed epoch count.
    pub epochs: usize,
}

impl Default for TrainingCfg {
    fn default() -> Self {
        Self {
            enabled: false,
            dk: 0.01,
            dm: 0.01,
            eta: 1e-4,
            epochs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub engine: EngineCfg,
    #[serde(default)]
    pub model: ModelCfg,
    #[serde(default)]
    pub pose: PoseCfg,
    #[serde(default)]
    pub training: TrainingCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Engine
        if !self.engine.k.is_finite() {
            eyre::bail!("engine.k must be finite");
        }
        if !self.engine.m.is_finite() {
            eyre::bail!("engine.m must be finite");
        }

        // Model
        if !(self.model.accel_full_scale.is_finite() && self.model.accel_full_scale > 0.0) {
            eyre::bail!("model.accel_full_scale must be > 0");
        }
        if !(self.model.excursion_gain.is_finite() && self.model.excursion_gain > 0.0) {
            eyre::bail!("model.excursion_gain must be > 0");
        }
        if !(self.model.step_exponent.is_finite() && self.model.step_exponent > 0.0) {
            eyre::bail!("model.step_exponent must be > 0");
        }

        // Pose
        if !(self.pose.x.is_finite() && self.pose.y.is_finite() && self.pose.theta_deg.is_finite())
        {
            eyre::bail!("pose values must be finite");
        }

        // Training
        if self.training.enabled {
            if !(self.training.dk.is_finite() && self.training.dk != 0.0) {
                eyre::bail!("training.dk must be nonzero");
            }
            if !(self.training.dm.is_finite() && self.training.dm != 0.0) {
                eyre::bail!("training.dm must be nonzero");
            }
            if !(self.training.eta.is_finite() && self.training.eta > 0.0) {
                eyre::bail!("training.eta must be > 0");
            }
            if self.training.epochs == 0 {
                eyre::bail!("training.epochs must be >= 1");
            }
            if self.training.epochs > 1_000_000 {
                eyre::bail!("training.epochs is unreasonably large (>1e6)");
            }
        }

        // Logging
        if let Some(rot) = &self.logging.rotation
            && !matches!(rot.as_str(), "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

fn check_headers(
    rdr: &mut csv::Reader<std::fs::File>,
    path: &std::path::Path,
    expected: &[&str],
    what: &str,
) -> eyre::Result<()> {
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "{} CSV must have headers '{}', got: {}",
            what,
            expected.join(","),
            actual.join(",")
        );
    }
    Ok(())
}

/// Load an inertial-run CSV. Enforces the exact header row and reports the
/// first malformed record by line number.
pub fn load_runs_csv(path: &std::path::Path) -> eyre::Result<Vec<RunRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open runs CSV {:?}: {}", path, e))?;

    check_headers(
        &mut rdr,
        path,
        &[
            "batch", "timestamp", "accx", "accy", "accz", "gyrox", "gyroy", "gyroz",
        ],
        "runs",
    )?;

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<RunRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

/// Load a ground-truth waypoint CSV. Same header discipline as the run
/// loader.
pub fn load_waypoints_csv(path: &std::path::Path) -> eyre::Result<Vec<WaypointRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open waypoints CSV {:?}: {}", path, e))?;

    check_headers(&mut rdr, path, &["batch", "step", "x", "y"], "waypoints")?;

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<WaypointRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

/// Group run rows into per-batch sample sequences. Batches keep first-seen
/// order; rows within a batch are sorted by timestamp ascending, which is the
/// ordering the engine assumes.
pub fn split_batches(rows: Vec<RunRow>) -> Vec<Vec<RunRow>> {
    let mut order: Vec<i64> = Vec::new();
    let mut groups: Vec<Vec<RunRow>> = Vec::new();
    for row in rows {
        match order.iter().position(|&b| b == row.batch) {
            Some(i) => groups[i].push(row),
            None => {
                order.push(row.batch);
                groups.push(vec![row]);
            }
        }
    }
    for g in &mut groups {
        g.sort_by_key(|r| r.timestamp);
    }
    groups
}
