//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "pdr", version, about = "Pedestrian dead-reckoning CLI")]
pub struct Cli {
    /// Path to config TOML (falls back to ./pdr.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Inertial run CSV (strict header) holding the run to predict
    #[arg(long, value_name = "FILE")]
    pub samples: PathBuf,

    /// Ground-truth waypoint CSV (strict header)
    #[arg(long = "ground-truth", value_name = "FILE")]
    pub ground_truth: PathBuf,

    /// Capture batch to predict and to select waypoints by
    #[arg(long, value_name = "ID")]
    pub batch: Option<i64>,

    /// Training-run CSV; every batch in it joins the training set
    #[arg(long = "train-data", value_name = "FILE")]
    pub train_data: Option<PathBuf>,

    /// Force calibration on regardless of the config
    #[arg(long, action = ArgAction::SetTrue)]
    pub train: bool,

    /// Override engine.k from the config
    #[arg(long, value_name = "K", allow_hyphen_values = true)]
    pub k: Option<f64>,

    /// Override engine.m from the config
    #[arg(long, value_name = "M", allow_hyphen_values = true)]
    pub m: Option<f64>,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}
