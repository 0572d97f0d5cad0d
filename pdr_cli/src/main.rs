//! `pdr` binary: load config + CSVs, build the engine, optionally calibrate,
//! and emit the predicted trajectory as JSON lines on stdout. Logs go to
//! stderr (and optionally a JSON file) so stdout stays machine-readable.

mod cli;
mod ingest;
mod logging;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing::{info, warn};

use pdr_core::PdrEngine;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();

    let cfg = load_config(&args)?;
    let default_logging = pdr_config::Logging::default();
    let log_cfg = cfg.as_ref().map_or(&default_logging, |c| &c.logging);
    logging::init(&args.log_level, log_cfg);

    let k = args
        .k
        .or(cfg.as_ref().map(|c| c.engine.k))
        .ok_or_else(|| eyre::eyre!("k is required: set engine.k in the config or pass --k"))?;
    let m = args
        .m
        .or(cfg.as_ref().map(|c| c.engine.m))
        .ok_or_else(|| eyre::eyre!("m is required: set engine.m in the config or pass --m"))?;

    let (model, pose, training) = engine_cfgs(cfg.as_ref());
    let train_enabled = args.train || cfg.as_ref().is_some_and(|c| c.training.enabled);

    let waypoint_rows = pdr_config::load_waypoints_csv(&args.ground_truth)
        .wrap_err("loading ground-truth waypoints")?;
    let waypoints = ingest::select_waypoints(waypoint_rows, args.batch)?;

    let run_rows = pdr_config::load_runs_csv(&args.samples).wrap_err("loading inertial run")?;
    let run = ingest::select_run(run_rows, args.batch)?;

    let batches = match &args.train_data {
        Some(p) => {
            ingest::training_batches(pdr_config::load_runs_csv(p).wrap_err("loading training data")?)
        }
        None => Vec::new(),
    };
    if train_enabled && batches.is_empty() {
        warn!("training enabled but no training data attached; calibration will be skipped");
    }

    let mut engine = PdrEngine::builder()
        .with_params(k, m)
        .with_ground_truth(waypoints)
        .with_model(model)
        .with_pose(pose)
        .with_training(training)
        .with_training_batches(batches)
        .train(train_enabled)
        .build()?;

    let trajectory = engine.predict(&run);

    let mut stdout = std::io::stdout().lock();
    for point in &trajectory {
        let line = serde_json::to_string(point).wrap_err("serialize trajectory point")?;
        writeln!(stdout, "{line}").wrap_err("write trajectory")?;
    }

    let params = engine.params();
    info!(
        samples = run.len(),
        steps = trajectory.len().saturating_sub(1),
        total_error = pdr_core::score::sequence_error(&trajectory),
        k = params.k,
        m = params.m,
        "prediction complete"
    );
    Ok(())
}

/// Explicit path must parse; otherwise `./pdr.toml` is picked up when
/// present, and no config at all falls back to built-in defaults plus the
/// `--k`/`--m` flags.
fn load_config(args: &cli::Cli) -> Result<Option<pdr_config::Config>> {
    let path = match &args.config {
        Some(p) => p.clone(),
        None => {
            let fallback = Path::new("pdr.toml");
            if !fallback.exists() {
                return Ok(None);
            }
            fallback.to_path_buf()
        }
    };
    let text = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("read config file {}", path.display()))?;
    let cfg = pdr_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?;
    cfg.validate()
        .wrap_err_with(|| format!("validate config {}", path.display()))?;
    Ok(Some(cfg))
}

fn engine_cfgs(
    cfg: Option<&pdr_config::Config>,
) -> (pdr_core::ModelCfg, pdr_core::PoseCfg, pdr_core::TrainingCfg) {
    match cfg {
        Some(c) => (
            pdr_core::ModelCfg {
                accel_full_scale: c.model.accel_full_scale,
                excursion_gain: c.model.excursion_gain,
                step_exponent: c.model.step_exponent,
            },
            pdr_core::PoseCfg {
                x: c.pose.x,
                y: c.pose.y,
                theta_deg: c.pose.theta_deg,
            },
            pdr_core::TrainingCfg {
                dk: c.training.dk,
                dm: c.training.dm,
                eta: c.training.eta,
                epochs: c.training.epochs,
            },
        ),
        None => (
            pdr_core::ModelCfg::default(),
            pdr_core::PoseCfg::default(),
            pdr_core::TrainingCfg::default(),
        ),
    }
}
