//! Row-to-engine conversions and batch selection.

use eyre::bail;
use pdr_config::{RunRow, WaypointRow};
use pdr_core::{GroundTruthPoint, InertialSample};

pub fn to_sample(row: RunRow) -> InertialSample {
    InertialSample {
        accx: row.accx,
        accy: row.accy,
        accz: row.accz,
        gyrox: row.gyrox,
        gyroy: row.gyroy,
        gyroz: row.gyroz,
        timestamp_ms: row.timestamp,
    }
}

pub fn to_waypoint(row: WaypointRow) -> GroundTruthPoint {
    GroundTruthPoint {
        step: row.step,
        x: row.x,
        y: row.y,
    }
}

/// Pick the run to predict from a multi-batch CSV. With an explicit batch id
/// the matching batch must exist; without one the file must hold exactly one
/// batch, so the choice is never silent.
pub fn select_run(rows: Vec<RunRow>, batch: Option<i64>) -> eyre::Result<Vec<InertialSample>> {
    let batches = pdr_config::split_batches(rows);
    let chosen = match batch {
        Some(id) => batches
            .into_iter()
            .find(|b| b.first().map(|r| r.batch) == Some(id))
            .ok_or_else(|| eyre::eyre!("runs CSV has no batch {id}"))?,
        None => {
            if batches.is_empty() {
                bail!("runs CSV contains no samples");
            }
            if batches.len() > 1 {
                bail!(
                    "runs CSV contains {} batches; select one with --batch",
                    batches.len()
                );
            }
            batches.into_iter().next().unwrap_or_default()
        }
    };
    Ok(chosen.into_iter().map(to_sample).collect())
}

/// All batches of a training CSV, each converted to a sample sequence.
pub fn training_batches(rows: Vec<RunRow>) -> Vec<Vec<InertialSample>> {
    pdr_config::split_batches(rows)
        .into_iter()
        .map(|b| b.into_iter().map(to_sample).collect())
        .collect()
}

/// Waypoints for one path. With an explicit batch id, only that batch; the
/// filter must leave something behind. Without one, the file must not mix
/// batches.
pub fn select_waypoints(
    rows: Vec<WaypointRow>,
    batch: Option<i64>,
) -> eyre::Result<Vec<GroundTruthPoint>> {
    let picked: Vec<WaypointRow> = match batch {
        Some(id) => rows.into_iter().filter(|r| r.batch == id).collect(),
        None => {
            let mut ids: Vec<i64> = rows.iter().map(|r| r.batch).collect();
            ids.sort_unstable();
            ids.dedup();
            if ids.len() > 1 {
                bail!(
                    "waypoints CSV mixes {} batches; select one with --batch",
                    ids.len()
                );
            }
            rows
        }
    };
    if picked.is_empty() {
        bail!("no ground-truth waypoints for the requested batch");
    }
    Ok(picked.into_iter().map(to_waypoint).collect())
}
