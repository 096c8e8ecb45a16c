// Report files: per-season JSON and CSV, merged team pages, usage shares.
//
// All floating-point numbers are rounded to 2 decimals on the way out.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use benchwarmer_football::mismanagement::TeamSeasonSummary;
use benchwarmer_football::standings::TeamHistory;

use crate::pipeline::{SeasonReport, UsageReport};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round every float in a JSON tree to 2 decimals. Integers are untouched.
pub fn round_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(rounded) = n
                .as_f64()
                .map(round2)
                .and_then(serde_json::Number::from_f64)
            {
                *n = rounded;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(round_floats),
        Value::Object(map) => map.values_mut().for_each(round_floats),
        _ => {}
    }
}

/// One row of the mismanagement CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismanagementRow {
    pub rank: usize,
    pub team: String,
    pub owner: String,
    pub optimal: f64,
    pub actual: f64,
    pub mismanagement: f64,
    pub percentage: f64,
}

/// CSV rows in ranking order, rank starting at 1.
pub fn mismanagement_rows(rankings: &[TeamSeasonSummary]) -> Vec<MismanagementRow> {
    rankings
        .iter()
        .enumerate()
        .map(|(i, s)| MismanagementRow {
            rank: i + 1,
            team: s.team_name.clone(),
            owner: s.owner.clone(),
            optimal: round2(s.total_optimal_points),
            actual: round2(s.total_actual_points),
            mismanagement: round2(s.total_mismanagement),
            percentage: round2(s.percentage_scored),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|e| ReportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), ReportError> {
    let mut value = serde_json::to_value(data)?;
    round_floats(&mut value);
    let text = serde_json::to_string_pretty(&value)?;
    fs::write(path, text).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn write_mismanagement_csv(path: &Path, rankings: &[TeamSeasonSummary]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in mismanagement_rows(rankings) {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Write `data-{season}.json` and `mismanagement-{season}.csv`.
pub fn write_season_report(report: &SeasonReport, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    ensure_dir(dir)?;

    let json_path = dir.join(format!("data-{}.json", report.season));
    write_json(&json_path, report)?;

    let csv_path = dir.join(format!("mismanagement-{}.csv", report.season));
    write_mismanagement_csv(&csv_path, &report.mismanagement)?;

    Ok(vec![json_path, csv_path])
}

/// Write `usage-{season}.json`.
pub fn write_usage_report(report: &UsageReport, dir: &Path) -> Result<PathBuf, ReportError> {
    ensure_dir(dir)?;
    let path = dir.join(format!("usage-{}.json", report.season));
    write_json(&path, report)?;
    Ok(path)
}

/// Write `teams.json`.
pub fn write_team_histories(histories: &[TeamHistory], dir: &Path) -> Result<PathBuf, ReportError> {
    ensure_dir(dir)?;
    let path = dir.join("teams.json");
    write_json(&path, &histories)?;
    Ok(path)
}
