//! Tracing persistence
//!
//! A tracing is saved as a JSON record holding the placed landmarks and the
//! calibration scalar:
//!
//! ```json
//! { "points": { "S": { "x": 300.0, "y": 300.0 } }, "mmPerPixel": 0.1 }
//! ```
//!
//! Records are validated before anything consumes them, so a malformed file
//! never reaches a session.

use crate::geometry::Point;
use crate::landmark::{LandmarkKey, LandmarkSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Error types for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid tracing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid calibration scale {0}: expected a positive finite number")]
    InvalidScale(f64),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinitePoint(LandmarkKey),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Saved tracing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracingRecord {
    /// Only placed landmarks; `null` entries are read as unplaced
    #[serde(default, deserialize_with = "placed_points")]
    pub points: LandmarkSet,

    /// `null` when uncalibrated
    #[serde(rename = "mmPerPixel", alias = "mmPerPx", default)]
    pub mm_per_pixel: Option<f64>,
}

fn placed_points<'de, D>(deserializer: D) -> Result<LandmarkSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<LandmarkKey, Option<Point>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, point)| point.map(|p| (key, p)))
        .collect())
}

impl TracingRecord {
    pub fn new(points: LandmarkSet, mm_per_pixel: Option<f64>) -> Self {
        Self { points, mm_per_pixel }
    }

    /// Reject scales and coordinates no session could hold
    pub fn validate(&self) -> PersistenceResult<()> {
        if let Some(scale) = self.mm_per_pixel {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(PersistenceError::InvalidScale(scale));
            }
        }
        if let Some((key, _)) = self.points.iter().find(|(_, p)| !p.is_finite()) {
            return Err(PersistenceError::NonFinitePoint(key));
        }
        Ok(())
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let record: TracingRecord = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Save a record, replacing the file atomically
pub fn save_record(path: &Path, record: &TracingRecord) -> PersistenceResult<()> {
    record.validate()?;
    let json = record.to_json()?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    tracing::debug!(path = %path.display(), points = record.points.len(), "tracing saved");
    Ok(())
}

/// Load and validate a record
pub fn load_record(path: &Path) -> PersistenceResult<TracingRecord> {
    let json = fs::read_to_string(path)?;
    let record = TracingRecord::from_json(&json)?;
    tracing::debug!(path = %path.display(), points = record.points.len(), "tracing loaded");
    Ok(record)
}
