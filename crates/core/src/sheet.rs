//! Full measurement pass over one tracing

use crate::calibration::scale_label;
use crate::landmark::LandmarkSet;
use crate::metric::{Analysis, MetricId, MetricResult, NormTable, METRICS};
use crate::norm::Judgment;
use serde::Serialize;

/// Every metric evaluated against one landmark set and calibration
///
/// Holds one result per registered metric, in registry order, whether or not
/// it could be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSheet {
    mm_per_pixel: Option<f64>,
    metrics: Vec<MetricResult>,
}

/// Evaluate every metric
///
/// Pure in its inputs; call it again after any landmark or calibration change.
pub fn compute_all(
    landmarks: &LandmarkSet,
    mm_per_pixel: Option<f64>,
    norms: &NormTable,
) -> MeasurementSheet {
    let metrics = METRICS
        .iter()
        .map(|def| def.evaluate(landmarks, mm_per_pixel, norms.norm(def.id)))
        .collect::<Vec<_>>();

    tracing::debug!(
        placed = landmarks.len(),
        computed = metrics.iter().filter(|m| m.value.is_some()).count(),
        "measurement sheet computed"
    );

    MeasurementSheet { mm_per_pixel, metrics }
}

impl MeasurementSheet {
    pub fn get(&self, id: MetricId) -> &MetricResult {
        &self.metrics[id as usize]
    }

    pub fn value(&self, id: MetricId) -> Option<f64> {
        self.get(id).value
    }

    pub fn judgment(&self, id: MetricId) -> Judgment {
        self.get(id).judgment
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricResult> {
        self.metrics.iter()
    }

    pub fn section(&self, analysis: Analysis) -> impl Iterator<Item = &MetricResult> {
        self.metrics.iter().filter(move |m| m.analysis == analysis)
    }

    pub fn mm_per_pixel(&self) -> Option<f64> {
        self.mm_per_pixel
    }

    pub fn scale_label(&self) -> String {
        scale_label(self.mm_per_pixel)
    }
}
