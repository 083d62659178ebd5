//! Tracing state container
//!
//! [`TracingSession`] is the only owner of the mutable landmark set and
//! calibration. Adapters (a canvas, the CLI) call its mutation operations in
//! response to discrete user actions; measurement code only ever reads a
//! [`TracingSnapshot`].

use crate::calibration::{Calibration, CalibrationOutcome, DEFAULT_REFERENCE_LENGTH_MM};
use crate::geometry::Point;
use crate::landmark::{LandmarkKey, LandmarkSet, REGISTRY};
use crate::metric::NormTable;
use crate::persistence::{PersistenceResult, TracingRecord};
use crate::sheet::{compute_all, MeasurementSheet};

/// What a canvas click did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// The active landmark was placed and the next unplaced one became active
    Placed { key: LandmarkKey, next: LandmarkKey },
    /// The click was consumed by calibration
    Calibration(CalibrationOutcome),
}

/// Immutable copy of the tracing state
#[derive(Debug, Clone, PartialEq)]
pub struct TracingSnapshot {
    pub landmarks: LandmarkSet,
    pub mm_per_pixel: Option<f64>,
    /// Increments on every mutation of the session
    pub revision: u64,
}

impl TracingSnapshot {
    pub fn measure(&self, norms: &NormTable) -> MeasurementSheet {
        compute_all(&self.landmarks, self.mm_per_pixel, norms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    key: LandmarkKey,
    pending: Option<Point>,
}

#[derive(Debug, Clone)]
pub struct TracingSession {
    landmarks: LandmarkSet,
    calibration: Calibration,
    active: LandmarkKey,
    drag: Option<Drag>,
    revision: u64,
}

impl Default for TracingSession {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_LENGTH_MM)
    }
}

impl TracingSession {
    pub fn new(reference_length_mm: f64) -> Self {
        Self {
            landmarks: LandmarkSet::new(),
            calibration: Calibration::new(reference_length_mm),
            active: REGISTRY[0].key,
            drag: None,
            revision: 0,
        }
    }

    /// Session restored from a saved record
    pub fn from_record(record: TracingRecord, reference_length_mm: f64) -> PersistenceResult<Self> {
        let mut session = Self::new(reference_length_mm);
        session.import_record(record)?;
        Ok(session)
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn mm_per_pixel(&self) -> Option<f64> {
        self.calibration.mm_per_pixel()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Landmark the next click places
    pub fn active_key(&self) -> LandmarkKey {
        self.active
    }

    pub fn set_active_key(&mut self, key: LandmarkKey) {
        self.active = key;
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Route a canvas click to calibration when armed, otherwise place the active landmark
    pub fn click(&mut self, point: Point) -> ClickOutcome {
        if self.calibration.is_armed() {
            return ClickOutcome::Calibration(self.record_calibration_click(point));
        }
        let key = self.active;
        self.place_point(key, point);
        self.active = self.landmarks.next_unset_after(key);
        ClickOutcome::Placed { key, next: self.active }
    }

    /// Place or re-place a landmark; returns the point it replaced
    pub fn place_point(&mut self, key: LandmarkKey, point: Point) -> Option<Point> {
        let previous = self.landmarks.set(key, point);
        self.touch();
        previous
    }

    /// Move an already placed landmark; unplaced keys are left alone
    pub fn move_point(&mut self, key: LandmarkKey, point: Point) -> bool {
        if !self.landmarks.contains(key) {
            return false;
        }
        self.landmarks.set(key, point);
        self.touch();
        true
    }

    pub fn remove_point(&mut self, key: LandmarkKey) -> Option<Point> {
        let removed = self.landmarks.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Arm calibration; the current scale is discarded
    pub fn begin_calibration(&mut self) {
        self.calibration.arm();
        self.touch();
    }

    pub fn record_calibration_click(&mut self, point: Point) -> CalibrationOutcome {
        let outcome = self.calibration.record_click(point);
        if outcome != CalibrationOutcome::Ignored {
            self.touch();
        }
        outcome
    }

    pub fn set_reference_length(&mut self, mm: f64) {
        self.calibration.set_reference_length_mm(mm);
        self.touch();
    }

    /// Clear every landmark and the calibration
    pub fn reset(&mut self) {
        self.landmarks.clear();
        self.calibration.reset();
        self.active = REGISTRY[0].key;
        self.drag = None;
        self.touch();
    }

    /// Start dragging a placed landmark
    pub fn begin_drag(&mut self, key: LandmarkKey) -> bool {
        if !self.landmarks.contains(key) {
            return false;
        }
        self.drag = Some(Drag { key, pending: None });
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Record the pointer position; only the latest one is kept until the next flush
    pub fn drag_to(&mut self, point: Point) {
        if let Some(drag) = self.drag.as_mut() {
            drag.pending = Some(point);
        }
    }

    /// Apply the pending drag position, at most once per display refresh
    pub fn flush_drag(&mut self) -> bool {
        let Some((key, point)) = self
            .drag
            .as_mut()
            .and_then(|drag| drag.pending.take().map(|p| (drag.key, p)))
        else {
            return false;
        };
        self.move_point(key, point)
    }

    pub fn end_drag(&mut self) {
        self.flush_drag();
        self.drag = None;
    }

    pub fn snapshot(&self) -> TracingSnapshot {
        TracingSnapshot {
            landmarks: self.landmarks.clone(),
            mm_per_pixel: self.calibration.mm_per_pixel(),
            revision: self.revision,
        }
    }

    pub fn measure(&self, norms: &NormTable) -> MeasurementSheet {
        compute_all(&self.landmarks, self.calibration.mm_per_pixel(), norms)
    }

    pub fn to_record(&self) -> TracingRecord {
        TracingRecord::new(self.landmarks.clone(), self.calibration.mm_per_pixel())
    }

    /// Replace the tracing with a saved record
    ///
    /// The record is validated first; on error the session is unchanged.
    pub fn import_record(&mut self, record: TracingRecord) -> PersistenceResult<()> {
        record.validate()?;

        self.landmarks = record.points;
        self.calibration.restore(record.mm_per_pixel);
        self.active = self.landmarks.next_unset_after(REGISTRY[REGISTRY.len() - 1].key);
        self.drag = None;
        self.touch();

        tracing::debug!(
            points = self.landmarks.len(),
            calibrated = self.calibration.is_calibrated(),
            "tracing imported"
        );
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> PersistenceResult<()> {
        let record = TracingRecord::from_json(json)?;
        self.import_record(record)
    }
}
