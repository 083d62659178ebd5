//! Cephalometric measurement engine
//!
//! Landmark store, calibration, geometric primitives, the metric registry,
//! norm evaluation and the clinical narrative, plus the persistence record
//! and tabular export built on top of them.

pub mod calibration;
pub mod config;
pub mod geometry;
pub mod landmark;
pub mod metric;
pub mod narrative;
pub mod norm;
pub mod persistence;
pub mod session;
pub mod sheet;
pub mod table;

pub use calibration::{
    mm_per_pixel_between, scale_label, Calibration, CalibrationOutcome, CalibrationRejection,
    DEFAULT_REFERENCE_LENGTH_MM,
};
pub use config::{AnalysisSelection, Preferences};
pub use geometry::{
    angle_at_vertex, angle_between_directions, arc_path, distance, line_intersection,
    signed_distance_to_line, ArcPath, Point,
};
pub use landmark::{
    LandmarkGroup, LandmarkInfo, LandmarkKey, LandmarkSet, UnknownLandmark, REGISTRY,
};
pub use metric::{Analysis, MetricDef, MetricId, MetricResult, NormTable, METRICS};
pub use narrative::{
    clinical_summary, interpretation_word, Locale, NarrativeSlots, PatientInfo, Sex,
    SkeletalClass,
};
pub use norm::{judgment, standard_score, tolerance, Judgment, Norm, Severity, Unit};
pub use persistence::{
    load_record, save_record, PersistenceError, PersistenceResult, TracingRecord,
};
pub use session::{ClickOutcome, TracingSession, TracingSnapshot};
pub use sheet::{compute_all, MeasurementSheet};
pub use table::{
    build_rows, export_csv, render_text, TableExportConfig, TableExportError, TableExportResult,
    TableRow,
};
