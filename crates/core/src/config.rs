//! User preferences
//!
//! Plain serde types; loading and saving them is the storage crate's job.

use crate::calibration::DEFAULT_REFERENCE_LENGTH_MM;
use crate::metric::{Analysis, NormTable};
use crate::narrative::Locale;
use serde::{Deserialize, Serialize};

/// Which analyses appear in tables and exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSelection {
    pub steiner: bool,
    pub bjork_jarabak: bool,
    pub soft_tissue: bool,
    pub extended: bool,
}

impl Default for AnalysisSelection {
    fn default() -> Self {
        Self {
            steiner: true,
            bjork_jarabak: true,
            soft_tissue: true,
            extended: true,
        }
    }
}

impl AnalysisSelection {
    pub fn includes(&self, analysis: Analysis) -> bool {
        match analysis {
            Analysis::Steiner => self.steiner,
            Analysis::BjorkJarabak => self.bjork_jarabak,
            Analysis::SoftTissue => self.soft_tissue,
            Analysis::Extended => self.extended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub analyses: AnalysisSelection,
    /// Known length of the calibration ruler segment
    pub reference_length_mm: f64,
    pub locale: Locale,
    /// Replaces built-in norms for the listed metrics
    pub norms: NormTable,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            analyses: AnalysisSelection::default(),
            reference_length_mm: DEFAULT_REFERENCE_LENGTH_MM,
            locale: Locale::default(),
            norms: NormTable::default(),
        }
    }
}
