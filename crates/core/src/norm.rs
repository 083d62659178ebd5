//! Reference norms and the two-tier evaluation policy
//!
//! Every metric carries a population norm (mean, standard deviation). A value
//! is scored two ways: a continuous standard score against the norm, and a
//! categorical judgment against a fixed absolute tolerance band that depends
//! only on the unit family.

use serde::{Deserialize, Serialize};

/// Unit a metric value is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Degree,
    Millimeter,
    /// Linear metric on an uncalibrated tracing
    Pixel,
    Percent,
}

impl Unit {
    /// Label used in tables and exports
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Degree => "°",
            Unit::Millimeter => "mm",
            Unit::Pixel => "px",
            Unit::Percent => "%",
        }
    }

    pub fn tolerance(self) -> Option<f64> {
        tolerance(self)
    }
}

/// Population reference for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    pub mean: f64,
    pub sd: f64,
}

impl Norm {
    pub const fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }

    pub fn standard_score(&self, value: Option<f64>) -> Option<f64> {
        standard_score(value, self.mean, self.sd)
    }
}

/// Categorical position of a value relative to its tolerance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Below,
    Within,
    Above,
    Undetermined,
}

impl Judgment {
    pub fn is_determined(self) -> bool {
        self != Judgment::Undetermined
    }
}

/// How far outside the band a value falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Inside one tolerance of the mean
    Within,
    /// Outside one tolerance, inside two
    Mild,
    Marked,
    Undetermined,
}

/// `(value - mean) / sd`, undefined for a missing value or a non-positive sd
pub fn standard_score(value: Option<f64>, mean: f64, sd: f64) -> Option<f64> {
    let value = value?;
    if sd.is_nan() || sd <= 0.0 {
        return None;
    }
    Some((value - mean) / sd).filter(|z| z.is_finite())
}

/// Absolute tolerance band half-width for a unit family
///
/// Pixel values have no clinical band.
pub fn tolerance(unit: Unit) -> Option<f64> {
    match unit {
        Unit::Degree => Some(2.0),
        Unit::Millimeter => Some(1.0),
        Unit::Percent => Some(2.0),
        Unit::Pixel => None,
    }
}

/// Compare `value - mean` against the unit's tolerance; the band is inclusive
///
/// A non-finite value is undetermined.
pub fn judgment(value: Option<f64>, mean: f64, unit: Unit) -> Judgment {
    let (Some(value), Some(tol)) = (value.filter(|v| v.is_finite()), tolerance(unit)) else {
        return Judgment::Undetermined;
    };
    let delta = value - mean;
    if delta > tol {
        Judgment::Above
    } else if delta < -tol {
        Judgment::Below
    } else {
        Judgment::Within
    }
}

pub fn severity(value: Option<f64>, mean: f64, unit: Unit) -> Severity {
    let (Some(value), Some(tol)) = (value.filter(|v| v.is_finite()), tolerance(unit)) else {
        return Severity::Undetermined;
    };
    let delta = (value - mean).abs();
    if delta <= tol {
        Severity::Within
    } else if delta <= 2.0 * tol {
        Severity::Mild
    } else {
        Severity::Marked
    }
}
