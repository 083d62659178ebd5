//! Two-point pixel to millimetre calibration
//!
//! The user arms calibration, clicks both ends of a reference segment of known
//! length (a ruler on the radiograph) and the unit derives a millimetres per
//! pixel scalar. Until that exists, linear measurements stay in pixels.

use crate::geometry::Point;

/// Default length of the reference segment in millimetres
pub const DEFAULT_REFERENCE_LENGTH_MM: f64 = 10.0;

/// Number of reference clicks kept in the rolling buffer
pub const REFERENCE_CLICKS: usize = 2;

/// Why a completed click pair did not produce a scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalibrationRejection {
    #[error("reference length must be a positive finite number")]
    NonPositiveLength,

    #[error("reference points coincide")]
    ZeroPixelDistance,
}

/// Result of feeding one click to the calibration unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// Not armed; the click is not for calibration
    Ignored,
    /// Waiting for more reference clicks
    Pending { clicks: usize },
    /// Scale derived, calibration mode exited
    Calibrated { mm_per_pixel: f64 },
    /// Both clicks present but unusable; still armed for a retry
    Rejected(CalibrationRejection),
}

/// Compute millimetres per pixel from a reference segment
pub fn mm_per_pixel_between(
    p1: Point,
    p2: Point,
    reference_length_mm: f64,
) -> Result<f64, CalibrationRejection> {
    if !reference_length_mm.is_finite() || reference_length_mm <= 0.0 {
        return Err(CalibrationRejection::NonPositiveLength);
    }
    let pixels = p1.distance_to(&p2);
    if pixels.is_nan() || pixels <= 0.0 {
        return Err(CalibrationRejection::ZeroPixelDistance);
    }
    // A scale that underflowed or overflowed could not be saved with the tracing
    let mm_per_pixel = reference_length_mm / pixels;
    if !mm_per_pixel.is_finite() || mm_per_pixel <= 0.0 {
        return Err(CalibrationRejection::ZeroPixelDistance);
    }
    Ok(mm_per_pixel)
}

/// Calibration state for one tracing
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    clicks: Vec<Point>,
    reference_length_mm: f64,
    mm_per_pixel: Option<f64>,
    armed: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_LENGTH_MM)
    }
}

impl Calibration {
    pub fn new(reference_length_mm: f64) -> Self {
        Self {
            clicks: Vec::with_capacity(REFERENCE_CLICKS),
            reference_length_mm,
            mm_per_pixel: None,
            armed: false,
        }
    }

    /// Start a new calibration sequence, discarding the previous scale
    pub fn arm(&mut self) {
        self.clicks.clear();
        self.mm_per_pixel = None;
        self.armed = true;
    }

    /// Leave calibration mode without touching the current scale
    pub fn disarm(&mut self) {
        self.armed = false;
        self.clicks.clear();
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Reference clicks currently buffered (0, 1 or 2)
    pub fn clicks(&self) -> &[Point] {
        &self.clicks
    }

    pub fn reference_length_mm(&self) -> f64 {
        self.reference_length_mm
    }

    /// Set the known length of the reference segment
    ///
    /// Validity is checked when a click pair completes, so an invalid value
    /// only keeps calibration armed.
    pub fn set_reference_length_mm(&mut self, mm: f64) {
        self.reference_length_mm = mm;
    }

    /// Feed one reference click
    pub fn record_click(&mut self, point: Point) -> CalibrationOutcome {
        if !self.armed {
            return CalibrationOutcome::Ignored;
        }

        if self.clicks.len() == REFERENCE_CLICKS {
            self.clicks.remove(0);
        }
        self.clicks.push(point);

        let [p1, p2] = match self.clicks.as_slice() {
            [p1, p2] => [*p1, *p2],
            _ => return CalibrationOutcome::Pending { clicks: self.clicks.len() },
        };

        match mm_per_pixel_between(p1, p2, self.reference_length_mm) {
            Ok(mm_per_pixel) => {
                tracing::debug!(
                    mm_per_pixel,
                    reference_length_mm = self.reference_length_mm,
                    "calibration completed"
                );
                self.mm_per_pixel = Some(mm_per_pixel);
                self.armed = false;
                CalibrationOutcome::Calibrated { mm_per_pixel }
            }
            Err(reason) => {
                tracing::debug!(%reason, "calibration rejected, still armed");
                CalibrationOutcome::Rejected(reason)
            }
        }
    }

    /// Derived scale, if calibration has completed
    pub fn mm_per_pixel(&self) -> Option<f64> {
        self.mm_per_pixel
    }

    pub fn is_calibrated(&self) -> bool {
        self.mm_per_pixel.is_some()
    }

    /// Restore a scale from a saved tracing
    ///
    /// Non-positive or non-finite values leave the tracing uncalibrated.
    pub fn restore(&mut self, mm_per_pixel: Option<f64>) {
        self.mm_per_pixel = mm_per_pixel.filter(|s| s.is_finite() && *s > 0.0);
        self.armed = false;
        self.clicks.clear();
    }

    /// Convert a pixel length to millimetres; `None` means "show pixels"
    pub fn to_millimeters(&self, pixels: f64) -> Option<f64> {
        self.mm_per_pixel.map(|scale| pixels * scale)
    }

    /// Scale expressed for a sheet rendered at a different resolution
    ///
    /// `sx`/`sy` are native over rendered size per axis.
    pub fn mm_per_pixel_for_scale(&self, sx: f64, sy: f64) -> Option<f64> {
        let mean = (sx + sy) / 2.0;
        if mean.is_nan() || mean <= 0.0 {
            return None;
        }
        self.mm_per_pixel.map(|scale| scale / mean)
    }

    /// Human-readable scale line used on sheets and the CLI
    pub fn scale_label(&self) -> String {
        scale_label(self.mm_per_pixel)
    }

    /// Forget clicks and scale; the reference length is kept
    pub fn reset(&mut self) {
        self.clicks.clear();
        self.mm_per_pixel = None;
        self.armed = false;
    }
}

/// Format a scale as `Scale: … px/mm · … mm/px`, or `Uncalibrated`
pub fn scale_label(mm_per_pixel: Option<f64>) -> String {
    match mm_per_pixel {
        Some(scale) => format!("Scale: {:.2} px/mm · {:.4} mm/px", 1.0 / scale, scale),
        None => "Uncalibrated".to_string(),
    }
}
