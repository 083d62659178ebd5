//! Metric registry
//!
//! Each metric declares the landmarks it needs, the unit family it is judged
//! in, its population norm and a pure computation over a [`LandmarkSet`].
//! Linear computations return pixels; conversion to millimetres happens once,
//! in [`MetricDef::evaluate`], so every metric shares the same calibration
//! handling.

use crate::geometry::{
    angle_at_vertex, angle_between_directions, distance, project_onto_line, scalar_projection,
    signed_distance_to_line,
};
use crate::landmark::{LandmarkKey, LandmarkSet};
use crate::norm::{judgment, severity, Judgment, Norm, Severity, Unit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use LandmarkKey::*;

/// Named group of metrics, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Steiner,
    BjorkJarabak,
    SoftTissue,
    Extended,
}

impl Analysis {
    pub const ALL: [Analysis; 4] = [
        Analysis::Steiner,
        Analysis::BjorkJarabak,
        Analysis::SoftTissue,
        Analysis::Extended,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Analysis::Steiner => "Steiner",
            Analysis::BjorkJarabak => "Björk–Jarabak",
            Analysis::SoftTissue => "Soft tissue",
            Analysis::Extended => "Extended",
        }
    }

    /// Metrics of this analysis in display order
    pub fn metrics(self) -> impl Iterator<Item = &'static MetricDef> {
        METRICS.iter().filter(move |def| def.analysis == self)
    }
}

/// Identifier of a derived measurement
///
/// Declaration order is display order and indexes [`METRICS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    Sna,
    Snb,
    Anb,
    SnGoGn,
    U1NaAngle,
    U1NaDistance,
    L1NbAngle,
    L1NbDistance,
    Interincisal,
    PgNb,
    Saddle,
    Articular,
    Gonial,
    BjorkSum,
    Jarabak,
    LowerLipELine,
    Impa,
    /// Positive when BO lies anterior to AO, the reverse of Jacobson's sign
    Wits,
    OclSn,
    FacialAngle,
    U1Sn,
}

impl MetricId {
    pub fn all() -> impl Iterator<Item = MetricId> {
        METRICS.iter().map(|def| def.id)
    }

    pub fn def(self) -> &'static MetricDef {
        &METRICS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }
}

/// Declaration of one metric
#[derive(Debug)]
pub struct MetricDef {
    pub id: MetricId,
    pub name: &'static str,
    pub analysis: Analysis,
    /// Landmarks that must all be placed before `compute` runs
    pub required: &'static [LandmarkKey],
    /// Unit family the metric is judged in
    pub unit: Unit,
    pub norm: Norm,
    compute: fn(&LandmarkSet) -> Option<f64>,
}

/// Evaluated metric
///
/// Derived on demand from a landmark set and calibration, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricResult {
    pub id: MetricId,
    pub name: &'static str,
    pub analysis: Analysis,
    pub value: Option<f64>,
    /// Unit of `value`; `Pixel` for an uncalibrated linear metric
    pub unit: Unit,
    pub norm: Norm,
    pub z_score: Option<f64>,
    pub judgment: Judgment,
    pub severity: Severity,
}

impl MetricDef {
    /// Value in the metric's native geometry (degrees, pixels or percent)
    ///
    /// Missing required landmarks short-circuit before any geometry runs.
    pub fn raw_value(&self, landmarks: &LandmarkSet) -> Option<f64> {
        if !self.required.iter().all(|key| landmarks.contains(*key)) {
            return None;
        }
        (self.compute)(landmarks)
    }

    pub fn evaluate(
        &self,
        landmarks: &LandmarkSet,
        mm_per_pixel: Option<f64>,
        norm: Norm,
    ) -> MetricResult {
        // Overflowing geometry counts as undefined, never as a NaN value
        let raw = self.raw_value(landmarks).filter(|v| v.is_finite());
        let scale = mm_per_pixel.filter(|s| s.is_finite() && *s > 0.0);

        let (value, unit) = match (self.unit, scale) {
            (Unit::Millimeter, Some(scale)) => {
                (raw.map(|px| px * scale).filter(|mm| mm.is_finite()), Unit::Millimeter)
            }
            (Unit::Millimeter, None) => (raw, Unit::Pixel),
            (unit, _) => (raw, unit),
        };

        // A pixel value is shown for reference only; it has no norm to score against
        let z_score = match unit {
            Unit::Pixel => None,
            _ => norm.standard_score(value),
        };

        MetricResult {
            id: self.id,
            name: self.name,
            analysis: self.analysis,
            value,
            unit,
            norm,
            z_score,
            judgment: judgment(value, norm.mean, unit),
            severity: severity(value, norm.mean, unit),
        }
    }
}

/// Per-metric norm overrides on top of the built-in table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormTable {
    overrides: BTreeMap<MetricId, Norm>,
}

impl NormTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: MetricId, norm: Norm) {
        self.overrides.insert(id, norm);
    }

    pub fn clear(&mut self, id: MetricId) {
        self.overrides.remove(&id);
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn norm(&self, id: MetricId) -> Norm {
        self.overrides.get(&id).copied().unwrap_or(id.def().norm)
    }
}

const fn metric(
    id: MetricId,
    name: &'static str,
    analysis: Analysis,
    required: &'static [LandmarkKey],
    unit: Unit,
    norm: Norm,
    compute: fn(&LandmarkSet) -> Option<f64>,
) -> MetricDef {
    MetricDef {
        id,
        name,
        analysis,
        required,
        unit,
        norm,
        compute,
    }
}

use Analysis::{BjorkJarabak, Extended, SoftTissue, Steiner};
use Unit::{Degree, Millimeter, Percent};

#[rustfmt::skip]
pub static METRICS: [MetricDef; 21] = [
    metric(MetricId::Sna, "SNA", Steiner, &[Sella, Nasion, PointA], Degree, Norm::new(82.0, 3.0), sna),
    metric(MetricId::Snb, "SNB", Steiner, &[Sella, Nasion, PointB], Degree, Norm::new(80.0, 3.0), snb),
    metric(MetricId::Anb, "ANB", Steiner, &[Sella, Nasion, PointA, PointB], Degree, Norm::new(2.0, 2.0), anb),
    metric(MetricId::SnGoGn, "SN–GoGn", Steiner, &[Sella, Nasion, Gonion, Gnathion], Degree, Norm::new(32.0, 5.0), sn_gogn),
    metric(MetricId::U1NaAngle, "U1–NA (°)", Steiner, &[UpperIncisorTip, UpperIncisorApex, Nasion, PointA], Degree, Norm::new(22.0, 6.0), u1_na_angle),
    metric(MetricId::U1NaDistance, "U1–NA (mm)", Steiner, &[UpperIncisorTip, Nasion, PointA], Millimeter, Norm::new(4.0, 2.0), u1_na_distance),
    metric(MetricId::L1NbAngle, "L1–NB (°)", Steiner, &[LowerIncisorTip, LowerIncisorApex, Nasion, PointB], Degree, Norm::new(25.0, 6.0), l1_nb_angle),
    metric(MetricId::L1NbDistance, "L1–NB (mm)", Steiner, &[LowerIncisorTip, Nasion, PointB], Millimeter, Norm::new(4.0, 2.0), l1_nb_distance),
    metric(MetricId::Interincisal, "Interincisal", Steiner, &[UpperIncisorTip, UpperIncisorApex, LowerIncisorTip, LowerIncisorApex], Degree, Norm::new(131.0, 6.0), interincisal),
    metric(MetricId::PgNb, "Pg–NB (±)", Steiner, &[Pogonion, Nasion, PointB], Millimeter, Norm::new(0.0, 2.0), pg_nb),
    metric(MetricId::Saddle, "Saddle (N–S–Ar)", BjorkJarabak, &[Nasion, Sella, Articulare], Degree, Norm::new(123.0, 5.0), saddle),
    metric(MetricId::Articular, "Articular (S–Ar–Go)", BjorkJarabak, &[Sella, Articulare, Gonion], Degree, Norm::new(143.0, 6.0), articular),
    metric(MetricId::Gonial, "Gonial (Ar–Go–Me)", BjorkJarabak, &[Articulare, Gonion, Menton], Degree, Norm::new(130.0, 7.0), gonial),
    metric(MetricId::BjorkSum, "Björk sum", BjorkJarabak, &[Nasion, Sella, Articulare, Gonion, Menton], Degree, Norm::new(396.0, 6.0), bjork_sum),
    metric(MetricId::Jarabak, "Jarabak % (S–Go/N–Me)", BjorkJarabak, &[Sella, Gonion, Nasion, Menton], Percent, Norm::new(65.0, 3.0), jarabak),
    metric(MetricId::LowerLipELine, "Lower lip – E-line (±)", SoftTissue, &[LabraleInferius, Pronasale, SoftPogonion], Millimeter, Norm::new(-2.0, 2.0), lower_lip_e_line),
    metric(MetricId::Impa, "IMPA", Extended, &[LowerIncisorTip, LowerIncisorApex, Gonion, Gnathion], Degree, Norm::new(90.0, 5.0), impa),
    metric(MetricId::Wits, "Wits (±)", Extended, &[PointA, PointB, OcclusalPosterior, OcclusalAnterior], Millimeter, Norm::new(0.0, 2.0), wits),
    // Occlusal plane falls back to Frankfort (Po–Or), so only S and N are mandatory
    metric(MetricId::OclSn, "Ocl–SN", Extended, &[Sella, Nasion], Degree, Norm::new(14.0, 4.0), ocl_sn),
    metric(MetricId::FacialAngle, "Facial angle (Ba–N/Pt–Gn)", Extended, &[Basion, Nasion, Pterygoid, Gnathion], Degree, Norm::new(90.0, 3.5), facial_angle),
    metric(MetricId::U1Sn, "U1–SN", Extended, &[UpperIncisorTip, UpperIncisorApex, Sella, Nasion], Degree, Norm::new(103.0, 6.0), u1_sn),
];

fn sna(l: &LandmarkSet) -> Option<f64> {
    let [s, n, a] = l.require([Sella, Nasion, PointA])?;
    angle_at_vertex(s, n, a)
}

fn snb(l: &LandmarkSet) -> Option<f64> {
    let [s, n, b] = l.require([Sella, Nasion, PointB])?;
    angle_at_vertex(s, n, b)
}

fn anb(l: &LandmarkSet) -> Option<f64> {
    Some(sna(l)? - snb(l)?)
}

fn sn_gogn(l: &LandmarkSet) -> Option<f64> {
    let [s, n, go, gn] = l.require([Sella, Nasion, Gonion, Gnathion])?;
    angle_between_directions(s, n, go, gn)
}

fn u1_na_angle(l: &LandmarkSet) -> Option<f64> {
    let [tip, apex, n, a] = l.require([UpperIncisorTip, UpperIncisorApex, Nasion, PointA])?;
    angle_between_directions(tip, apex, n, a)
}

fn u1_na_distance(l: &LandmarkSet) -> Option<f64> {
    let [tip, n, a] = l.require([UpperIncisorTip, Nasion, PointA])?;
    signed_distance_to_line(tip, n, a).map(f64::abs)
}

fn l1_nb_angle(l: &LandmarkSet) -> Option<f64> {
    let [tip, apex, n, b] = l.require([LowerIncisorTip, LowerIncisorApex, Nasion, PointB])?;
    angle_between_directions(tip, apex, n, b)
}

fn l1_nb_distance(l: &LandmarkSet) -> Option<f64> {
    let [tip, n, b] = l.require([LowerIncisorTip, Nasion, PointB])?;
    signed_distance_to_line(tip, n, b).map(f64::abs)
}

fn interincisal(l: &LandmarkSet) -> Option<f64> {
    let [u1t, u1a, l1t, l1a] =
        l.require([UpperIncisorTip, UpperIncisorApex, LowerIncisorTip, LowerIncisorApex])?;
    angle_between_directions(u1t, u1a, l1t, l1a)
}

fn pg_nb(l: &LandmarkSet) -> Option<f64> {
    let [pg, n, b] = l.require([Pogonion, Nasion, PointB])?;
    signed_distance_to_line(pg, n, b)
}

fn saddle(l: &LandmarkSet) -> Option<f64> {
    let [n, s, ar] = l.require([Nasion, Sella, Articulare])?;
    angle_at_vertex(n, s, ar)
}

fn articular(l: &LandmarkSet) -> Option<f64> {
    let [s, ar, go] = l.require([Sella, Articulare, Gonion])?;
    angle_at_vertex(s, ar, go)
}

fn gonial(l: &LandmarkSet) -> Option<f64> {
    let [ar, go, me] = l.require([Articulare, Gonion, Menton])?;
    angle_at_vertex(ar, go, me)
}

fn bjork_sum(l: &LandmarkSet) -> Option<f64> {
    Some(saddle(l)? + articular(l)? + gonial(l)?)
}

fn jarabak(l: &LandmarkSet) -> Option<f64> {
    let [s, go, n, me] = l.require([Sella, Gonion, Nasion, Menton])?;
    let anterior = distance(n, me);
    if anterior == 0.0 {
        return None;
    }
    Some(100.0 * distance(s, go) / anterior)
}

fn lower_lip_e_line(l: &LandmarkSet) -> Option<f64> {
    let [li, prn, pgs] = l.require([LabraleInferius, Pronasale, SoftPogonion])?;
    signed_distance_to_line(li, prn, pgs)
}

fn impa(l: &LandmarkSet) -> Option<f64> {
    let [tip, apex, go, gn] = l.require([LowerIncisorTip, LowerIncisorApex, Gonion, Gnathion])?;
    angle_between_directions(tip, apex, go, gn)
}

/// `(BO − AO)` along `Oc1→Oc2`; positive when BO lies anterior to AO
///
/// Jacobson reports the opposite sign (BO behind AO is positive), so a
/// Class II tracing reads negative here and a Class III one positive.
fn wits(l: &LandmarkSet) -> Option<f64> {
    let [a, b, oc1, oc2] = l.require([PointA, PointB, OcclusalPosterior, OcclusalAnterior])?;
    let ao = project_onto_line(a, oc1, oc2)?;
    let bo = project_onto_line(b, oc1, oc2)?;
    scalar_projection(ao, bo, oc1, oc2)
}

fn ocl_sn(l: &LandmarkSet) -> Option<f64> {
    let [s, n] = l.require([Sella, Nasion])?;
    let [p1, p2] = l
        .require([OcclusalPosterior, OcclusalAnterior])
        .or_else(|| l.require([Porion, Orbitale]))?;
    angle_between_directions(p1, p2, s, n)
}

fn facial_angle(l: &LandmarkSet) -> Option<f64> {
    let [ba, n, pt, gn] = l.require([Basion, Nasion, Pterygoid, Gnathion])?;
    angle_between_directions(ba, n, pt, gn).map(|angle| 180.0 - angle)
}

fn u1_sn(l: &LandmarkSet) -> Option<f64> {
    let [tip, apex, s, n] = l.require([UpperIncisorTip, UpperIncisorApex, Sella, Nasion])?;
    angle_between_directions(tip, apex, s, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn landmarks(points: &[(LandmarkKey, f64, f64)]) -> LandmarkSet {
        points
            .iter()
            .map(|(key, x, y)| (*key, Point::new(*x, *y)))
            .collect()
    }

    fn value(id: MetricId, set: &LandmarkSet, mm_per_pixel: Option<f64>) -> MetricResult {
        let def = id.def();
        def.evaluate(set, mm_per_pixel, def.norm)
    }

    #[test]
    fn test_registry_is_indexed_by_id() {
        for (index, def) in METRICS.iter().enumerate() {
            assert_eq!(def.id as usize, index, "{} out of order", def.name);
            assert!(!def.required.is_empty());
        }
    }

    #[test]
    fn test_analyses_are_contiguous() {
        let order: Vec<Analysis> = METRICS.iter().map(|def| def.analysis).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(Analysis::SoftTissue.metrics().count(), 1);
    }

    #[test]
    fn test_sna_partial_tracing() {
        let set = landmarks(&[(Sella, 0.0, 100.0), (Nasion, 0.0, 0.0), (PointA, 50.0, -10.0)]);
        let sna = value(MetricId::Sna, &set, None);

        let expected = angle_at_vertex(
            Point::new(0.0, 100.0),
            Point::new(0.0, 0.0),
            Point::new(50.0, -10.0),
        )
        .unwrap();
        assert_eq!(sna.value, Some(expected));
        assert_eq!(sna.unit, Unit::Degree);
        assert!((expected - 101.30993247402021).abs() < 1e-9);
        assert_eq!(sna.judgment, Judgment::Above);

        let anb = value(MetricId::Anb, &set, None);
        assert_eq!(anb.value, None);
        assert_eq!(anb.z_score, None);
        assert_eq!(anb.judgment, Judgment::Undetermined);
        assert_eq!(anb.severity, Severity::Undetermined);
    }

    #[test]
    fn test_huge_coordinates_never_yield_nan() {
        let far = landmarks(&[(Sella, 1e160, 1e160), (Nasion, 0.0, 0.0), (PointA, 1e160, 1e160)]);
        let sna = value(MetricId::Sna, &far, None);
        let angle = sna.value.expect("unit vectors keep the angle finite");
        assert!(angle.abs() < 1e-4);
        assert_eq!(sna.judgment, Judgment::Below);
        assert_eq!(sna.severity, Severity::Marked);

        let overflow = landmarks(&[
            (Sella, -f64::MAX, 0.0),
            (Nasion, f64::MAX, 0.0),
            (PointA, 0.0, 1.0),
        ]);
        let sna = value(MetricId::Sna, &overflow, None);
        assert_eq!(sna.value, None);
        assert_eq!(sna.z_score, None);
        assert_eq!(sna.judgment, Judgment::Undetermined);
        assert_eq!(sna.severity, Severity::Undetermined);
    }

    #[test]
    fn test_overflowing_millimetre_conversion_is_undefined() {
        let set = landmarks(&[
            (Nasion, 0.0, 0.0),
            (PointA, 0.0, 1.0),
            (UpperIncisorTip, f64::MAX, 0.5),
        ]);
        let u1 = value(MetricId::U1NaDistance, &set, Some(4.0));
        assert_eq!(u1.unit, Unit::Millimeter);
        assert_eq!(u1.value, None);
        assert_eq!(u1.judgment, Judgment::Undetermined);
    }

    #[test]
    fn test_uncalibrated_linear_metric_reports_pixels() {
        let set = landmarks(&[
            (Nasion, 0.0, 0.0),
            (PointA, 0.0, 100.0),
            (UpperIncisorTip, 30.0, 80.0),
        ]);

        let px = value(MetricId::U1NaDistance, &set, None);
        assert_eq!(px.value, Some(30.0));
        assert_eq!(px.unit, Unit::Pixel);
        assert_eq!(px.z_score, None);
        assert_eq!(px.judgment, Judgment::Undetermined);

        let mm = value(MetricId::U1NaDistance, &set, Some(0.1));
        assert!((mm.value.unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(mm.unit, Unit::Millimeter);
        assert!((mm.z_score.unwrap() + 0.5).abs() < 1e-12);
        assert_eq!(mm.judgment, Judgment::Within);
    }

    #[test]
    fn test_invalid_scale_treated_as_uncalibrated() {
        let set = landmarks(&[
            (Nasion, 0.0, 0.0),
            (PointA, 0.0, 100.0),
            (UpperIncisorTip, 30.0, 80.0),
        ]);
        assert_eq!(value(MetricId::U1NaDistance, &set, Some(0.0)).unit, Unit::Pixel);
        assert_eq!(value(MetricId::U1NaDistance, &set, Some(f64::NAN)).unit, Unit::Pixel);
    }

    #[test]
    fn test_pg_nb_keeps_sign() {
        // N at top, B below: NB runs downward, Pg on either side
        let right = landmarks(&[(Nasion, 0.0, 0.0), (PointB, 0.0, 100.0), (Pogonion, 5.0, 120.0)]);
        let left = landmarks(&[(Nasion, 0.0, 0.0), (PointB, 0.0, 100.0), (Pogonion, -5.0, 120.0)]);

        let r = value(MetricId::PgNb, &right, Some(1.0)).value.unwrap();
        let l = value(MetricId::PgNb, &left, Some(1.0)).value.unwrap();
        assert!((r - 5.0).abs() < 1e-12);
        assert!((l + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bjork_sum_is_component_total() {
        let set = landmarks(&[
            (Nasion, 560.0, 260.0),
            (Sella, 300.0, 300.0),
            (Articulare, 230.0, 450.0),
            (Gonion, 300.0, 620.0),
            (Menton, 520.0, 760.0),
        ]);
        let parts: f64 = [MetricId::Saddle, MetricId::Articular, MetricId::Gonial]
            .iter()
            .map(|id| value(*id, &set, None).value.unwrap())
            .sum();
        let sum = value(MetricId::BjorkSum, &set, None).value.unwrap();
        assert!((sum - parts).abs() < 1e-9);
    }

    #[test]
    fn test_jarabak_ratio() {
        let set = landmarks(&[
            (Sella, 0.0, 0.0),
            (Gonion, 0.0, 65.0),
            (Nasion, 100.0, 0.0),
            (Menton, 100.0, 100.0),
        ]);
        let ratio = value(MetricId::Jarabak, &set, None);
        assert_eq!(ratio.unit, Unit::Percent);
        assert!((ratio.value.unwrap() - 65.0).abs() < 1e-12);
        assert_eq!(ratio.judgment, Judgment::Within);

        let degenerate = landmarks(&[
            (Sella, 0.0, 0.0),
            (Gonion, 0.0, 65.0),
            (Nasion, 100.0, 0.0),
            (Menton, 100.0, 0.0),
        ]);
        assert_eq!(value(MetricId::Jarabak, &degenerate, None).value, None);
    }

    #[test]
    fn test_wits_sign_convention() {
        // Occlusal plane along +x from posterior to anterior
        let mut set = landmarks(&[
            (OcclusalPosterior, 0.0, 50.0),
            (OcclusalAnterior, 100.0, 50.0),
            (PointA, 80.0, 0.0),
            (PointB, 77.0, 100.0),
        ]);
        // AO ahead of BO by 3 px
        let class_two = value(MetricId::Wits, &set, Some(1.0)).value.unwrap();
        assert!((class_two + 3.0).abs() < 1e-12);

        set.set(PointB, Point::new(84.0, 100.0));
        let class_three = value(MetricId::Wits, &set, Some(1.0)).value.unwrap();
        assert!((class_three - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_ocl_sn_falls_back_to_frankfort() {
        let mut set = landmarks(&[
            (Sella, 0.0, 0.0),
            (Nasion, 100.0, 0.0),
            (Porion, 0.0, 10.0),
            (Orbitale, 100.0, 20.0),
        ]);
        let frankfort = value(MetricId::OclSn, &set, None).value.unwrap();
        assert!((frankfort - (0.1f64).atan().to_degrees()).abs() < 1e-9);

        // A half-placed occlusal plane keeps the fallback
        set.set(OcclusalPosterior, Point::new(0.0, 50.0));
        assert_eq!(value(MetricId::OclSn, &set, None).value, Some(frankfort));

        set.set(OcclusalAnterior, Point::new(100.0, 50.0));
        assert_eq!(value(MetricId::OclSn, &set, None).value, Some(0.0));
    }

    #[test]
    fn test_facial_angle_complements_line_angle() {
        let set = landmarks(&[
            (Basion, 0.0, 0.0),
            (Nasion, 100.0, 0.0),
            (Pterygoid, 50.0, -10.0),
            (Gnathion, 50.0, 90.0),
        ]);
        assert_eq!(value(MetricId::FacialAngle, &set, None).value, Some(90.0));
    }

    #[test]
    fn test_degenerate_geometry_is_undefined() {
        let set = landmarks(&[(Sella, 0.0, 0.0), (Nasion, 0.0, 0.0), (PointA, 5.0, 5.0)]);
        let sna = value(MetricId::Sna, &set, None);
        assert_eq!(sna.value, None);
        assert_eq!(sna.judgment, Judgment::Undetermined);
    }

    #[test]
    fn test_norm_overrides() {
        let mut norms = NormTable::new();
        assert_eq!(norms.norm(MetricId::Sna), Norm::new(82.0, 3.0));

        norms.set(MetricId::Sna, Norm::new(84.0, 2.0));
        assert_eq!(norms.norm(MetricId::Sna), Norm::new(84.0, 2.0));
        assert_eq!(norms.norm(MetricId::Snb), Norm::new(80.0, 3.0));

        let json = serde_json::to_string(&norms).unwrap();
        assert_eq!(json, r#"{"sna":{"mean":84.0,"sd":2.0}}"#);

        norms.clear(MetricId::Sna);
        assert!(norms.is_empty());
    }
}
