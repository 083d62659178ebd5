//! Landmark registry and landmark store
//!
//! The registry is the single place that knows every anatomical point a
//! tracing may contain. Its order is the placement order used when the user
//! clicks through landmarks one after the other.

use crate::geometry::Point;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Anatomical region a landmark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkGroup {
    Skeletal,
    Dental,
    SoftTissue,
}

/// Identifier of an anatomical point
///
/// Serialized as its short code (`"S"`, `"U1T"`, `"PgS"`…). Ordering follows
/// the registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "&'static str", try_from = "String")]
pub enum LandmarkKey {
    Sella,
    Nasion,
    PointA,
    PointB,
    Porion,
    Orbitale,
    Gonion,
    Menton,
    Pogonion,
    Gnathion,
    Articulare,
    Basion,
    Pterygoid,
    Condylion,
    UpperIncisorTip,
    UpperIncisorApex,
    LowerIncisorTip,
    LowerIncisorApex,
    /// Posterior point of the functional occlusal plane (molar cusps)
    OcclusalPosterior,
    /// Anterior point of the functional occlusal plane (incisor overlap)
    OcclusalAnterior,
    Pronasale,
    SoftPogonion,
    LabraleInferius,
}

/// Registry entry describing a landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkInfo {
    pub key: LandmarkKey,
    pub code: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub group: LandmarkGroup,
}

const fn info(
    key: LandmarkKey,
    code: &'static str,
    label: &'static str,
    description: &'static str,
    group: LandmarkGroup,
) -> LandmarkInfo {
    LandmarkInfo {
        key,
        code,
        label,
        description,
        group,
    }
}

use LandmarkGroup::{Dental, Skeletal, SoftTissue};

/// Every landmark, in placement order. Indexed by `LandmarkKey as usize`.
#[rustfmt::skip]
pub static REGISTRY: [LandmarkInfo; 23] = [
    info(LandmarkKey::Sella, "S", "Sella", "Centre of the sella turcica", Skeletal),
    info(LandmarkKey::Nasion, "N", "Nasion", "Frontonasal suture", Skeletal),
    info(LandmarkKey::PointA, "A", "Point A", "Deepest point of the maxillary concavity", Skeletal),
    info(LandmarkKey::PointB, "B", "Point B", "Deepest point of the mandibular concavity", Skeletal),
    info(LandmarkKey::Porion, "Po", "Porion", "Upper edge of the external auditory meatus", Skeletal),
    info(LandmarkKey::Orbitale, "Or", "Orbitale", "Lowest point of the orbital rim", Skeletal),
    info(LandmarkKey::Gonion, "Go", "Gonion", "Mandibular angle", Skeletal),
    info(LandmarkKey::Menton, "Me", "Menton", "Lowest point of the symphysis", Skeletal),
    info(LandmarkKey::Pogonion, "Pg", "Pogonion", "Most prominent point of the chin", Skeletal),
    info(LandmarkKey::Gnathion, "Gn", "Gnathion", "Most anterior-inferior point of the symphysis", Skeletal),
    info(LandmarkKey::Articulare, "Ar", "Articulare", "Ramus crossing the cranial base", Skeletal),
    info(LandmarkKey::Basion, "Ba", "Basion", "Anterior margin of the foramen magnum", Skeletal),
    info(LandmarkKey::Pterygoid, "Pt", "Pterygoid point", "Posterior-superior edge of the pterygomaxillary fissure", Skeletal),
    info(LandmarkKey::Condylion, "Co", "Condylion", "Most posterior-superior point of the condyle", Skeletal),
    info(LandmarkKey::UpperIncisorTip, "U1T", "Upper incisor tip", "Incisal edge of the upper central incisor", Dental),
    info(LandmarkKey::UpperIncisorApex, "U1A", "Upper incisor apex", "Root apex of the upper central incisor", Dental),
    info(LandmarkKey::LowerIncisorTip, "L1T", "Lower incisor tip", "Incisal edge of the lower central incisor", Dental),
    info(LandmarkKey::LowerIncisorApex, "L1A", "Lower incisor apex", "Root apex of the lower central incisor", Dental),
    info(LandmarkKey::OcclusalPosterior, "Oc1", "Occlusal plane (posterior)", "Molar cusps on the functional occlusal plane", Dental),
    info(LandmarkKey::OcclusalAnterior, "Oc2", "Occlusal plane (anterior)", "Incisor overlap on the functional occlusal plane", Dental),
    info(LandmarkKey::Pronasale, "Prn", "Pronasale", "Tip of the nose", SoftTissue),
    info(LandmarkKey::SoftPogonion, "PgS", "Soft tissue pogonion", "Most prominent point of the soft tissue chin", SoftTissue),
    info(LandmarkKey::LabraleInferius, "Li", "Labrale inferius", "Most anterior point of the lower lip", SoftTissue),
];

impl LandmarkKey {
    /// All keys in registry order
    pub fn all() -> impl Iterator<Item = LandmarkKey> {
        REGISTRY.iter().map(|entry| entry.key)
    }

    pub fn info(self) -> &'static LandmarkInfo {
        &REGISTRY[self as usize]
    }

    /// Short code used in persistence and on the command line
    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn group(self) -> LandmarkGroup {
        self.info().group
    }
}

impl fmt::Display for LandmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown landmark code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown landmark code: {0}")]
pub struct UnknownLandmark(pub String);

impl FromStr for LandmarkKey {
    type Err = UnknownLandmark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        REGISTRY
            .iter()
            .find(|entry| entry.code == code)
            .or_else(|| REGISTRY.iter().find(|entry| entry.code.eq_ignore_ascii_case(code)))
            .map(|entry| entry.key)
            .ok_or_else(|| UnknownLandmark(s.to_string()))
    }
}

impl From<LandmarkKey> for &'static str {
    fn from(key: LandmarkKey) -> Self {
        key.code()
    }
}

impl TryFrom<String> for LandmarkKey {
    type Error = UnknownLandmark;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Partial mapping from landmark to placed point
///
/// Any subset of keys may be present. Placing a key again overwrites it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: BTreeMap<LandmarkKey, Point>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the point placed for a key
    pub fn get(&self, key: LandmarkKey) -> Option<Point> {
        self.points.get(&key).copied()
    }

    pub fn contains(&self, key: LandmarkKey) -> bool {
        self.points.contains_key(&key)
    }

    /// Place or overwrite a point, returning the previous one
    pub fn set(&mut self, key: LandmarkKey, point: Point) -> Option<Point> {
        self.points.insert(key, point)
    }

    pub fn remove(&mut self, key: LandmarkKey) -> Option<Point> {
        self.points.remove(&key)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == REGISTRY.len()
    }

    /// Placed points in registry order
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkKey, Point)> + '_ {
        self.points.iter().map(|(key, point)| (*key, *point))
    }

    /// Look up several keys at once; `None` as soon as one is missing
    pub fn require<const N: usize>(&self, keys: [LandmarkKey; N]) -> Option<[Point; N]> {
        let mut out = [Point::ORIGIN; N];
        for (slot, key) in out.iter_mut().zip(keys) {
            *slot = self.get(key)?;
        }
        Some(out)
    }

    /// Keys from `keys` that have not been placed
    pub fn missing(&self, keys: &[LandmarkKey]) -> Vec<LandmarkKey> {
        keys.iter().copied().filter(|key| !self.contains(*key)).collect()
    }

    /// Next unplaced key after `current` in registry order, wrapping around
    ///
    /// Returns `current` itself when every landmark is placed.
    pub fn next_unset_after(&self, current: LandmarkKey) -> LandmarkKey {
        let start = current as usize;
        (1..=REGISTRY.len())
            .map(|offset| REGISTRY[(start + offset) % REGISTRY.len()].key)
            .find(|key| !self.contains(*key))
            .unwrap_or(current)
    }

    /// Copy with every point scaled per axis
    pub fn scaled(&self, sx: f64, sy: f64) -> LandmarkSet {
        LandmarkSet {
            points: self.points.iter().map(|(key, p)| (*key, p.scaled(sx, sy))).collect(),
        }
    }
}

impl FromIterator<(LandmarkKey, Point)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (LandmarkKey, Point)>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_indexed_by_key() {
        for (index, entry) in REGISTRY.iter().enumerate() {
            assert_eq!(entry.key as usize, index, "{} out of order", entry.code);
        }
    }

    #[test]
    fn test_codes_are_unique_ignoring_case() {
        for a in REGISTRY.iter() {
            for b in REGISTRY.iter() {
                if a.key != b.key {
                    assert!(!a.code.eq_ignore_ascii_case(b.code));
                }
            }
        }
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("S".parse::<LandmarkKey>(), Ok(LandmarkKey::Sella));
        assert_eq!("u1t".parse::<LandmarkKey>(), Ok(LandmarkKey::UpperIncisorTip));
        assert_eq!("PgS".parse::<LandmarkKey>(), Ok(LandmarkKey::SoftPogonion));
        assert_eq!("pg".parse::<LandmarkKey>(), Ok(LandmarkKey::Pogonion));
        assert!("Xx".parse::<LandmarkKey>().is_err());
    }

    #[test]
    fn test_set_overwrites() {
        let mut set = LandmarkSet::new();
        assert_eq!(set.set(LandmarkKey::Nasion, Point::new(1.0, 2.0)), None);
        assert_eq!(
            set.set(LandmarkKey::Nasion, Point::new(3.0, 4.0)),
            Some(Point::new(1.0, 2.0))
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(LandmarkKey::Nasion), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_require() {
        let mut set = LandmarkSet::new();
        set.set(LandmarkKey::Sella, Point::new(0.0, 100.0));
        set.set(LandmarkKey::Nasion, Point::new(0.0, 0.0));

        let [s, n] = set.require([LandmarkKey::Sella, LandmarkKey::Nasion]).unwrap();
        assert_eq!(s, Point::new(0.0, 100.0));
        assert_eq!(n, Point::new(0.0, 0.0));
        assert!(set.require([LandmarkKey::Sella, LandmarkKey::PointA]).is_none());
        assert_eq!(
            set.missing(&[LandmarkKey::Sella, LandmarkKey::PointA, LandmarkKey::PointB]),
            vec![LandmarkKey::PointA, LandmarkKey::PointB]
        );
    }

    #[test]
    fn test_next_unset_after_wraps() {
        let mut set = LandmarkSet::new();
        set.set(LandmarkKey::Sella, Point::ORIGIN);
        set.set(LandmarkKey::PointA, Point::ORIGIN);

        assert_eq!(set.next_unset_after(LandmarkKey::Sella), LandmarkKey::Nasion);
        assert_eq!(set.next_unset_after(LandmarkKey::Nasion), LandmarkKey::PointB);
        assert_eq!(
            set.next_unset_after(LandmarkKey::LabraleInferius),
            LandmarkKey::Nasion
        );
    }

    #[test]
    fn test_next_unset_after_complete_set() {
        let set: LandmarkSet = LandmarkKey::all().map(|key| (key, Point::ORIGIN)).collect();
        assert!(set.is_complete());
        assert_eq!(set.next_unset_after(LandmarkKey::Gonion), LandmarkKey::Gonion);
    }

    #[test]
    fn test_serializes_codes_in_registry_order() {
        let mut set = LandmarkSet::new();
        set.set(LandmarkKey::LabraleInferius, Point::new(1.0, 2.0));
        set.set(LandmarkKey::Sella, Point::new(3.5, 4.0));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"S":{"x":3.5,"y":4.0},"Li":{"x":1.0,"y":2.0}}"#);

        let back: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_unknown_code_rejected_on_deserialize() {
        let result: Result<LandmarkSet, _> = serde_json::from_str(r#"{"Zz":{"x":1,"y":2}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_scaled() {
        let mut set = LandmarkSet::new();
        set.set(LandmarkKey::Menton, Point::new(10.0, 20.0));
        let native = set.scaled(2.0, 0.5);
        assert_eq!(native.get(LandmarkKey::Menton), Some(Point::new(20.0, 10.0)));
    }
}
