//! Clinical wording: interpretation words and the summary paragraph
//!
//! The summary is a fixed template; its slot order and connecting prose are
//! an output contract shared by the CLI and every exported document, so the
//! text must be produced here and embedded verbatim downstream.

use crate::metric::MetricId;
use crate::norm::Judgment;
use crate::sheet::MeasurementSheet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for any undetermined value
pub const PLACEHOLDER: &str = "—";

/// Output language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale `{0}` (expected `en` or `es`)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Sex::Female, Locale::En) => "female",
            (Sex::Male, Locale::En) => "male",
            (Sex::Female, Locale::Es) => "femenino",
            (Sex::Male, Locale::Es) => "masculino",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sex `{0}` (expected `F` or `M`)")]
pub struct UnknownSex(pub String);

impl FromStr for Sex {
    type Err = UnknownSex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f" | "female" | "femenino" => Ok(Sex::Female),
            "m" | "male" | "masculino" => Ok(Sex::Male),
            _ => Err(UnknownSex(s.to_string())),
        }
    }
}

/// Optional patient context for the opening of the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub sex: Option<Sex>,
    pub age_years: Option<u32>,
}

/// Table interpretation word for a judgment
pub fn interpretation_word(judgment: Judgment, locale: Locale) -> &'static str {
    match (judgment, locale) {
        (Judgment::Within, _) => "normal",
        (Judgment::Above, Locale::En) => "increased",
        (Judgment::Below, Locale::En) => "decreased",
        (Judgment::Above, Locale::Es) => "mayor",
        (Judgment::Below, Locale::Es) => "menor",
        (Judgment::Undetermined, _) => PLACEHOLDER,
    }
}

/// Skeletal relationship derived from the ANB judgment alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkeletalClass {
    ClassI,
    ClassII,
    ClassIII,
}

impl SkeletalClass {
    pub fn from_anb(judgment: Judgment) -> Option<Self> {
        match judgment {
            Judgment::Above => Some(SkeletalClass::ClassII),
            Judgment::Within => Some(SkeletalClass::ClassI),
            Judgment::Below => Some(SkeletalClass::ClassIII),
            Judgment::Undetermined => None,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (SkeletalClass::ClassI, Locale::En) => "Class I",
            (SkeletalClass::ClassII, Locale::En) => "Class II",
            (SkeletalClass::ClassIII, Locale::En) => "Class III",
            (SkeletalClass::ClassI, Locale::Es) => "Clase I",
            (SkeletalClass::ClassII, Locale::Es) => "Clase II",
            (SkeletalClass::ClassIII, Locale::Es) => "Clase III",
        }
    }
}

/// Phrases for above / within / below
type Vocabulary = [&'static str; 3];

fn vocabulary(id: MetricId, locale: Locale) -> Option<Vocabulary> {
    let words = match (id, locale) {
        (MetricId::Sna, Locale::En) => ["protruded", "normal", "retruded"],
        (MetricId::Sna, Locale::Es) => ["protruido", "normal", "retruido"],
        (MetricId::Snb, Locale::En) => ["protruded", "normal", "retruded"],
        (MetricId::Snb, Locale::Es) => ["protruida", "normal", "retruida"],
        (MetricId::SnGoGn, Locale::En) => ["hyperdivergent", "normodivergent", "hypodivergent"],
        (MetricId::SnGoGn, Locale::Es) => ["hiperdivergente", "normodivergente", "hipodivergente"],
        (MetricId::U1NaAngle | MetricId::L1NbAngle, Locale::En) => {
            ["proclined", "normal", "retroclined"]
        }
        (MetricId::U1NaAngle | MetricId::L1NbAngle, Locale::Es) => {
            ["proinclinados", "normales", "retroinclinados"]
        }
        (MetricId::U1NaDistance, Locale::En) => ["protrusive", "normal", "retrusive"],
        (MetricId::U1NaDistance, Locale::Es) => ["protrusión", "normal", "retrusión"],
        (MetricId::L1NbDistance, Locale::En) => ["protruded", "normal", "retruded"],
        (MetricId::L1NbDistance, Locale::Es) => ["protruidos", "normales", "retruídos"],
        (MetricId::Interincisal, Locale::En) => {
            ["incisor retroclination", "normal", "incisor biprotrusion"]
        }
        (MetricId::Interincisal, Locale::Es) => {
            ["retroinclinación incisiva", "normal", "biprotrusión incisiva"]
        }
        (MetricId::LowerLipELine, Locale::En) => ["lip protrusion", "normal", "lip retrusion"],
        (MetricId::LowerLipELine, Locale::Es) => {
            ["protrusión labial", "normal", "retrusión labial"]
        }
        _ => return None,
    };
    Some(words)
}

fn indeterminate(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "indeterminate",
        Locale::Es => "indeterminado",
    }
}

/// Clinical phrase for one metric's judgment
///
/// Metrics without a narrative vocabulary fall back to the table word.
pub fn phrase(id: MetricId, judgment: Judgment, locale: Locale) -> &'static str {
    let Some([above, within, below]) = vocabulary(id, locale) else {
        return interpretation_word(judgment, locale);
    };
    match judgment {
        Judgment::Above => above,
        Judgment::Within => within,
        Judgment::Below => below,
        Judgment::Undetermined => indeterminate(locale),
    }
}

/// Filled template slots, in template order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeSlots {
    pub sex: Option<&'static str>,
    pub age: String,
    pub maxilla: &'static str,
    pub mandible: &'static str,
    pub skeletal_class: &'static str,
    pub growth: &'static str,
    pub upper_incisor_angulation: &'static str,
    pub upper_incisor_position: &'static str,
    pub lower_incisor_angulation: &'static str,
    pub lower_incisor_position: &'static str,
    pub interincisal: &'static str,
    pub lips: &'static str,
}

impl NarrativeSlots {
    pub fn from_sheet(sheet: &MeasurementSheet, patient: &PatientInfo, locale: Locale) -> Self {
        let slot = |id: MetricId| phrase(id, sheet.judgment(id), locale);

        Self {
            sex: patient.sex.map(|sex| sex.label(locale)),
            age: patient
                .age_years
                .map(|age| age.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            maxilla: slot(MetricId::Sna),
            mandible: slot(MetricId::Snb),
            skeletal_class: SkeletalClass::from_anb(sheet.judgment(MetricId::Anb))
                .map(|class| class.label(locale))
                .unwrap_or_else(|| indeterminate(locale)),
            growth: slot(MetricId::SnGoGn),
            upper_incisor_angulation: slot(MetricId::U1NaAngle),
            upper_incisor_position: slot(MetricId::U1NaDistance),
            lower_incisor_angulation: slot(MetricId::L1NbAngle),
            lower_incisor_position: slot(MetricId::L1NbDistance),
            interincisal: slot(MetricId::Interincisal),
            lips: slot(MetricId::LowerLipELine),
        }
    }

    pub fn render(&self, locale: Locale) -> String {
        let sex = self.sex.map(|s| format!("({s}) ")).unwrap_or_default();
        match locale {
            Locale::En => format!(
                "Patient {sex}aged {age} years, presents maxilla: {maxilla}, \
                 and mandible: {mandible}. \
                 Skeletal relationship of type: {class}. \
                 Craniofacial growth of type: {growth}. \
                 Dentally, the upper incisors show an angulation: {u1a}, and a position: {u1p}. \
                 The lower incisors show an angulation: {l1a}, and a position: {l1p}. \
                 Interincisal relationship: {inter} and lips in position: {lips}.",
                age = self.age,
                maxilla = self.maxilla,
                mandible = self.mandible,
                class = self.skeletal_class,
                growth = self.growth,
                u1a = self.upper_incisor_angulation,
                u1p = self.upper_incisor_position,
                l1a = self.lower_incisor_angulation,
                l1p = self.lower_incisor_position,
                inter = self.interincisal,
                lips = self.lips,
            ),
            Locale::Es => format!(
                "Paciente {sex}de {age} años, presenta maxilar superior: {maxilla}, \
                 y la mandíbula: {mandible}. \
                 Presenta una relación esqueletal de tipo: {class}. \
                 El paciente tiene un crecimiento craneofacial de tipo: {growth}. \
                 Dentalmente encontramos a los incisivos superiores con una angulación: {u1a}, \
                 y una posición: {u1p}. \
                 Los incisivos inferiores con una angulación: {l1a}, y una posición: {l1p}. \
                 La relación interincisal: {inter} y los labios en posición: {lips}.",
                age = self.age,
                maxilla = self.maxilla,
                mandible = self.mandible,
                class = self.skeletal_class,
                growth = self.growth,
                u1a = self.upper_incisor_angulation,
                u1p = self.upper_incisor_position,
                l1a = self.lower_incisor_angulation,
                l1p = self.lower_incisor_position,
                inter = self.interincisal,
                lips = self.lips,
            ),
        }
    }
}

/// The clinical summary paragraph for a sheet
pub fn clinical_summary(sheet: &MeasurementSheet, patient: &PatientInfo, locale: Locale) -> String {
    NarrativeSlots::from_sheet(sheet, patient, locale).render(locale)
}
