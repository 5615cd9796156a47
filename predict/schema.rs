//! # Declared Input Schemas
//!
//! Every disease owns one fixed, ordered list of form fields. The order of the
//! model-bound fields is the order the classifier was trained on, so nothing in
//! this module may be reordered without retraining the matching artifact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three conditions the system screens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    Parkinsons,
    Kidney,
    Liver,
}

/// The kind of widget a field is collected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-text entry that must parse as a floating point number.
    Numeric,
    /// A fixed selection. Choice fields are shown on the form but never sent
    /// to the classifier.
    Choice(&'static [&'static str]),
}

/// One labeled input on a disease form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub icon: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn numeric(icon: &'static str, label: &'static str) -> Self {
        Self {
            icon,
            label,
            kind: FieldKind::Numeric,
        }
    }

    const fn choice(
        icon: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            icon,
            label,
            kind: FieldKind::Choice(options),
        }
    }

    /// Whether the field contributes an entry to the feature vector.
    pub fn is_model_input(&self) -> bool {
        matches!(self.kind, FieldKind::Numeric)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown disease '{0}'. Expected one of: parkinsons, kidney, liver.")]
pub struct UnknownDisease(pub String);

// Voice measurements, in the order of the Parkinson's training table.
static PARKINSONS_FIELDS: [FieldSpec; 22] = [
    FieldSpec::numeric("🔬", "MDVP:Fo(Hz)"),
    FieldSpec::numeric("🔬", "MDVP:Fhi(Hz)"),
    FieldSpec::numeric("🔬", "MDVP:Flo(Hz)"),
    FieldSpec::numeric("🔬", "MDVP:Jitter(%)"),
    FieldSpec::numeric("🔬", "MDVP:Jitter(Abs)"),
    FieldSpec::numeric("🔬", "MDVP:RAP"),
    FieldSpec::numeric("🔬", "MDVP:PPQ"),
    FieldSpec::numeric("🔬", "Jitter:DDP"),
    FieldSpec::numeric("🔬", "MDVP:Shimmer"),
    FieldSpec::numeric("🔬", "MDVP:Shimmer(dB)"),
    FieldSpec::numeric("🔬", "Shimmer:APQ3"),
    FieldSpec::numeric("🔬", "Shimmer:APQ5"),
    FieldSpec::numeric("🔬", "MDVP:APQ"),
    FieldSpec::numeric("🔬", "Shimmer:DDA"),
    FieldSpec::numeric("🔬", "NHR"),
    FieldSpec::numeric("🔬", "HNR"),
    FieldSpec::numeric("🔬", "RPDE"),
    FieldSpec::numeric("🔬", "DFA"),
    FieldSpec::numeric("🔬", "Spread1"),
    FieldSpec::numeric("🔬", "Spread2"),
    FieldSpec::numeric("🔬", "D2"),
    FieldSpec::numeric("🔬", "PPE"),
];

// The gender selection leads the form but is not a model input.
static KIDNEY_FIELDS: [FieldSpec; 25] = [
    FieldSpec::choice("⚧", "Gender", &["Male", "Female"]),
    FieldSpec::numeric("🧑", "Age"),
    FieldSpec::numeric("💉", "Blood Pressure"),
    FieldSpec::numeric("⚗️", "Specific Gravity"),
    FieldSpec::numeric("🧪", "Albumin"),
    FieldSpec::numeric("🍬", "Sugar"),
    FieldSpec::numeric("🩸", "RBC Count"),
    FieldSpec::numeric("🦠", "Pus Cells"),
    FieldSpec::numeric("🦠", "Pus Cell Clumps"),
    FieldSpec::numeric("🦠", "Bacteria"),
    FieldSpec::numeric("🩸", "Blood Glucose"),
    FieldSpec::numeric("🧪", "Blood Urea"),
    FieldSpec::numeric("🧪", "Serum Creatinine"),
    FieldSpec::numeric("💦", "Sodium"),
    FieldSpec::numeric("🧂", "Potassium"),
    FieldSpec::numeric("☁️", "Hemoglobin"),
    FieldSpec::numeric("🩸", "Packed Cell Volume"),
    FieldSpec::numeric("🩸", "White Blood Cell Count"),
    FieldSpec::numeric("🩸", "Red Blood Cell Count"),
    FieldSpec::numeric("🦠", "Hypertension"),
    FieldSpec::numeric("🩺", "Diabetes"),
    FieldSpec::numeric("💔", "Coronary Artery Disease"),
    FieldSpec::numeric("🫁", "Appetite"),
    FieldSpec::numeric("🛏️", "Pedal Edema"),
    FieldSpec::numeric("🫀", "Anemia"),
];

static LIVER_FIELDS: [FieldSpec; 10] = [
    FieldSpec::numeric("🧑", "Age"),
    FieldSpec::numeric("🩸", "Total_Bilirubin"),
    FieldSpec::numeric("🩸", "Direct_Bilirubin"),
    FieldSpec::numeric("🧪", "Alkaline_Phosphatase"),
    FieldSpec::numeric("🧪", "Alanine_Aminotransferase"),
    FieldSpec::numeric("🧪", "Aspartate_Aminotransferase"),
    FieldSpec::numeric("🍖", "Total_Proteins"),
    FieldSpec::numeric("🧪", "Albumin"),
    FieldSpec::numeric("🔬", "Albumin_and_Globulin_Ratio"),
    FieldSpec::numeric("👤", "Gender (Male=1, Female=0)"),
];

impl Disease {
    /// Navigation order; the first entry is the default page.
    pub const ALL: [Disease; 3] = [Disease::Parkinsons, Disease::Kidney, Disease::Liver];

    /// The URL path segment and command-line name.
    pub fn slug(self) -> &'static str {
        match self {
            Disease::Parkinsons => "parkinsons",
            Disease::Kidney => "kidney",
            Disease::Liver => "liver",
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Disease::Parkinsons => "Parkinson's Prediction",
            Disease::Kidney => "Kidney Prediction",
            Disease::Liver => "Liver Prediction",
        }
    }

    pub fn menu_icon(self) -> &'static str {
        match self {
            Disease::Parkinsons => "📈",
            Disease::Kidney => "❤️",
            Disease::Liver => "👤",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Disease::Parkinsons => "🧠 Parkinson's Disease Prediction",
            Disease::Kidney => "🚰 Kidney Disease Prediction",
            Disease::Liver => "🩺 Liver Disease Prediction",
        }
    }

    /// Heading color of the disease page.
    pub fn accent(self) -> &'static str {
        match self {
            Disease::Parkinsons => "#6A5ACD",
            Disease::Kidney => "#20B2AA",
            Disease::Liver => "#FF8C00",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Disease::Parkinsons => "🩺 Predict Parkinson's",
            Disease::Kidney => "🔍 Predict Kidney Disease",
            Disease::Liver => "🔍 Predict Liver Disease",
        }
    }

    /// File stem of the serialized classifier inside the model directory.
    pub fn model_stem(self) -> &'static str {
        match self {
            Disease::Parkinsons => "parkinsons_model",
            Disease::Kidney => "kidney_model",
            Disease::Liver => "liver_model",
        }
    }

    /// The complete form, in display and training order.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Disease::Parkinsons => &PARKINSONS_FIELDS,
            Disease::Kidney => &KIDNEY_FIELDS,
            Disease::Liver => &LIVER_FIELDS,
        }
    }

    /// Number of entries the feature vector has when the form is complete.
    pub fn model_input_count(self) -> usize {
        self.fields().iter().filter(|f| f.is_model_input()).count()
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Disease::Parkinsons => "Parkinson's",
            Disease::Kidney => "Kidney",
            Disease::Liver => "Liver",
        };
        f.write_str(name)
    }
}

impl FromStr for Disease {
    type Err = UnknownDisease;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Disease::ALL
            .into_iter()
            .find(|d| d.slug() == wanted)
            .ok_or_else(|| UnknownDisease(s.to_string()))
    }
}
