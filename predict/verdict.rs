//! Result presentation: a label becomes one of two fixed sentences per disease.

use crate::dispatch::Label;
use crate::schema::Disease;
use std::fmt;

/// How a line of output is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A positive finding.
    Danger,
    /// A negative finding.
    Safe,
    /// The submission was rejected before reaching the model.
    Warning,
    /// The model could not produce a label.
    Error,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Danger => "danger",
            Tone::Safe => "safe",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub disease: Disease,
    pub label: Label,
}

impl Verdict {
    pub fn new(disease: Disease, label: Label) -> Self {
        Self { disease, label }
    }

    pub fn message(&self) -> &'static str {
        match (self.disease, self.label) {
            (Disease::Parkinsons, Label::Positive) => "🟥 The person has Parkinson's disease",
            (Disease::Parkinsons, Label::Negative) => "🟩 No Parkinson's disease detected",
            (Disease::Kidney, Label::Positive) => "🟥 The person has Kidney Disease",
            (Disease::Kidney, Label::Negative) => "🟩 No Kidney Disease detected",
            (Disease::Liver, Label::Positive) => "🟥 The person has Liver Disease",
            (Disease::Liver, Label::Negative) => "🟩 No Liver Disease detected",
        }
    }

    pub fn tone(&self) -> Tone {
        match self.label {
            Label::Positive => Tone::Danger,
            Label::Negative => Tone::Safe,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
