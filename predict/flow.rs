//! # Disease Flows
//!
//! A flow is one form submission carried through validation, dispatch and
//! presentation. The three diseases share the pipeline but not the policy:
//! how strictly blanks are detected and whether the vector length is checked
//! before the model is called differ per disease.
//!
//! - Parkinson's trims entries before the blank check and compares the vector
//!   length with its own form.
//! - Kidney rejects blanks and non-numeric entries but leaves the length check
//!   to the classifier.
//! - Liver treats only the exact empty string as blank and compares the vector
//!   length with the classifier's declared arity.
//!
//! Every flow checks selection fields against their options first and rejects
//! `nan`, `inf` and overflowing entries as non-numeric.

use crate::dispatch::dispatch;
use crate::registry::ModelRegistry;
use crate::schema::{Disease, FieldKind, FieldSpec};
use crate::validate::{self, BlankRule, InputError, RawEntry};
use crate::verdict::{Tone, Verdict};
use itertools::{EitherOrBoth, Itertools};

/// Where, if anywhere, the vector length is compared before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityCheck {
    /// Against the number of model inputs on the form.
    Form,
    /// Against the classifier's `n_features_in`.
    Model,
    /// Not before dispatch; the classifier's own guard reports it.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub blank: BlankRule,
    pub arity: ArityCheck,
    pub blank_message: &'static str,
}

const NUMERIC_MESSAGE: &str = "⚠️ Invalid input! Please enter numerical values only.";

impl Policy {
    pub fn for_disease(disease: Disease) -> Self {
        match disease {
            Disease::Parkinsons => Policy {
                blank: BlankRule::Trimmed,
                arity: ArityCheck::Form,
                blank_message: "⚠️ Please fill in all input fields before predicting.",
            },
            Disease::Kidney => Policy {
                blank: BlankRule::Trimmed,
                arity: ArityCheck::Deferred,
                blank_message: "⚠️ Please fill in all input fields before predicting.",
            },
            Disease::Liver => Policy {
                blank: BlankRule::Exact,
                arity: ArityCheck::Model,
                blank_message: "⚠️ Please fill in all fields before predicting.",
            },
        }
    }
}

/// What a submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Verdict(Verdict),
    /// The input was rejected before the classifier was called. Most
    /// rejections carry `Tone::Warning`; the model arity check uses `Tone::Error`.
    Warning {
        error: InputError,
        message: String,
        tone: Tone,
    },
    /// The classifier could not produce a label.
    Error(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Verdict(verdict) => verdict.message(),
            Outcome::Warning { message, .. } => message,
            Outcome::Error(message) => message,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Outcome::Verdict(verdict) => verdict.tone(),
            Outcome::Warning { tone, .. } => *tone,
            Outcome::Error(_) => Tone::Error,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Outcome::Verdict(verdict) => Some(verdict),
            _ => None,
        }
    }
}

/// Pairs raw values with the form, in form order, keeping only model inputs.
///
/// Missing trailing values count as empty entries. Values beyond the end of
/// the form are kept under a generated label, so that a length check (or the
/// classifier) sees them.
pub fn model_entries<'a, S: AsRef<str>>(
    fields: &'static [FieldSpec],
    values: &'a [S],
) -> Vec<RawEntry<'a>> {
    fields
        .iter()
        .zip_longest(values.iter())
        .enumerate()
        .filter_map(|(position, pair)| match pair {
            EitherOrBoth::Both(field, value) => field
                .is_model_input()
                .then(|| RawEntry::new(field.label, value.as_ref())),
            EitherOrBoth::Left(field) => field
                .is_model_input()
                .then(|| RawEntry::new(field.label, "")),
            EitherOrBoth::Right(value) => Some(RawEntry::new(
                format!("extra input {}", position + 1),
                value.as_ref(),
            )),
        })
        .collect()
}

fn rejected(disease: Disease, error: InputError, message: String, tone: Tone) -> Outcome {
    log::warn!("{disease}: submission rejected: {error}");
    Outcome::Warning {
        error,
        message,
        tone,
    }
}

fn warning(disease: Disease, error: InputError, message: String) -> Outcome {
    rejected(disease, error, message, Tone::Warning)
}

/// Checks every selection field present in `values` against its options.
fn check_choices<S: AsRef<str>>(fields: &[FieldSpec], values: &[S]) -> Result<(), InputError> {
    for (field, value) in fields.iter().zip(values) {
        if let FieldKind::Choice(options) = field.kind {
            validate::check_choice(field.label, value.as_ref(), options)?;
        }
    }
    Ok(())
}

/// Runs one submission of the full form (choice fields included), in form order.
pub fn submit<S: AsRef<str>>(disease: Disease, values: &[S], registry: &ModelRegistry) -> Outcome {
    let policy = Policy::for_disease(disease);
    if let Err(error) = check_choices(disease.fields(), values) {
        let message = format!("⚠️ {error}");
        return warning(disease, error, message);
    }
    let entries = model_entries(disease.fields(), values);

    let features = match validate::parse_entries(&entries, policy.blank) {
        Ok(features) => features,
        Err(error @ InputError::EmptyField { .. }) => {
            return warning(disease, error, policy.blank_message.to_string());
        }
        Err(error) => return warning(disease, error, NUMERIC_MESSAGE.to_string()),
    };

    log::debug!("{disease}: user input {features:?}");
    log::debug!("{disease}: number of features {}", features.len());

    let model = registry.model(disease);
    match policy.arity {
        ArityCheck::Form => {
            if let Err(error) = validate::check_arity(&features, disease.model_input_count()) {
                let message = format!("⚠️ {error}");
                return warning(disease, error, message);
            }
        }
        ArityCheck::Model => {
            if let Err(error @ InputError::ArityMismatch { expected, found }) =
                validate::check_arity(&features, model.n_features_in())
            {
                let message =
                    format!("❌ Feature count mismatch: Expected {expected}, but got {found}.");
                return rejected(disease, error, message, Tone::Error);
            }
        }
        ArityCheck::Deferred => {}
    }

    match dispatch(model, &features) {
        Ok(label) => {
            let verdict = Verdict::new(disease, label);
            log::info!("{disease}: model returned {label}");
            Outcome::Verdict(verdict)
        }
        Err(e) => {
            log::error!("{disease}: prediction failed: {e}");
            Outcome::Error(format!("❌ Prediction failed: {e}"))
        }
    }
}
