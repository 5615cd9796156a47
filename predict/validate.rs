//! # Input Validation
//!
//! Turns raw form text into the ordered feature vector a classifier consumes.
//! Validation runs in three passes over the whole submission, so every field is
//! checked for presence before any of them is parsed:
//!
//! 1. presence (`EmptyField`),
//! 2. numeric parsing (`NonNumericValue`), where `nan`, `inf` and values that
//!    overflow to infinity count as non-numeric,
//! 3. vector length against the expected arity (`ArityMismatch`).
//!
//! Selection fields are not part of the vector; `check_choice` checks them
//! against their options before the passes run.
//!
//! The module is pure; turning an error into a user-facing message belongs to
//! the caller.

use std::borrow::Cow;
use thiserror::Error;

/// A raw form value paired with the label it was entered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub label: Cow<'a, str>,
    pub value: &'a str,
}

impl<'a> RawEntry<'a> {
    pub fn new(label: impl Into<Cow<'a, str>>, value: &'a str) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// How strictly an entry has to be empty to count as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankRule {
    /// Empty after trimming whitespace.
    Trimmed,
    /// Exactly the empty string. Whitespace-only entries fall through to parsing.
    Exact,
}

impl BlankRule {
    fn is_blank(self, value: &str) -> bool {
        match self {
            BlankRule::Trimmed => value.trim().is_empty(),
            BlankRule::Exact => value.is_empty(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("The field '{label}' is empty.")]
    EmptyField { label: String },
    #[error("The field '{label}' has a non-numeric value '{value}'.")]
    NonNumericValue { label: String, value: String },
    #[error("Expected {expected} inputs, but received {found}.")]
    ArityMismatch { expected: usize, found: usize },
    #[error("The field '{label}' must be one of {}, but received '{value}'.", .options.join(", "))]
    InvalidChoice {
        label: String,
        value: String,
        options: Vec<String>,
    },
}

/// Parses a single entry with the usual float grammar, ignoring surrounding
/// whitespace. Only finite results are accepted.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Matches a selection against its options, ignoring case and surrounding
/// whitespace.
pub fn check_choice(label: &str, value: &str, options: &[&str]) -> Result<(), InputError> {
    let value = value.trim();
    if options.iter().any(|option| option.eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    Err(InputError::InvalidChoice {
        label: label.to_string(),
        value: value.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
    })
}

/// Runs the presence and parsing passes and returns the vector in entry order.
pub fn parse_entries(entries: &[RawEntry<'_>], blank: BlankRule) -> Result<Vec<f64>, InputError> {
    if let Some(missing) = entries.iter().find(|e| blank.is_blank(e.value)) {
        return Err(InputError::EmptyField {
            label: missing.label.to_string(),
        });
    }

    entries
        .iter()
        .map(|entry| {
            parse_value(entry.value).ok_or_else(|| InputError::NonNumericValue {
                label: entry.label.to_string(),
                value: entry.value.to_string(),
            })
        })
        .collect()
}

pub fn check_arity(values: &[f64], expected: usize) -> Result<(), InputError> {
    if values.len() != expected {
        return Err(InputError::ArityMismatch {
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// The full validator: presence, parsing, then arity.
pub fn validate(
    entries: &[RawEntry<'_>],
    expected: usize,
    blank: BlankRule,
) -> Result<Vec<f64>, InputError> {
    let values = parse_entries(entries, blank)?;
    check_arity(&values, expected)?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries<'a>(values: &[&'a str]) -> Vec<RawEntry<'a>> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| RawEntry::new(format!("field {i}"), *v))
            .collect()
    }

    #[test]
    fn accepts_complete_numeric_input_in_order() {
        let parsed = validate(&entries(&["1.5", " -2 ", "3e2", "+0.25"]), 4, BlankRule::Trimmed)
            .expect("valid input");
        assert_eq!(parsed, vec![1.5, -2.0, 300.0, 0.25]);
    }

    #[test]
    fn blank_check_precedes_parsing() {
        // The non-numeric entry comes first, but presence is checked over the
        // whole submission before anything is parsed.
        let err = validate(&entries(&["abc", "", "1"]), 3, BlankRule::Trimmed).unwrap_err();
        assert_eq!(
            err,
            InputError::EmptyField {
                label: "field 1".into()
            }
        );
    }

    #[test]
    fn whitespace_only_entries_depend_on_the_blank_rule() {
        let raw = entries(&["1", "   "]);

        let trimmed = validate(&raw, 2, BlankRule::Trimmed).unwrap_err();
        assert!(matches!(trimmed, InputError::EmptyField { .. }));

        let exact = validate(&raw, 2, BlankRule::Exact).unwrap_err();
        assert!(matches!(exact, InputError::NonNumericValue { .. }));
    }

    #[test]
    fn non_numeric_value_names_the_field_and_text() {
        let err = validate(&entries(&["1", "2", "seven"]), 3, BlankRule::Exact).unwrap_err();
        assert_eq!(
            err,
            InputError::NonNumericValue {
                label: "field 2".into(),
                value: "seven".into()
            }
        );
    }

    #[test]
    fn arity_is_checked_after_parsing() {
        let err = validate(&entries(&["1", "2"]), 3, BlankRule::Trimmed).unwrap_err();
        assert_eq!(
            err,
            InputError::ArityMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(err.to_string(), "Expected 3 inputs, but received 2.");
    }

    #[test]
    fn parse_value_accepts_only_finite_numbers() {
        assert_eq!(parse_value("  42  "), Some(42.0));
        assert_eq!(parse_value("1e300"), Some(1e300));
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("-Infinity"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("1e999"), None);
        assert_eq!(parse_value("1,5"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn non_finite_entries_are_reported_as_non_numeric() {
        let err = validate(&entries(&["1", "nan"]), 2, BlankRule::Trimmed).unwrap_err();
        assert_eq!(
            err,
            InputError::NonNumericValue {
                label: "field 1".into(),
                value: "nan".into()
            }
        );
    }

    #[test]
    fn choices_match_their_options_loosely() {
        let options = ["Male", "Female"];
        assert!(check_choice("Gender", " female ", &options).is_ok());

        let err = check_choice("Gender", "48", &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The field 'Gender' must be one of Male, Female, but received '48'."
        );
    }
}
