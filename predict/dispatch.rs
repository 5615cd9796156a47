//! Prediction dispatch: one synchronous, in-process call into a classifier.
//! There is no retry and no timeout; whatever the model reports is returned.

use crate::model::{Classifier, ModelError};
use std::fmt;

/// The binary outcome of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = ModelError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(ModelError::UnexpectedLabel(other)),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Classifies one validated feature vector.
pub fn dispatch(model: &dyn Classifier, features: &[f64]) -> Result<Label, ModelError> {
    let raw = model.predict(features)?;
    Label::try_from(raw)
}
