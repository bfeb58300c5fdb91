//! Likert value object for the five-point agreement scale.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Fixed option labels presented with every question, in scale order.
pub const LIKERT_OPTIONS: [&str; 5] = [
    "Disagree strongly",
    "Disagree a little",
    "Neither agree nor disagree",
    "Agree a little",
    "Agree strongly",
];

/// Five-point agreement scale: 1 (disagree strongly) to 5 (agree strongly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikertValue(i32);

impl LikertValue {
    /// Creates a LikertValue from an integer, returning error if out of range.
    pub fn try_from_i32(value: i32) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range("value", 1, 5, value))
        }
    }

    /// Returns the numeric value (1-5).
    pub fn value(&self) -> i32 {
        self.0
    }

    /// Returns the display label for this value.
    pub fn label(&self) -> &'static str {
        LIKERT_OPTIONS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for LikertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
