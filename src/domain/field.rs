//! Rules for text that ends up in a single field of a stored record.

use std::fmt;

use crate::domain::Rejection;

/// Separates the fields of a stored record.
pub const DELIMITER: char = ',';

/// Stands in for an absent optional value in a stored record.
pub const NULL_MARKER: &str = "None";

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// Identifiers must not be empty.
    Empty,
    /// The value contains the record delimiter.
    ContainsDelimiter,
    /// The value contains a line break.
    ContainsLineBreak,
    /// The value is the literal used to mark absent values.
    NullMarker,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("must not be empty"),
            Self::ContainsDelimiter => write!(f, "must not contain '{DELIMITER}'"),
            Self::ContainsLineBreak => f.write_str("must not contain line breaks"),
            Self::NullMarker => write!(f, "must not be '{NULL_MARKER}'"),
        }
    }
}

/// An identifier must be non-empty and storable.
pub(super) fn check_id(field: &'static str, value: &str) -> Result<(), Rejection> {
    if value.is_empty() {
        return Err(Rejection::InvalidField {
            field,
            problem: FieldProblem::Empty,
        });
    }
    check_text(field, value)
}

pub(super) fn check_text(field: &'static str, value: &str) -> Result<(), Rejection> {
    let problem = if value.contains(DELIMITER) {
        FieldProblem::ContainsDelimiter
    } else if value.contains(['\n', '\r']) {
        FieldProblem::ContainsLineBreak
    } else {
        return Ok(());
    };
    Err(Rejection::InvalidField { field, problem })
}
