//! Student domain model and form validation.
//!
//! # Responsibility
//! - Define the stored `Student` record and the raw `StudentForm` input.
//! - Normalize form input (trimming, integer year) into `StudentInput`.
//!
//! # Invariants
//! - `id` is assigned by the store at creation and never reused or changed.
//! - `roll` and `name` are non-empty after trimming in every `StudentInput`.
//! - `department` and `email` may be empty but are never untrimmed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned identifier for a student record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type StudentId = i64;

/// Canonical persisted record for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Auto-incremented primary identity. Immutable once assigned.
    pub id: StudentId,
    /// Roll number, unique across all records.
    pub roll: String,
    /// Full name.
    pub name: String,
    /// Department label. Empty string when not provided.
    pub department: String,
    /// Year of study. Expected domain is 1..=4 but only integer-ness is
    /// enforced, matching the form contract.
    pub year: i64,
    /// Contact email. Empty string when not provided; no format validation.
    pub email: String,
}

/// Raw form-shaped input for create/edit submissions.
///
/// All fields carry the text exactly as the caller received it; nothing is
/// trimmed or parsed until [`StudentForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub roll: String,
    pub name: String,
    pub department: String,
    /// Year as submitted. Must parse as an integer to validate.
    pub year: String,
    /// Optional email field; absent behaves the same as empty.
    pub email: Option<String>,
}

/// Validated, normalized field set ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInput {
    pub roll: String,
    pub name: String,
    pub department: String,
    pub year: i64,
    pub email: String,
}

/// Validation failure for a create/edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    /// `roll` was empty or whitespace-only.
    MissingRoll,
    /// `name` was empty or whitespace-only.
    MissingName,
    /// `year` did not parse as an integer.
    InvalidYear { raw: String },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoll => write!(f, "roll number is required"),
            Self::MissingName => write!(f, "name is required"),
            Self::InvalidYear { raw } => {
                write!(f, "year must be a whole number, got `{}`", raw.trim())
            }
        }
    }
}

impl Error for StudentValidationError {}

impl StudentForm {
    /// Normalizes and validates the submitted fields.
    ///
    /// # Contract
    /// - `roll`, `name`, `department`, `email` are whitespace-trimmed.
    /// - `roll` and `name` must be non-empty after trimming.
    /// - `year` must parse as an integer after trimming.
    /// - Absent `email` normalizes to the empty string.
    pub fn validate(&self) -> Result<StudentInput, StudentValidationError> {
        let roll = self.roll.trim();
        if roll.is_empty() {
            return Err(StudentValidationError::MissingRoll);
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(StudentValidationError::MissingName);
        }

        let year = self
            .year
            .trim()
            .parse::<i64>()
            .map_err(|_| StudentValidationError::InvalidYear {
                raw: self.year.clone(),
            })?;

        Ok(StudentInput {
            roll: roll.to_string(),
            name: name.to_string(),
            department: self.department.trim().to_string(),
            year,
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl StudentInput {
    /// Combines validated fields with a store-assigned id into a full record.
    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            roll: self.roll,
            name: self.name,
            department: self.department,
            year: self.year,
            email: self.email,
        }
    }
}
