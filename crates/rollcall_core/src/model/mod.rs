//! Domain model for student records.
//!
//! # Responsibility
//! - Define the canonical record shape persisted in the `students` table.
//! - Own form-input validation and normalization rules.
//!
//! # Invariants
//! - Every persisted student is identified by a stable `StudentId`.
//! - Field normalization (trimming, year parsing) happens exactly once, in
//!   `StudentForm::validate`, before any persistence.

pub mod student;
