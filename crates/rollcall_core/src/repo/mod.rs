//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for student records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must validate form input before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateRoll`)
//!   in addition to DB transport errors.

pub mod student_repo;
