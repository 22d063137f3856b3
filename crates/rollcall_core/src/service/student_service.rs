//! Student record use-case service.
//!
//! # Responsibility
//! - Provide the five record operations consumed by presentation layers.
//! - Delegate validation and persistence to the repository contract.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::student::{Student, StudentForm, StudentId};
use crate::repo::student_repo::{RepoError, RepoResult, StudentListQuery, StudentRepository};

/// Use-case service wrapper for student record operations.
///
/// Owns the repository (and through it the store handle); callers hold one
/// service per store and drive every mutation through it.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new student, returning it with its assigned id.
    pub fn create_student(&self, form: &StudentForm) -> RepoResult<Student> {
        self.repo.create_student(form)
    }

    /// Gets one student by id.
    ///
    /// Unlike the repository read, an absent id is an error here: callers of
    /// the service always target a specific record.
    pub fn get_student(&self, id: StudentId) -> RepoResult<Student> {
        self.repo
            .get_student(id)?
            .ok_or(RepoError::NotFound(id))
    }

    /// Lists students, newest first, with optional substring filtering.
    pub fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        self.repo.list_students(query)
    }

    /// Replaces all mutable fields of an existing student.
    pub fn update_student(&self, id: StudentId, form: &StudentForm) -> RepoResult<Student> {
        self.repo.update_student(id, form)
    }

    /// Hard-deletes a student. Deleting an absent id reports `NotFound`;
    /// callers may surface that as a harmless no-op.
    pub fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        self.repo.delete_student(id)
    }
}
