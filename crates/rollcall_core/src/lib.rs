//! Core domain logic for the rollcall student record store.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_store, DbError, DbResult, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{
    Student, StudentForm, StudentId, StudentInput, StudentValidationError,
};
pub use repo::student_repo::{
    RepoError, RepoResult, SqliteStudentRepository, StudentListQuery, StudentRepository,
};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
