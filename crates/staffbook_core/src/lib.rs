//! Core domain logic for staffbook: a minimal HR record store over SQLite.
//! This crate is the single source of truth for record validation and
//! persistence invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{Department, Employee, Review, ValidationError, MIN_REVIEW_YEAR};
pub use repo::{
    DepartmentLookup, DepartmentRepository, EmployeeLookup, EmployeeRepository, RepoError,
    RepoResult, ReviewRepository, SharedDepartment, SharedEmployee, SharedReview,
    SqliteDepartmentRepository, SqliteEmployeeRepository, SqliteReviewRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
