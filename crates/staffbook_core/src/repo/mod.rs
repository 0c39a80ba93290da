//! Entity repositories: validated CRUD persistence plus identity caching.
//!
//! # Responsibility
//! - Own all SQL for the `departments`/`employees`/`reviews` tables.
//! - Guarantee at most one in-memory instance per primary key via a
//!   per-repository identity cache.
//! - Enforce referential constraints through injected lookup capabilities.
//!
//! # Invariants
//! - Write paths validate the full record (field constraints and foreign-key
//!   existence) before touching SQL.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repositories hold `Rc<RefCell<_>>` caches and are deliberately
//!   single-threaded (`!Send`/`!Sync`).

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod employee_repo;
pub mod review_repo;

pub use department_repo::{DepartmentRepository, SharedDepartment, SqliteDepartmentRepository};
pub use employee_repo::{EmployeeRepository, SharedEmployee, SqliteEmployeeRepository};
pub use review_repo::{ReviewRepository, SharedReview, SqliteReviewRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and reconciliation operations.
#[derive(Debug)]
pub enum RepoError {
    /// A field or referential constraint failed before any SQL ran.
    Validation(ValidationError),
    /// Underlying SQLite failure, propagated unmodified.
    Db(DbError),
    /// Update target row no longer exists.
    NotFound { entity: &'static str, id: i64 },
    /// Operation requires a persisted record but the id is absent.
    NotPersisted { entity: &'static str },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotPersisted { entity } => write!(f, "{entity} has not been saved yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::NotPersisted { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError(value))
    }
}

/// Existence check for `employee_id` foreign keys.
///
/// Injected into [`SqliteReviewRepository`] so referential validation is an
/// explicit dependency rather than a hidden cross-entity call, and so tests
/// can substitute a stub without a live `employees` table.
pub trait EmployeeLookup {
    fn employee_exists(&self, id: i64) -> RepoResult<bool>;
}

/// Existence check for `department_id` foreign keys.
pub trait DepartmentLookup {
    fn department_exists(&self, id: i64) -> RepoResult<bool>;
}

impl<T: EmployeeLookup + ?Sized> EmployeeLookup for &T {
    fn employee_exists(&self, id: i64) -> RepoResult<bool> {
        (**self).employee_exists(id)
    }
}

impl<T: DepartmentLookup + ?Sized> DepartmentLookup for &T {
    fn department_exists(&self, id: i64) -> RepoResult<bool> {
        (**self).department_exists(id)
    }
}
