//! Performance review record.
//!
//! # Responsibility
//! - Hold one row of the `reviews` table as a validated in-memory record.
//! - Reject out-of-range years and blank summaries at construction and on
//!   every mutation.
//!
//! # Invariants
//! - `year >= MIN_REVIEW_YEAR` and `summary` is non-blank at all times.
//! - `id` is assigned only by the repository layer (insert or row load) and
//!   cleared only on delete.

use super::{require_non_blank, ValidationError, MIN_REVIEW_YEAR};
use serde::{Deserialize, Serialize};

/// A yearly performance review tied to one employee.
///
/// Fields are private so every write goes through a validating setter.
/// Whether `employee_id` references a live employee row is the repository's
/// concern; this type only guards local field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReview")]
pub struct Review {
    id: Option<i64>,
    year: i32,
    summary: String,
    employee_id: i64,
}

/// Unvalidated wire shape. `Review` deserialization funnels through this so
/// invalid JSON cannot materialize an invalid record.
#[derive(Deserialize)]
struct RawReview {
    #[serde(default)]
    id: Option<i64>,
    year: i32,
    summary: String,
    employee_id: i64,
}

impl TryFrom<RawReview> for Review {
    type Error = ValidationError;

    fn try_from(raw: RawReview) -> Result<Self, Self::Error> {
        let mut review = Review::new(raw.year, raw.summary, raw.employee_id)?;
        review.id = raw.id;
        Ok(review)
    }
}

impl Review {
    /// Creates a transient (not yet persisted) review.
    pub fn new(
        year: i32,
        summary: impl Into<String>,
        employee_id: i64,
    ) -> Result<Self, ValidationError> {
        check_year(year)?;
        let summary = require_non_blank(summary, ValidationError::BlankSummary)?;
        Ok(Self {
            id: None,
            year,
            summary,
            employee_id,
        })
    }

    /// Rebuilds a persisted review from stored row values.
    pub(crate) fn restored(
        id: i64,
        year: i32,
        summary: String,
        employee_id: i64,
    ) -> Result<Self, ValidationError> {
        let mut review = Self::new(year, summary, employee_id)?;
        review.id = Some(id);
        Ok(review)
    }

    /// Primary key, or `None` while the review is transient.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// Whether this record currently maps to a database row.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_year(&mut self, year: i32) -> Result<(), ValidationError> {
        check_year(year)?;
        self.year = year;
        Ok(())
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        self.summary = require_non_blank(summary, ValidationError::BlankSummary)?;
        Ok(())
    }

    /// Points the review at another employee. Existence of the referenced
    /// employee row is verified by the repository when the change is written.
    pub fn set_employee_id(&mut self, employee_id: i64) {
        self.employee_id = employee_id;
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

fn check_year(year: i32) -> Result<(), ValidationError> {
    if year < MIN_REVIEW_YEAR {
        return Err(ValidationError::YearBeforeMinimum { year });
    }
    Ok(())
}
