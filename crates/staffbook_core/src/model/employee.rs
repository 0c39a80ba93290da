//! Employee record.
//!
//! Same validation discipline as [`super::review::Review`]: private fields,
//! validating constructor and setters, repository-assigned id.

use super::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// A staff member belonging to one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEmployee")]
pub struct Employee {
    id: Option<i64>,
    name: String,
    job_title: String,
    department_id: i64,
}

#[derive(Deserialize)]
struct RawEmployee {
    #[serde(default)]
    id: Option<i64>,
    name: String,
    job_title: String,
    department_id: i64,
}

impl TryFrom<RawEmployee> for Employee {
    type Error = ValidationError;

    fn try_from(raw: RawEmployee) -> Result<Self, Self::Error> {
        let mut employee = Employee::new(raw.name, raw.job_title, raw.department_id)?;
        employee.id = raw.id;
        Ok(employee)
    }
}

impl Employee {
    /// Creates a transient (not yet persisted) employee.
    pub fn new(
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: i64,
    ) -> Result<Self, ValidationError> {
        let name = require_non_blank(name, ValidationError::BlankName)?;
        let job_title = require_non_blank(job_title, ValidationError::BlankJobTitle)?;
        Ok(Self {
            id: None,
            name,
            job_title,
            department_id,
        })
    }

    /// Rebuilds a persisted employee from stored row values.
    pub(crate) fn restored(
        id: i64,
        name: String,
        job_title: String,
        department_id: i64,
    ) -> Result<Self, ValidationError> {
        let mut employee = Self::new(name, job_title, department_id)?;
        employee.id = Some(id);
        Ok(employee)
    }

    /// Primary key, or `None` while the employee is transient.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_non_blank(name, ValidationError::BlankName)?;
        Ok(())
    }

    pub fn set_job_title(&mut self, job_title: impl Into<String>) -> Result<(), ValidationError> {
        self.job_title = require_non_blank(job_title, ValidationError::BlankJobTitle)?;
        Ok(())
    }

    /// Moves the employee to another department. Existence of the referenced
    /// department row is verified by the repository when the change is written.
    pub fn set_department_id(&mut self, department_id: i64) {
        self.department_id = department_id;
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}
