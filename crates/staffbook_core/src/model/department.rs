//! Department record.

use super::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// An organizational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDepartment")]
pub struct Department {
    id: Option<i64>,
    name: String,
    location: String,
}

#[derive(Deserialize)]
struct RawDepartment {
    #[serde(default)]
    id: Option<i64>,
    name: String,
    location: String,
}

impl TryFrom<RawDepartment> for Department {
    type Error = ValidationError;

    fn try_from(raw: RawDepartment) -> Result<Self, Self::Error> {
        let mut department = Department::new(raw.name, raw.location)?;
        department.id = raw.id;
        Ok(department)
    }
}

impl Department {
    /// Creates a transient (not yet persisted) department.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = require_non_blank(name, ValidationError::BlankName)?;
        let location = require_non_blank(location, ValidationError::BlankLocation)?;
        Ok(Self {
            id: None,
            name,
            location,
        })
    }

    /// Rebuilds a persisted department from stored row values.
    pub(crate) fn restored(
        id: i64,
        name: String,
        location: String,
    ) -> Result<Self, ValidationError> {
        let mut department = Self::new(name, location)?;
        department.id = Some(id);
        Ok(department)
    }

    /// Primary key, or `None` while the department is transient.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_non_blank(name, ValidationError::BlankName)?;
        Ok(())
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> Result<(), ValidationError> {
        self.location = require_non_blank(location, ValidationError::BlankLocation)?;
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}
