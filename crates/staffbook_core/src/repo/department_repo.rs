//! Department repository contract and SQLite implementation.
//!
//! The root of the foreign-key chain: departments reference nothing, so this
//! repository takes no lookup dependency. Implements [`DepartmentLookup`] for
//! injection into the employee repository.

use crate::model::department::Department;
use crate::model::ValidationError;
use crate::repo::{DepartmentLookup, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const ENTITY: &str = "department";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT,
    location TEXT
);";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS departments;";

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

/// Shared handle to the single in-memory instance for one `departments` row.
pub type SharedDepartment = Rc<RefCell<Department>>;

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    fn create(&self, name: &str, location: &str) -> RepoResult<SharedDepartment>;
    fn save(&self, department: &SharedDepartment) -> RepoResult<SharedDepartment>;
    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedDepartment>>;
    fn update(&self, department: &SharedDepartment) -> RepoResult<()>;
    fn delete(&self, department: &SharedDepartment) -> RepoResult<()>;
    fn list_all(&self) -> RepoResult<Vec<SharedDepartment>>;
}

/// SQLite-backed department repository with a per-instance identity cache.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
    cache: RefCell<HashMap<i64, SharedDepartment>>,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn reconcile(&self, row: DepartmentRow) -> RepoResult<SharedDepartment> {
        let cached = self.cache.borrow().get(&row.id).cloned();
        if let Some(instance) = cached {
            {
                let mut department = instance.borrow_mut();
                department
                    .set_name(row.name)
                    .map_err(|err| invalid_row(row.id, &err))?;
                department
                    .set_location(row.location)
                    .map_err(|err| invalid_row(row.id, &err))?;
            }
            return Ok(instance);
        }

        let department = Department::restored(row.id, row.name, row.location)
            .map_err(|err| invalid_row(row.id, &err))?;
        let instance = Rc::new(RefCell::new(department));
        self.cache
            .borrow_mut()
            .insert(row.id, Rc::clone(&instance));
        Ok(instance)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        info!("event=table_create module=repo entity={ENTITY} status=ok");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(DROP_TABLE_SQL)?;
        info!("event=table_drop module=repo entity={ENTITY} status=ok");
        Ok(())
    }

    fn create(&self, name: &str, location: &str) -> RepoResult<SharedDepartment> {
        let department = Department::new(name, location)?;
        self.save(&Rc::new(RefCell::new(department)))
    }

    fn save(&self, department: &SharedDepartment) -> RepoResult<SharedDepartment> {
        if department.borrow().is_persisted() {
            self.update(department)?;
            return Ok(Rc::clone(department));
        }

        let (name, location) = {
            let department = department.borrow();
            (
                department.name().to_string(),
                department.location().to_string(),
            )
        };

        self.conn.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2);",
            params![name, location],
        )?;
        let id = self.conn.last_insert_rowid();

        department.borrow_mut().assign_id(id);
        self.cache.borrow_mut().insert(id, Rc::clone(department));
        Ok(Rc::clone(department))
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedDepartment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row(params![id], read_department_row).optional()?;

        match row {
            Some(row) => Ok(Some(self.reconcile(row)?)),
            None => Ok(None),
        }
    }

    fn update(&self, department: &SharedDepartment) -> RepoResult<()> {
        let (id, name, location) = {
            let department = department.borrow();
            match department.id() {
                Some(id) => (
                    id,
                    department.name().to_string(),
                    department.location().to_string(),
                ),
                None => return Err(RepoError::NotPersisted { entity: ENTITY }),
            }
        };

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3;",
            params![name, location, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete(&self, department: &SharedDepartment) -> RepoResult<()> {
        // Deleting a record that was never saved (or already deleted) is a no-op.
        // Rows still referenced by employees are refused by SQLite itself
        // (foreign_keys=ON) and surface as RepoError::Db.
        let id = match department.borrow().id() {
            Some(id) => id,
            None => return Ok(()),
        };

        self.conn
            .execute("DELETE FROM departments WHERE id = ?1;", params![id])?;
        self.cache.borrow_mut().remove(&id);
        department.borrow_mut().clear_id();
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<SharedDepartment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;

        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(self.reconcile(read_department_row(row)?)?);
        }
        Ok(departments)
    }
}

impl DepartmentLookup for SqliteDepartmentRepository<'_> {
    fn department_exists(&self, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?1);",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

/// Typed row shape at the storage boundary; columns are read by name.
struct DepartmentRow {
    id: i64,
    name: String,
    location: String,
}

fn read_department_row(row: &Row<'_>) -> rusqlite::Result<DepartmentRow> {
    Ok(DepartmentRow {
        id: row.get("id")?,
        name: row.get("name")?,
        location: row.get("location")?,
    })
}

fn invalid_row(id: i64, err: &ValidationError) -> RepoError {
    RepoError::InvalidData(format!("departments row {id}: {err}"))
}
