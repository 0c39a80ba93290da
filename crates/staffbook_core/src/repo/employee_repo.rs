//! Employee repository contract and SQLite implementation.
//!
//! Mirrors the review repository pattern: validated writes, per-repository
//! identity cache, injected foreign-key lookup (here: departments). Also
//! implements [`EmployeeLookup`] so it can be injected into the review
//! repository.

use crate::model::employee::Employee;
use crate::model::ValidationError;
use crate::repo::{DepartmentLookup, EmployeeLookup, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const ENTITY: &str = "employee";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT,
    department_id INTEGER,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS employees;";

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, job_title, department_id FROM employees";

/// Shared handle to the single in-memory instance for one `employees` row.
pub type SharedEmployee = Rc<RefCell<Employee>>;

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    fn create(&self, name: &str, job_title: &str, department_id: i64)
        -> RepoResult<SharedEmployee>;
    fn save(&self, employee: &SharedEmployee) -> RepoResult<SharedEmployee>;
    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedEmployee>>;
    fn update(&self, employee: &SharedEmployee) -> RepoResult<()>;
    fn delete(&self, employee: &SharedEmployee) -> RepoResult<()>;
    fn list_all(&self) -> RepoResult<Vec<SharedEmployee>>;
}

/// SQLite-backed employee repository with a per-instance identity cache.
pub struct SqliteEmployeeRepository<'conn, L> {
    conn: &'conn Connection,
    departments: L,
    cache: RefCell<HashMap<i64, SharedEmployee>>,
}

impl<'conn, L: DepartmentLookup> SqliteEmployeeRepository<'conn, L> {
    /// Creates a repository over a bootstrapped connection and a department
    /// existence-check capability.
    pub fn new(conn: &'conn Connection, departments: L) -> Self {
        Self {
            conn,
            departments,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn check_department(&self, department_id: i64) -> RepoResult<()> {
        if self.departments.department_exists(department_id)? {
            Ok(())
        } else {
            Err(ValidationError::UnknownDepartment(department_id).into())
        }
    }

    fn reconcile(&self, row: EmployeeRow) -> RepoResult<SharedEmployee> {
        let cached = self.cache.borrow().get(&row.id).cloned();
        if let Some(instance) = cached {
            {
                let mut employee = instance.borrow_mut();
                employee
                    .set_name(row.name)
                    .map_err(|err| invalid_row(row.id, &err))?;
                employee
                    .set_job_title(row.job_title)
                    .map_err(|err| invalid_row(row.id, &err))?;
                employee.set_department_id(row.department_id);
            }
            return Ok(instance);
        }

        let employee = Employee::restored(row.id, row.name, row.job_title, row.department_id)
            .map_err(|err| invalid_row(row.id, &err))?;
        let instance = Rc::new(RefCell::new(employee));
        self.cache
            .borrow_mut()
            .insert(row.id, Rc::clone(&instance));
        Ok(instance)
    }
}

impl<L: DepartmentLookup> EmployeeRepository for SqliteEmployeeRepository<'_, L> {
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

    fn create(
        &self,
        name: &str,
        job_title: &str,
        department_id: i64,
    ) -> RepoResult<SharedEmployee> {
        let employee = Employee::new(name, job_title, department_id)?;
        self.save(&Rc::new(RefCell::new(employee)))
    }

    fn save(&self, employee: &SharedEmployee) -> RepoResult<SharedEmployee> {
        if employee.borrow().is_persisted() {
            self.update(employee)?;
            return Ok(Rc::clone(employee));
        }

        let (name, job_title, department_id) = {
            let employee = employee.borrow();
            (
                employee.name().to_string(),
                employee.job_title().to_string(),
                employee.department_id(),
            )
        };
        self.check_department(department_id)?;

        self.conn.execute(
            "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3);",
            params![name, job_title, department_id],
        )?;
        let id = self.conn.last_insert_rowid();

        employee.borrow_mut().assign_id(id);
        self.cache.borrow_mut().insert(id, Rc::clone(employee));
        Ok(Rc::clone(employee))
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedEmployee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row(params![id], read_employee_row).optional()?;

        match row {
            Some(row) => Ok(Some(self.reconcile(row)?)),
            None => Ok(None),
        }
    }

    fn update(&self, employee: &SharedEmployee) -> RepoResult<()> {
        let (id, name, job_title, department_id) = {
            let employee = employee.borrow();
            match employee.id() {
                Some(id) => (
                    id,
                    employee.name().to_string(),
                    employee.job_title().to_string(),
                    employee.department_id(),
                ),
                None => return Err(RepoError::NotPersisted { entity: ENTITY }),
            }
        };
        self.check_department(department_id)?;

        let changed = self.conn.execute(
            "UPDATE employees SET name = ?1, job_title = ?2, department_id = ?3 WHERE id = ?4;",
            params![name, job_title, department_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete(&self, employee: &SharedEmployee) -> RepoResult<()> {
        // Deleting a record that was never saved (or already deleted) is a no-op.
        let id = match employee.borrow().id() {
            Some(id) => id,
            None => return Ok(()),
        };

        self.conn
            .execute("DELETE FROM employees WHERE id = ?1;", params![id])?;
        self.cache.borrow_mut().remove(&id);
        employee.borrow_mut().clear_id();
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<SharedEmployee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;

        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(self.reconcile(read_employee_row(row)?)?);
        }
        Ok(employees)
    }
}

impl<L: DepartmentLookup> EmployeeLookup for SqliteEmployeeRepository<'_, L> {
    fn employee_exists(&self, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?1);",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

/// Typed row shape at the storage boundary; columns are read by name.
struct EmployeeRow {
    id: i64,
    name: String,
    job_title: String,
    department_id: i64,
}

fn read_employee_row(row: &Row<'_>) -> rusqlite::Result<EmployeeRow> {
    Ok(EmployeeRow {
        id: row.get("id")?,
        name: row.get("name")?,
        job_title: row.get("job_title")?,
        department_id: row.get("department_id")?,
    })
}

fn invalid_row(id: i64, err: &ValidationError) -> RepoError {
    RepoError::InvalidData(format!("employees row {id}: {err}"))
}
