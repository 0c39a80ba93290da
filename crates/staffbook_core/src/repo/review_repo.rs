//! Review repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide validated CRUD over the `reviews` table.
//! - Reconcile loaded rows against the identity cache so one row never has
//!   two in-memory instances.
//!
//! # Invariants
//! - `employee_id` is checked against the injected [`EmployeeLookup`] on
//!   every write path.
//! - `find_by_id`/`list_all` return the cached instance for a known id,
//!   refreshed in place from the row.
//! - A deleted record leaves the cache and its id is cleared; deleting a
//!   transient record is a no-op.

use crate::model::review::Review;
use crate::model::ValidationError;
use crate::repo::{EmployeeLookup, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const ENTITY: &str = "review";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY,
    year INT,
    summary TEXT,
    employee_id INTEGER,
    FOREIGN KEY (employee_id) REFERENCES employees(id)
);";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS reviews;";

const REVIEW_SELECT_SQL: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Shared handle to the single in-memory instance for one `reviews` row.
pub type SharedReview = Rc<RefCell<Review>>;

/// Repository interface for review CRUD operations.
pub trait ReviewRepository {
    /// Idempotent `CREATE TABLE IF NOT EXISTS` for the `reviews` table.
    fn create_table(&self) -> RepoResult<()>;
    /// Idempotent `DROP TABLE IF EXISTS` for the `reviews` table.
    fn drop_table(&self) -> RepoResult<()>;
    /// Validated construct-then-save convenience.
    fn create(&self, year: i32, summary: &str, employee_id: i64) -> RepoResult<SharedReview>;
    /// Upsert: inserts a transient record (assigning its id and caching it),
    /// delegates to [`ReviewRepository::update`] for a persisted one. Returns
    /// the persisted shared instance on both paths.
    fn save(&self, review: &SharedReview) -> RepoResult<SharedReview>;
    /// Looks up one row by primary key, reconciled through the identity cache.
    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedReview>>;
    /// Writes all mutable fields by id. Last writer wins.
    fn update(&self, review: &SharedReview) -> RepoResult<()>;
    /// Deletes the row, evicts the cache entry and clears the record's id.
    fn delete(&self, review: &SharedReview) -> RepoResult<()>;
    /// All rows in natural (rowid) order, each reconciled through the cache.
    fn list_all(&self) -> RepoResult<Vec<SharedReview>>;
}

/// SQLite-backed review repository with a per-instance identity cache.
pub struct SqliteReviewRepository<'conn, L> {
    conn: &'conn Connection,
    employees: L,
    cache: RefCell<HashMap<i64, SharedReview>>,
}

impl<'conn, L: EmployeeLookup> SqliteReviewRepository<'conn, L> {
    /// Creates a repository over a bootstrapped connection and an employee
    /// existence-check capability.
    pub fn new(conn: &'conn Connection, employees: L) -> Self {
        Self {
            conn,
            employees,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn check_employee(&self, employee_id: i64) -> RepoResult<()> {
        if self.employees.employee_exists(employee_id)? {
            Ok(())
        } else {
            Err(ValidationError::UnknownEmployee(employee_id).into())
        }
    }

    /// Identity reconciliation: a cache hit refreshes the existing instance
    /// in place and returns it; a miss constructs, caches and returns a new
    /// instance carrying the row's id.
    fn reconcile(&self, row: ReviewRow) -> RepoResult<SharedReview> {
        let cached = self.cache.borrow().get(&row.id).cloned();
        if let Some(instance) = cached {
            {
                let mut review = instance.borrow_mut();
                review
                    .set_year(row.year)
                    .map_err(|err| invalid_row(row.id, &err))?;
                review
                    .set_summary(row.summary)
                    .map_err(|err| invalid_row(row.id, &err))?;
                review.set_employee_id(row.employee_id);
            }
            return Ok(instance);
        }

        let review = Review::restored(row.id, row.year, row.summary, row.employee_id)
            .map_err(|err| invalid_row(row.id, &err))?;
        let instance = Rc::new(RefCell::new(review));
        self.cache
            .borrow_mut()
            .insert(row.id, Rc::clone(&instance));
        Ok(instance)
    }
}

impl<L: EmployeeLookup> ReviewRepository for SqliteReviewRepository<'_, L> {
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

    fn create(&self, year: i32, summary: &str, employee_id: i64) -> RepoResult<SharedReview> {
        let review = Review::new(year, summary, employee_id)?;
        self.save(&Rc::new(RefCell::new(review)))
    }

    fn save(&self, review: &SharedReview) -> RepoResult<SharedReview> {
        if review.borrow().is_persisted() {
            self.update(review)?;
            return Ok(Rc::clone(review));
        }

        let (year, summary, employee_id) = {
            let review = review.borrow();
            (
                review.year(),
                review.summary().to_string(),
                review.employee_id(),
            )
        };
        self.check_employee(employee_id)?;

        self.conn.execute(
            "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3);",
            params![year, summary, employee_id],
        )?;
        let id = self.conn.last_insert_rowid();

        review.borrow_mut().assign_id(id);
        self.cache.borrow_mut().insert(id, Rc::clone(review));
        Ok(Rc::clone(review))
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<SharedReview>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row(params![id], read_review_row).optional()?;

        match row {
            Some(row) => Ok(Some(self.reconcile(row)?)),
            None => Ok(None),
        }
    }

    fn update(&self, review: &SharedReview) -> RepoResult<()> {
        let (id, year, summary, employee_id) = {
            let review = review.borrow();
            match review.id() {
                Some(id) => (
                    id,
                    review.year(),
                    review.summary().to_string(),
                    review.employee_id(),
                ),
                None => return Err(RepoError::NotPersisted { entity: ENTITY }),
            }
        };
        self.check_employee(employee_id)?;

        let changed = self.conn.execute(
            "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4;",
            params![year, summary, employee_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete(&self, review: &SharedReview) -> RepoResult<()> {
        // Deleting a record that was never saved (or already deleted) is a no-op.
        let id = match review.borrow().id() {
            Some(id) => id,
            None => return Ok(()),
        };

        self.conn
            .execute("DELETE FROM reviews WHERE id = ?1;", params![id])?;
        self.cache.borrow_mut().remove(&id);
        review.borrow_mut().clear_id();
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<SharedReview>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;

        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(self.reconcile(read_review_row(row)?)?);
        }
        Ok(reviews)
    }
}

/// Typed row shape at the storage boundary; columns are read by name.
struct ReviewRow {
    id: i64,
    year: i32,
    summary: String,
    employee_id: i64,
}

fn read_review_row(row: &Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok(ReviewRow {
        id: row.get("id")?,
        year: row.get("year")?,
        summary: row.get("summary")?,
        employee_id: row.get("employee_id")?,
    })
}

fn invalid_row(id: i64, err: &ValidationError) -> RepoError {
    RepoError::InvalidData(format!("reviews row {id}: {err}"))
}
