//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `staffbook_core` linkage.
//! - Bootstrap an in-memory database and the full schema as a sanity check.

use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    DepartmentRepository, EmployeeRepository, ReviewRepository, SqliteDepartmentRepository,
    SqliteEmployeeRepository, SqliteReviewRepository,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("staffbook_core version={}", staffbook_core::core_version());

    let conn = open_db_in_memory()?;
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn, &departments);
    let reviews = SqliteReviewRepository::new(&conn, &employees);

    departments.create_table()?;
    employees.create_table()?;
    reviews.create_table()?;

    println!("staffbook_core schema=ok");
    Ok(())
}
