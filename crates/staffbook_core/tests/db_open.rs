use rusqlite::Connection;
use staffbook_core::db::{open_db, open_db_in_memory};
use staffbook_core::{
    DepartmentRepository, EmployeeRepository, ReviewRepository, SqliteDepartmentRepository,
    SqliteEmployeeRepository, SqliteReviewRepository,
};

#[test]
fn open_db_in_memory_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(pragma_foreign_keys(&conn), 1);
}

#[test]
fn reopening_the_same_database_file_is_idempotent_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffbook.db");

    let review_id = {
        let conn = open_db(&path).unwrap();
        let departments = SqliteDepartmentRepository::new(&conn);
        let employees = SqliteEmployeeRepository::new(&conn, &departments);
        let reviews = SqliteReviewRepository::new(&conn, &employees);
        departments.create_table().unwrap();
        employees.create_table().unwrap();
        reviews.create_table().unwrap();

        let department = departments.create("Engineering", "Building A").unwrap();
        let employee = employees
            .create("Ada Lovelace", "Staff Engineer", department.borrow().id().unwrap())
            .unwrap();
        let review = reviews
            .create(2023, "Persisted across reopen", employee.borrow().id().unwrap())
            .unwrap();
        let id = review.borrow().id().unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(pragma_foreign_keys(&conn), 1);

    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn, &departments);
    let reviews = SqliteReviewRepository::new(&conn, &employees);
    // Repeated DDL against an already-initialized file is safe.
    reviews.create_table().unwrap();

    let reloaded = reviews.find_by_id(review_id).unwrap().unwrap();
    assert_eq!(reloaded.borrow().summary(), "Persisted across reopen");
}

fn pragma_foreign_keys(conn: &Connection) -> i64 {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap()
}
