use rusqlite::Connection;
use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    DepartmentLookup, DepartmentRepository, EmployeeRepository, RepoError,
    SqliteDepartmentRepository, SqliteEmployeeRepository, ValidationError,
};
use std::rc::Rc;

fn open_with_schema() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let departments = SqliteDepartmentRepository::new(&conn);
    departments.create_table().unwrap();
    conn
}

#[test]
fn create_and_find_roundtrip() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    let created = departments.create("Engineering", "Building A").unwrap();
    let id = created.borrow().id().unwrap();

    let found = departments.find_by_id(id).unwrap().unwrap();
    assert!(Rc::ptr_eq(&created, &found));
    let department = found.borrow();
    assert_eq!(department.name(), "Engineering");
    assert_eq!(department.location(), "Building A");
}

#[test]
fn create_rejects_blank_fields() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    let name_err = departments.create("", "Somewhere").unwrap_err();
    assert!(matches!(
        name_err,
        RepoError::Validation(ValidationError::BlankName)
    ));

    let location_err = departments.create("Nameless", "   ").unwrap_err();
    assert!(matches!(
        location_err,
        RepoError::Validation(ValidationError::BlankLocation)
    ));
}

#[test]
fn update_persists_field_changes() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    let department = departments.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id().unwrap();

    {
        let mut department = department.borrow_mut();
        department.set_name("Platform Engineering").unwrap();
        department.set_location("Building C").unwrap();
    }
    departments.update(&department).unwrap();

    let fresh = SqliteDepartmentRepository::new(&conn);
    let reloaded = fresh.find_by_id(id).unwrap().unwrap();
    assert_eq!(reloaded.borrow().name(), "Platform Engineering");
    assert_eq!(reloaded.borrow().location(), "Building C");
}

#[test]
fn delete_is_a_no_op_for_transient_departments() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    let transient = Rc::new(std::cell::RefCell::new(
        staffbook_core::Department::new("Never Saved", "Nowhere").unwrap(),
    ));
    departments.delete(&transient).unwrap();
    assert_eq!(transient.borrow().id(), None);
}

#[test]
fn deleting_a_referenced_department_surfaces_the_constraint_error() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn, &departments);
    employees.create_table().unwrap();

    let department = departments.create("Engineering", "Building A").unwrap();
    let department_id = department.borrow().id().unwrap();
    let employee = employees
        .create("Blocking Reference", "Engineer", department_id)
        .unwrap();

    // foreign_keys=ON: SQLite refuses to orphan the employee row.
    let err = departments.delete(&department).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(department.borrow().id(), Some(department_id));

    // Removing the referencing employee unblocks the delete.
    employees.delete(&employee).unwrap();
    departments.delete(&department).unwrap();
    assert_eq!(department.borrow().id(), None);
    assert!(departments.find_by_id(department_id).unwrap().is_none());
}

#[test]
fn department_exists_tracks_rows() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    assert!(!departments.department_exists(1).unwrap());
    let department = departments.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id().unwrap();
    assert!(departments.department_exists(id).unwrap());
}

#[test]
fn list_all_returns_departments_in_id_order() {
    let conn = open_with_schema();
    let departments = SqliteDepartmentRepository::new(&conn);

    let first = departments.create("Engineering", "Building A").unwrap();
    let second = departments.create("Research", "Building B").unwrap();
    let third = departments.create("Operations", "Building C").unwrap();

    let all = departments.list_all().unwrap();
    assert_eq!(all.len(), 3);
    assert!(Rc::ptr_eq(&all[0], &first));
    assert!(Rc::ptr_eq(&all[1], &second));
    assert!(Rc::ptr_eq(&all[2], &third));
}
