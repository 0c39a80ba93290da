use staffbook_core::{Department, Employee, Review, ValidationError, MIN_REVIEW_YEAR};

#[test]
fn new_accepts_the_minimum_year_exactly() {
    let review = Review::new(MIN_REVIEW_YEAR, "Boundary year", 1).unwrap();
    assert_eq!(review.year(), MIN_REVIEW_YEAR);
    assert_eq!(review.id(), None);
    assert!(!review.is_persisted());
}

#[test]
fn new_rejects_years_before_the_minimum() {
    let err = Review::new(1999, "Too early", 1).unwrap_err();
    assert_eq!(err, ValidationError::YearBeforeMinimum { year: 1999 });
}

#[test]
fn new_rejects_blank_summaries() {
    assert_eq!(
        Review::new(2023, "", 1).unwrap_err(),
        ValidationError::BlankSummary
    );
    assert_eq!(
        Review::new(2023, "   ", 1).unwrap_err(),
        ValidationError::BlankSummary
    );
}

#[test]
fn failed_setter_leaves_the_record_unchanged() {
    let mut review = Review::new(2023, "Keeps its state", 1).unwrap();

    let err = review.set_year(1990).unwrap_err();
    assert_eq!(err, ValidationError::YearBeforeMinimum { year: 1990 });
    assert_eq!(review.year(), 2023);

    let err = review.set_summary("  ").unwrap_err();
    assert_eq!(err, ValidationError::BlankSummary);
    assert_eq!(review.summary(), "Keeps its state");
}

#[test]
fn review_serialization_uses_expected_wire_fields() {
    let review = Review::new(2023, "Good work", 2).unwrap();

    let json = serde_json::to_value(&review).unwrap();
    assert!(json["id"].is_null());
    assert_eq!(json["year"], 2023);
    assert_eq!(json["summary"], "Good work");
    assert_eq!(json["employee_id"], 2);

    let decoded: Review = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, review);
}

#[test]
fn deserialize_rejects_invalid_field_values() {
    let err = serde_json::from_value::<Review>(serde_json::json!({
        "year": 1999,
        "summary": "Too early",
        "employee_id": 1
    }))
    .unwrap_err();
    assert!(
        err.to_string().contains("2000"),
        "unexpected error: {err}"
    );

    let err = serde_json::from_value::<Review>(serde_json::json!({
        "year": 2023,
        "summary": "  ",
        "employee_id": 1
    }))
    .unwrap_err();
    assert!(
        err.to_string().contains("blank"),
        "unexpected error: {err}"
    );
}

#[test]
fn employee_and_department_reject_blank_fields() {
    assert_eq!(
        Employee::new("", "Engineer", 1).unwrap_err(),
        ValidationError::BlankName
    );
    assert_eq!(
        Employee::new("Ada", "  ", 1).unwrap_err(),
        ValidationError::BlankJobTitle
    );
    assert_eq!(
        Department::new("", "Building A").unwrap_err(),
        ValidationError::BlankName
    );
    assert_eq!(
        Department::new("Engineering", "").unwrap_err(),
        ValidationError::BlankLocation
    );
}

#[test]
fn persisted_ids_survive_the_wire_format() {
    let json = serde_json::json!({
        "id": 42,
        "year": 2024,
        "summary": "Loaded from elsewhere",
        "employee_id": 7
    });
    let review: Review = serde_json::from_value(json).unwrap();
    assert_eq!(review.id(), Some(42));
    assert!(review.is_persisted());
}
