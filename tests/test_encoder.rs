//! Tests for categorical encoding and the unseen-category fallback

use attrition::pipeline::{ColumnEncoder, UNKNOWN_CATEGORY};

fn department_encoder() -> ColumnEncoder {
    ColumnEncoder::fit(
        "Department",
        ["Sales", "Research & Development", "Sales", "Human Resources"]
            .into_iter()
            .map(Some),
    )
}

#[test]
fn test_sentinel_added_once_and_reused() {
    let mut encoder = department_encoder();

    let first = encoder.encode_lenient(Some("Marketing"));
    let second = encoder.encode_lenient(Some("Legal"));
    let null = encoder.encode_lenient(None);

    assert_eq!(first, 3);
    assert_eq!(second, 3);
    assert_eq!(null, 3);
    assert_eq!(encoder.classes().last().map(String::as_str), Some(UNKNOWN_CATEGORY));
    assert_eq!(encoder.len(), 4);
    assert_eq!(encoder.unknown_hits(), 3);
}

#[test]
fn test_known_values_unaffected_by_sentinel() {
    let mut encoder = department_encoder();
    encoder.encode_lenient(Some("Marketing"));

    assert_eq!(encoder.encode_lenient(Some("Sales")), 0);
    assert_eq!(encoder.encode_lenient(Some("Human Resources")), 2);
    assert_eq!(encoder.unknown_hits(), 1);
}

#[test]
fn test_matching_is_case_sensitive() {
    let mut encoder = department_encoder();
    assert_eq!(encoder.encode_lenient(Some("sales")), 3);
}
