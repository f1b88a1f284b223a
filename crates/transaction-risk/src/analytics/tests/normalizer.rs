use super::common::{at, credit, debit};
use crate::analytics::normalizer::normalize;

#[test]
fn rows_come_back_sorted_by_date() {
    let transactions = vec![
        debit(at(2024, 3, 15), 50.0, "groceries"),
        credit(at(2024, 1, 2), 1000.0, "salary"),
        debit(at(2024, 2, 10), 75.0, "fuel"),
    ];

    let rows = normalize(&transactions);

    let months: Vec<&str> = rows.iter().map(|row| row.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
}

#[test]
fn saturday_and_sunday_are_weekend() {
    // 2024-01-06 is a Saturday, 2024-01-07 a Sunday, 2024-01-03 a Wednesday.
    let transactions = vec![
        debit(at(2024, 1, 6), 10.0, "party"),
        debit(at(2024, 1, 7), 10.0, "party"),
        debit(at(2024, 1, 3), 10.0, "groceries"),
    ];

    let rows = normalize(&transactions);

    assert!(rows[0].is_weekend);
    assert!(rows[1].is_weekend);
    assert!(!rows[2].is_weekend);
}

#[test]
fn categories_are_lowercased() {
    let transactions = vec![debit(at(2024, 1, 3), 10.0, "Groceries")];

    let rows = normalize(&transactions);

    assert_eq!(rows[0].category, "groceries");
}

#[test]
fn empty_input_yields_no_rows() {
    assert!(normalize(&[]).is_empty());
}
