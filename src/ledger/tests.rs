#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::errors::Error;
use crate::models::Transaction;

fn txn(category: &str, amount: Decimal) -> Transaction {
    Transaction {
        category: category.into(),
        amount,
        time: "2024-03-01 12:00".into(),
    }
}

fn sample_ledger() -> Vec<Transaction> {
    vec![
        txn("Salary", dec!(1000)),
        txn("Food", dec!(-200)),
        txn("Food", dec!(-50)),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── balance ───────────────────────────────────────────────────

#[test]
fn test_balance_is_sum_of_amounts() {
    assert_eq!(balance(&sample_ledger()), dec!(750));
}

#[test]
fn test_balance_empty_ledger_is_zero() {
    assert_eq!(balance(&[]), Decimal::ZERO);
}

#[test]
fn test_balance_all_expenses_is_negative() {
    let txns = vec![txn("Rent", dec!(-800)), txn("Food", dec!(-35.50))];
    assert_eq!(balance(&txns), dec!(-835.50));
}

// ── totals_by_category ────────────────────────────────────────

#[test]
fn test_expense_totals_grouped() {
    let totals = totals_by_category(&sample_ledger(), Sign::Expense);
    assert_eq!(totals, vec![("Food".to_string(), dec!(-250))]);
}

#[test]
fn test_income_totals_ignore_expenses() {
    let totals = totals_by_category(&sample_ledger(), Sign::Income);
    assert_eq!(totals, vec![("Salary".to_string(), dec!(1000))]);
}

#[test]
fn test_totals_sorted_by_category() {
    let txns = vec![
        txn("Transport", dec!(-10)),
        txn("Food", dec!(-20)),
        txn("Gym", dec!(-30)),
    ];
    let totals = totals_by_category(&txns, Sign::Expense);
    let names: Vec<&str> = totals.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Food", "Gym", "Transport"]);
}

#[test]
fn test_mixed_sign_category_splits_by_sign() {
    // Same category on both sides of the ledger.
    let txns = vec![txn("Misc", dec!(100)), txn("Misc", dec!(-40))];
    assert_eq!(
        totals_by_category(&txns, Sign::Expense),
        vec![("Misc".to_string(), dec!(-40))]
    );
    assert_eq!(
        totals_by_category(&txns, Sign::Income),
        vec![("Misc".to_string(), dec!(100))]
    );
}

#[test]
fn test_empty_category_is_grouped_too() {
    let txns = vec![txn("", dec!(-5)), txn("", dec!(-5))];
    assert_eq!(
        totals_by_category(&txns, Sign::Expense),
        vec![(String::new(), dec!(-10))]
    );
}

// ── daily_allowance ───────────────────────────────────────────

#[test]
fn test_allowance_divides_balance_by_days() {
    let result =
        daily_allowance(&sample_ledger(), date(2024, 3, 1), date(2024, 3, 6)).unwrap();
    assert_eq!(result.days_remaining, 5);
    assert_eq!(result.per_day, dec!(150));
}

#[test]
fn test_allowance_same_day_deadline_is_error() {
    let err = daily_allowance(&sample_ledger(), date(2024, 3, 1), date(2024, 3, 1));
    assert!(matches!(err, Err(Error::DeadlineIsToday)));
}

#[test]
fn test_allowance_past_deadline_goes_negative() {
    // Documented boundary behavior: no guard against a past deadline.
    let result =
        daily_allowance(&sample_ledger(), date(2024, 3, 11), date(2024, 3, 1)).unwrap();
    assert_eq!(result.days_remaining, -10);
    assert_eq!(result.per_day, dec!(-75));
}

#[test]
fn test_allowance_empty_ledger_is_zero_per_day() {
    let result = daily_allowance(&[], date(2024, 3, 1), date(2024, 3, 31)).unwrap();
    assert_eq!(result.per_day, Decimal::ZERO);
}
