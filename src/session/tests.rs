#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::errors::Error;
use crate::ledger::Sign;

fn session() -> Session {
    Session::load(Database::open_in_memory().unwrap()).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Ledger ────────────────────────────────────────────────────

#[test]
fn test_balance_tracks_adds() {
    let mut s = session();
    s.add_transaction("Salary", "1000", Sign::Income).unwrap();
    s.add_transaction("Food", "200", Sign::Expense).unwrap();
    s.add_transaction("Food", "50", Sign::Expense).unwrap();

    assert_eq!(s.balance(), dec!(750));
    assert_eq!(
        s.totals_by_category(Sign::Expense),
        vec![("Food".to_string(), dec!(-250))]
    );
}

#[test]
fn test_expense_sign_applied_regardless_of_input_sign() {
    let mut s = session();
    // The entry form captures magnitude; the button decides the sign.
    let recorded = s.add_transaction("Food", "-25", Sign::Expense).unwrap();
    assert_eq!(recorded, dec!(-25));
    let recorded = s.add_transaction("Salary", "-100", Sign::Income).unwrap();
    assert_eq!(recorded, dec!(100));
}

#[test]
fn test_unparsable_amount_aborts_without_commit() {
    let mut s = session();
    let err = s.add_transaction("Food", "12,50x", Sign::Expense);
    assert!(matches!(err, Err(Error::ParseAmount(_))));
    assert!(s.transactions().is_empty());
    // The store mirror must be untouched too.
    s.reload().unwrap();
    assert!(s.transactions().is_empty());
}

#[test]
fn test_empty_category_allowed() {
    let mut s = session();
    s.add_transaction("", "10", Sign::Expense).unwrap();
    assert_eq!(s.transactions().len(), 1);
    assert_eq!(s.transactions()[0].category, "");
}

#[test]
fn test_reset_discards_history() {
    let mut s = session();
    s.add_transaction("Salary", "1000", Sign::Income).unwrap();
    s.add_transaction("Food", "200", Sign::Expense).unwrap();

    let amount = s.reset_with_initial_balance("325.75").unwrap();
    assert_eq!(amount, dec!(325.75));
    assert_eq!(s.transactions().len(), 1);
    assert_eq!(s.balance(), dec!(325.75));

    // Persisted form matches: exactly one row after reload.
    s.reload().unwrap();
    assert_eq!(s.transactions().len(), 1);
    assert_eq!(s.balance(), dec!(325.75));
}

#[test]
fn test_reset_rejects_bad_amount() {
    let mut s = session();
    s.add_transaction("Salary", "1000", Sign::Income).unwrap();
    assert!(matches!(
        s.reset_with_initial_balance("abc"),
        Err(Error::ParseAmount(_))
    ));
    // Failed reset leaves the ledger alone.
    assert_eq!(s.transactions().len(), 1);
}

// ── Deadline / allowance ──────────────────────────────────────

#[test]
fn test_allowance_without_deadline_is_none() {
    let s = session();
    assert!(s.daily_allowance(date(2024, 3, 1)).unwrap().is_none());
}

#[test]
fn test_allowance_with_deadline() {
    let mut s = session();
    s.add_transaction("Salary", "750", Sign::Income).unwrap();
    s.set_deadline("2024-03-06").unwrap();

    let allowance = s.daily_allowance(date(2024, 3, 1)).unwrap().unwrap();
    assert_eq!(allowance.days_remaining, 5);
    assert_eq!(allowance.per_day, dec!(150));
}

#[test]
fn test_allowance_same_day_deadline_errors() {
    let mut s = session();
    s.set_deadline("2024-03-01").unwrap();
    assert!(matches!(
        s.daily_allowance(date(2024, 3, 1)),
        Err(Error::DeadlineIsToday)
    ));
}

#[test]
fn test_deadline_accepts_day_first_and_slashes() {
    let mut s = session();
    assert_eq!(s.set_deadline("31-12-2024").unwrap(), date(2024, 12, 31));
    assert_eq!(s.set_deadline("2025/01/15").unwrap(), date(2025, 1, 15));
    assert!(matches!(
        s.set_deadline("next tuesday"),
        Err(Error::ParseDate(_))
    ));
}

#[test]
fn test_deadline_survives_reload() {
    let mut s = session();
    s.set_deadline("2024-06-30").unwrap();
    s.reload().unwrap();
    assert_eq!(s.deadline(), Some(date(2024, 6, 30)));
}

// ── Payment plans ─────────────────────────────────────────────

fn with_loan(s: &mut Session) {
    s.create_plan("Loan", "1200", 12, "2024-01-15", true).unwrap();
}

#[test]
fn test_create_plan_and_schedule() {
    let mut s = session();
    with_loan(&mut s);

    let plan = s.plan("Loan").unwrap();
    assert_eq!(plan.due_dates().len(), 12);
    assert_eq!(plan.due_dates()[0], date(2024, 1, 15));
    assert_eq!(plan.due_dates()[11], date(2024, 12, 15));
    assert_eq!(plan.next_due_date(), Some(date(2024, 1, 15)));
}

#[test]
fn test_create_plan_validation() {
    let mut s = session();
    assert!(matches!(
        s.create_plan("", "100", 3, "2024-01-01", false),
        Err(Error::InvalidPlan(_))
    ));
    assert!(matches!(
        s.create_plan("Rent", "100", 0, "2024-01-01", false),
        Err(Error::InvalidPlan(_))
    ));
    assert!(matches!(
        s.create_plan("Rent", "abc", 3, "2024-01-01", false),
        Err(Error::ParseAmount(_))
    ));
    assert!(matches!(
        s.create_plan("Rent", "100", 3, "soon", false),
        Err(Error::ParseDate(_))
    ));
    assert!(s.plans().is_empty());

    with_loan(&mut s);
    assert!(matches!(
        s.create_plan("Loan", "1", 1, "2024-01-01", false),
        Err(Error::InvalidPlan(_))
    ));
}

#[test]
fn test_register_payment_until_sentinel() {
    let mut s = session();
    with_loan(&mut s);

    for i in 1..=12u32 {
        assert_eq!(s.register_payment("Loan").unwrap(), i);
    }
    let plan = s.plan("Loan").unwrap();
    assert!(plan.is_fully_paid());
    assert_eq!(plan.next_due_date(), None);

    // No upper bound: the 13th payment is recorded and flagged.
    s.register_payment("Loan").unwrap();
    let plan = s.plan("Loan").unwrap();
    assert!(plan.is_overpaid());
    assert_eq!(plan.next_due_date(), None);

    // Overpaid state is persisted, not just in memory.
    s.reload().unwrap();
    assert!(s.plan("Loan").unwrap().is_overpaid());
}

#[test]
fn test_register_payment_unknown_plan() {
    let mut s = session();
    assert!(matches!(
        s.register_payment("Loaan"),
        Err(Error::PlanNotFound(_))
    ));
}

#[test]
fn test_edit_plan_partial_update() {
    let mut s = session();
    with_loan(&mut s);
    s.register_payment("Loan").unwrap();

    s.edit_plan(
        "Loan",
        PlanEdit {
            amount: Some(dec!(1500)),
            first_due_date: Some(date(2024, 2, 1)),
            ..Default::default()
        },
    )
    .unwrap();

    let plan = s.plan("Loan").unwrap();
    assert_eq!(plan.amount, dec!(1500));
    // Due dates recomputed from the new start, untouched fields kept.
    assert_eq!(plan.due_dates()[0], date(2024, 2, 1));
    assert_eq!(plan.installment_count, 12);
    assert!(plan.recurs_monthly);
    assert_eq!(plan.paid_count, 1);
}

#[test]
fn test_edit_plan_rename_persists() {
    let mut s = session();
    with_loan(&mut s);

    s.edit_plan(
        "Loan",
        PlanEdit {
            name: Some("Car loan".into()),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(s.plan("Loan").is_none());
    assert!(s.plan("Car loan").is_some());
    s.reload().unwrap();
    assert!(s.plan("Car loan").is_some());
}

#[test]
fn test_edit_plan_shrinking_count_keeps_paid_count() {
    let mut s = session();
    with_loan(&mut s);
    for _ in 0..5 {
        s.register_payment("Loan").unwrap();
    }

    s.edit_plan(
        "Loan",
        PlanEdit {
            installment_count: Some(3),
            ..Default::default()
        },
    )
    .unwrap();

    // paid_count is not clamped; the plan reports overpaid instead.
    let plan = s.plan("Loan").unwrap();
    assert_eq!(plan.paid_count, 5);
    assert_eq!(plan.due_dates().len(), 3);
    assert!(plan.is_overpaid());
    assert_eq!(plan.next_due_date(), None);
}

#[test]
fn test_edit_plan_rejects_duplicate_and_unknown() {
    let mut s = session();
    with_loan(&mut s);
    s.create_plan("Rent", "900", 6, "2024-02-01", true).unwrap();

    assert!(matches!(
        s.edit_plan(
            "Rent",
            PlanEdit {
                name: Some("Loan".into()),
                ..Default::default()
            }
        ),
        Err(Error::InvalidPlan(_))
    ));
    assert!(matches!(
        s.edit_plan("Mortgage", PlanEdit::default()),
        Err(Error::PlanNotFound(_))
    ));
}

#[test]
fn test_delete_plan_explicit_not_found() {
    let mut s = session();
    with_loan(&mut s);

    s.delete_plan("Loan").unwrap();
    assert!(s.plans().is_empty());

    // A second delete is a PlanNotFound, not a silent no-op.
    assert!(matches!(
        s.delete_plan("Loan"),
        Err(Error::PlanNotFound(_))
    ));
}

#[test]
fn test_plans_sorted_by_name() {
    let mut s = session();
    s.create_plan("Rent", "900", 6, "2024-02-01", true).unwrap();
    with_loan(&mut s);
    let names: Vec<&str> = s.plans().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Loan", "Rent"]);
}

// ── store failures ────────────────────────────────────────────

/// File-backed session plus a second connection that can break the
/// schema underneath it to force store write failures.
fn sabotaged_session(dir: &tempfile::TempDir) -> (Session, rusqlite::Connection) {
    let path = dir.path().join("saldo.db");
    let s = Session::load(Database::open(&path).unwrap()).unwrap();
    let raw = rusqlite::Connection::open(&path).unwrap();
    (s, raw)
}

#[test]
fn test_register_payment_store_failure_keeps_memory() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, raw) = sabotaged_session(&dir);
    with_loan(&mut s);

    raw.execute("DROP TABLE payment_plans", []).unwrap();

    assert!(matches!(
        s.register_payment("Loan"),
        Err(Error::Store(_))
    ));
    // The failed write must not leave memory ahead of the store.
    assert_eq!(s.plan("Loan").unwrap().paid_count, 0);
}

#[test]
fn test_edit_plan_store_failure_keeps_memory() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, raw) = sabotaged_session(&dir);
    with_loan(&mut s);

    raw.execute("DROP TABLE payment_plans", []).unwrap();

    let result = s.edit_plan(
        "Loan",
        PlanEdit {
            name: Some("Car loan".into()),
            amount: Some(dec!(9999)),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::Store(_))));

    let plan = s.plan("Loan").unwrap();
    assert_eq!(plan.amount, dec!(1200));
    assert!(s.plan("Car loan").is_none());
}

// ── parse helpers ─────────────────────────────────────────────

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
    assert_eq!(parse_amount("-3").unwrap(), dec!(-3));
    assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    assert!(parse_amount("").is_err());
    assert!(parse_amount("12.5.0").is_err());
}
