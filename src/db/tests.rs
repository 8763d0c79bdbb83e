#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(time: &str, category: &str, amount: Decimal) -> Transaction {
    Transaction {
        time: time.into(),
        category: category.into(),
        amount,
    }
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_transactions().unwrap().is_empty());
    assert!(db.get_plans().unwrap().is_empty());
    assert!(db.get_deadline().unwrap().is_none());
}

#[test]
fn test_transactions_roundtrip_ordered_by_time() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&txn("2024-02-05 09:00", "Food", dec!(-87.30)))
        .unwrap();
    db.insert_transaction(&txn("2024-01-20 18:30", "Salary", dec!(3000.00)))
        .unwrap();
    db.insert_transaction(&txn("2024-01-10 08:15", "Coffee", dec!(-5.25)))
        .unwrap();

    let txns = db.get_transactions().unwrap();
    assert_eq!(txns.len(), 3);
    let times: Vec<&str> = txns.iter().map(|t| t.time.as_str()).collect();
    assert_eq!(
        times,
        vec!["2024-01-10 08:15", "2024-01-20 18:30", "2024-02-05 09:00"]
    );
    assert_eq!(txns[0].amount, dec!(-5.25));
    assert_eq!(txns[1].category, "Salary");
}

#[test]
fn test_amount_precision_survives_roundtrip() {
    // Stored as decimal text, so no float drift.
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&txn("2024-01-01 00:00", "x", dec!(0.10)))
        .unwrap();
    db.insert_transaction(&txn("2024-01-01 00:01", "x", dec!(0.20)))
        .unwrap();
    let total: Decimal = db.get_transactions().unwrap().iter().map(|t| t.amount).sum();
    assert_eq!(total, dec!(0.30));
}

#[test]
fn test_replace_transactions_leaves_single_row() {
    let mut db = Database::open_in_memory().unwrap();
    for i in 0..5 {
        db.insert_transaction(&txn(&format!("2024-01-0{} 10:00", i + 1), "x", dec!(-1)))
            .unwrap();
    }

    db.replace_transactions(&txn("2024-02-01 12:00", "Initial balance", dec!(500)))
        .unwrap();

    let txns = db.get_transactions().unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category, "Initial balance");
    assert_eq!(txns[0].amount, dec!(500));
}

// ── Deadline ──────────────────────────────────────────────────

#[test]
fn test_deadline_set_and_replace() {
    let mut db = Database::open_in_memory().unwrap();
    db.set_deadline(date(2024, 6, 30)).unwrap();
    assert_eq!(db.get_deadline().unwrap(), Some(date(2024, 6, 30)));

    // A second set replaces the single row rather than adding one.
    db.set_deadline(date(2024, 12, 31)).unwrap();
    assert_eq!(db.get_deadline().unwrap(), Some(date(2024, 12, 31)));
}

// ── Payment plans ─────────────────────────────────────────────

fn loan() -> PaymentPlan {
    PaymentPlan::new("Loan".into(), dec!(1200), 12, date(2024, 1, 15), true)
}

#[test]
fn test_plan_roundtrip_rederives_due_dates() {
    let db = Database::open_in_memory().unwrap();
    db.insert_plan(&loan()).unwrap();

    let plans = db.get_plans().unwrap();
    assert_eq!(plans.len(), 1);
    let plan = &plans[0];
    assert_eq!(plan.name, "Loan");
    assert_eq!(plan.amount, dec!(1200));
    assert_eq!(plan.installment_count, 12);
    assert!(plan.recurs_monthly);
    assert_eq!(plan.paid_count, 0);
    assert_eq!(plan.due_dates().len(), 12);
    assert_eq!(plan.due_dates()[11], date(2024, 12, 15));
}

#[test]
fn test_plan_update_can_rename() {
    let db = Database::open_in_memory().unwrap();
    db.insert_plan(&loan()).unwrap();

    let mut edited = loan();
    edited.name = "Car loan".into();
    edited.installment_count = 6;
    edited.recompute_due_dates();
    db.update_plan("Loan", &edited).unwrap();

    let plans = db.get_plans().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].name, "Car loan");
    assert_eq!(plans[0].installment_count, 6);
}

#[test]
fn test_set_paid_count_persists() {
    let db = Database::open_in_memory().unwrap();
    db.insert_plan(&loan()).unwrap();
    db.set_paid_count("Loan", 3).unwrap();
    assert_eq!(db.get_plans().unwrap()[0].paid_count, 3);
}

#[test]
fn test_delete_plan_by_name() {
    let db = Database::open_in_memory().unwrap();
    db.insert_plan(&loan()).unwrap();
    db.delete_plan("Loan").unwrap();
    assert!(db.get_plans().unwrap().is_empty());

    // Deleting an absent row is a no-op at this layer; the session maps
    // it to PlanNotFound before it gets here.
    db.delete_plan("Loan").unwrap();
}

#[test]
fn test_duplicate_plan_name_rejected_by_store() {
    let db = Database::open_in_memory().unwrap();
    db.insert_plan(&loan()).unwrap();
    assert!(db.insert_plan(&loan()).is_err());
}
