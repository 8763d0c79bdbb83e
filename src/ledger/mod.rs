//! Pure aggregation over the in-memory transaction list. Nothing here
//! touches the store; the session owns persistence.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::models::Transaction;

/// Which side of the ledger an aggregation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sign {
    Income,
    Expense,
}

impl Sign {
    pub(crate) fn matches(self, amount: Decimal) -> bool {
        match self {
            Self::Income => amount > Decimal::ZERO,
            Self::Expense => amount < Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expenses"),
        }
    }
}

/// Sum of all amounts; an empty ledger has balance zero.
pub(crate) fn balance(txns: &[Transaction]) -> Decimal {
    txns.iter().map(|t| t.amount).sum()
}

/// Per-category totals over entries matching `sign`, sorted by category
/// name. Expense totals stay negative, matching the recorded amounts.
pub(crate) fn totals_by_category(txns: &[Transaction], sign: Sign) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in txns.iter().filter(|t| sign.matches(t.amount)) {
        *totals.entry(txn.category.as_str()).or_default() += txn.amount;
    }
    totals
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect()
}

/// The daily-allowance figure for a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Allowance {
    pub(crate) deadline: NaiveDate,
    pub(crate) days_remaining: i64,
    pub(crate) per_day: Decimal,
}

/// Balance divided by whole days until `deadline`. A same-day deadline is
/// an explicit error rather than a division by zero. A past deadline is
/// not guarded: the negative day count yields a negative or inverted
/// allowance, which is documented boundary behavior.
pub(crate) fn daily_allowance(
    txns: &[Transaction],
    today: NaiveDate,
    deadline: NaiveDate,
) -> Result<Allowance> {
    let days_remaining = deadline.signed_duration_since(today).num_days();
    if days_remaining == 0 {
        return Err(Error::DeadlineIsToday);
    }
    Ok(Allowance {
        deadline,
        days_remaining,
        per_day: balance(txns) / Decimal::from(days_remaining),
    })
}

#[cfg(test)]
mod tests;
