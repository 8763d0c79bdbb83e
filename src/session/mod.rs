//! The session owns the in-memory ledger, payment plans, and allowance
//! deadline. The database is a mirror: reads flow store → session only at
//! startup or explicit reload, every mutation here commits the matching
//! store write before returning. The presentation layer holds a session
//! and nothing else; there is no process-wide state.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::errors::{Error, Result};
use crate::ledger::{self, Allowance, Sign};
use crate::models::{PaymentPlan, Transaction};

pub(crate) struct Session {
    db: Database,
    transactions: Vec<Transaction>,
    plans: Vec<PaymentPlan>,
    deadline: Option<NaiveDate>,
}

/// Partial update for [`Session::edit_plan`]; `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlanEdit {
    pub(crate) name: Option<String>,
    pub(crate) amount: Option<Decimal>,
    pub(crate) installment_count: Option<u32>,
    pub(crate) first_due_date: Option<NaiveDate>,
    pub(crate) recurs_monthly: Option<bool>,
}

impl Session {
    /// Load all persisted state into memory.
    pub(crate) fn load(db: Database) -> anyhow::Result<Self> {
        let transactions = db.get_transactions()?;
        let mut plans = db.get_plans()?;
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        let deadline = db.get_deadline()?;
        Ok(Self {
            db,
            transactions,
            plans,
            deadline,
        })
    }

    /// Discard in-memory state and re-read everything from the store.
    pub(crate) fn reload(&mut self) -> Result<()> {
        self.transactions = self.db.get_transactions().map_err(Error::store)?;
        self.plans = self.db.get_plans().map_err(Error::store)?;
        self.plans.sort_by(|a, b| a.name.cmp(&b.name));
        self.deadline = self.db.get_deadline().map_err(Error::store)?;
        Ok(())
    }

    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn plans(&self) -> &[PaymentPlan] {
        &self.plans
    }

    pub(crate) fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    // ── Ledger operations ─────────────────────────────────────

    /// Record an entry. `sign` decides which side of the ledger the parsed
    /// (absolute) amount lands on; an unparsable amount aborts with
    /// nothing committed. Empty categories are allowed. Returns the signed
    /// amount that was recorded.
    pub(crate) fn add_transaction(
        &mut self,
        category: &str,
        amount_text: &str,
        sign: Sign,
    ) -> Result<Decimal> {
        let amount = parse_amount(amount_text)?;
        let amount = match sign {
            Sign::Income => amount.abs(),
            Sign::Expense => -amount.abs(),
        };
        let txn = Transaction::new(category.to_string(), amount);
        self.db.insert_transaction(&txn).map_err(Error::store)?;
        self.transactions.push(txn);
        Ok(amount)
    }

    pub(crate) fn balance(&self) -> Decimal {
        ledger::balance(&self.transactions)
    }

    pub(crate) fn totals_by_category(&self, sign: Sign) -> Vec<(String, Decimal)> {
        ledger::totals_by_category(&self.transactions, sign)
    }

    /// Balance correction: throw away the whole history, in memory and in
    /// the store, and start over from a single synthetic entry stamped
    /// now. Irreversible.
    pub(crate) fn reset_with_initial_balance(&mut self, amount_text: &str) -> Result<Decimal> {
        let amount = parse_amount(amount_text)?;
        let txn = Transaction::initial_balance(amount);
        self.db.replace_transactions(&txn).map_err(Error::store)?;
        self.transactions = vec![txn];
        Ok(amount)
    }

    pub(crate) fn set_deadline(&mut self, text: &str) -> Result<NaiveDate> {
        let date = parse_date(text)?;
        self.db.set_deadline(date).map_err(Error::store)?;
        self.deadline = Some(date);
        Ok(date)
    }

    /// Daily allowance against the stored deadline; `None` when no
    /// deadline has been set yet.
    pub(crate) fn daily_allowance(&self, today: NaiveDate) -> Result<Option<Allowance>> {
        match self.deadline {
            Some(deadline) => {
                ledger::daily_allowance(&self.transactions, today, deadline).map(Some)
            }
            None => Ok(None),
        }
    }

    pub(crate) fn daily_allowance_today(&self) -> Result<Option<Allowance>> {
        self.daily_allowance(Local::now().date_naive())
    }

    // ── Payment plans ─────────────────────────────────────────

    pub(crate) fn plan(&self, name: &str) -> Option<&PaymentPlan> {
        self.plans.iter().find(|p| p.name == name)
    }

    pub(crate) fn create_plan(
        &mut self,
        name: &str,
        amount_text: &str,
        installment_count: u32,
        first_due_text: &str,
        recurs_monthly: bool,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidPlan("plan name must not be empty".into()));
        }
        if installment_count == 0 {
            return Err(Error::InvalidPlan(
                "installment count must be at least 1".into(),
            ));
        }
        if self.plan(name).is_some() {
            return Err(Error::InvalidPlan(format!(
                "a plan named '{name}' already exists"
            )));
        }
        let amount = parse_amount(amount_text)?;
        let first_due = parse_date(first_due_text)?;

        let plan = PaymentPlan::new(
            name.to_string(),
            amount,
            installment_count,
            first_due,
            recurs_monthly,
        );
        self.db.insert_plan(&plan).map_err(Error::store)?;
        self.plans.push(plan);
        self.plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Partial edit by name. Changing the due-date-governing fields
    /// (first_due_date, installment_count) recomputes the schedule from
    /// scratch. `paid_count` is left untouched even when the new
    /// installment count falls below it; the overpaid state stays
    /// queryable instead.
    pub(crate) fn edit_plan(&mut self, name: &str, edit: PlanEdit) -> Result<()> {
        if let Some(new_name) = edit.name.as_deref() {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(Error::InvalidPlan("plan name must not be empty".into()));
            }
            if new_name != name && self.plan(new_name).is_some() {
                return Err(Error::InvalidPlan(format!(
                    "a plan named '{new_name}' already exists"
                )));
            }
        }
        if edit.installment_count == Some(0) {
            return Err(Error::InvalidPlan(
                "installment count must be at least 1".into(),
            ));
        }

        let idx = self
            .plans
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::PlanNotFound(name.to_string()))?;

        // Edit a copy and only install it once the store write commits,
        // so a failed write leaves memory matching the store.
        let mut updated = self.plans[idx].clone();
        if let Some(new_name) = edit.name {
            updated.name = new_name.trim().to_string();
        }
        if let Some(amount) = edit.amount {
            updated.amount = amount;
        }
        if let Some(recurs) = edit.recurs_monthly {
            updated.recurs_monthly = recurs;
        }
        let reschedule = edit.installment_count.is_some() || edit.first_due_date.is_some();
        if let Some(count) = edit.installment_count {
            updated.installment_count = count;
        }
        if let Some(first_due) = edit.first_due_date {
            updated.first_due_date = first_due;
        }
        if reschedule {
            updated.recompute_due_dates();
        }

        self.db.update_plan(name, &updated).map_err(Error::store)?;
        self.plans[idx] = updated;
        self.plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    pub(crate) fn delete_plan(&mut self, name: &str) -> Result<()> {
        let idx = self
            .plans
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::PlanNotFound(name.to_string()))?;
        self.db.delete_plan(name).map_err(Error::store)?;
        self.plans.remove(idx);
        Ok(())
    }

    /// Register one installment payment. The increment is deliberately
    /// unbounded; callers can observe overpayment through
    /// [`PaymentPlan::is_overpaid`]. Returns the new paid count.
    pub(crate) fn register_payment(&mut self, name: &str) -> Result<u32> {
        let plan = self
            .plans
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::PlanNotFound(name.to_string()))?;
        let paid = plan.paid_count + 1;
        self.db.set_paid_count(name, paid).map_err(Error::store)?;
        plan.paid_count = paid;
        Ok(paid)
    }
}

/// Parse a user-entered amount into a decimal. Accepts an optional leading
/// sign; anything else is a ParseAmount error.
pub(crate) fn parse_amount(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed).map_err(|_| Error::ParseAmount(trimmed.to_string()))
}

/// Parse a user-entered date. `YYYY-MM-DD` is canonical; `DD-MM-YYYY` and
/// `/` separators are accepted because the original entry dialog was
/// day-first.
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate> {
    let normalized = text.trim().replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d-%m-%Y"))
        .map_err(|_| Error::ParseDate(text.trim().to_string()))
}

#[cfg(test)]
mod tests;
