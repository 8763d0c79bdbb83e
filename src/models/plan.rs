use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

/// A named installment-based payment obligation. The due-date sequence is
/// derived eagerly from `first_due_date` and `installment_count` and kept
/// in sync whenever either field changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPlan {
    /// Unique key across all plans.
    pub name: String,
    pub amount: Decimal,
    pub installment_count: u32,
    pub first_due_date: NaiveDate,
    pub recurs_monthly: bool,
    /// Incremented once per registered payment. Deliberately unchecked
    /// against `installment_count`; see [`PaymentPlan::is_overpaid`].
    pub paid_count: u32,
    due_dates: Vec<NaiveDate>,
}

impl PaymentPlan {
    pub fn new(
        name: String,
        amount: Decimal,
        installment_count: u32,
        first_due_date: NaiveDate,
        recurs_monthly: bool,
    ) -> Self {
        Self::with_paid_count(
            name,
            amount,
            installment_count,
            first_due_date,
            recurs_monthly,
            0,
        )
    }

    /// Used when rehydrating from the store, where `paid_count` is a
    /// persisted column.
    pub fn with_paid_count(
        name: String,
        amount: Decimal,
        installment_count: u32,
        first_due_date: NaiveDate,
        recurs_monthly: bool,
        paid_count: u32,
    ) -> Self {
        Self {
            name,
            amount,
            installment_count,
            first_due_date,
            recurs_monthly,
            paid_count,
            due_dates: schedule(first_due_date, installment_count),
        }
    }

    pub fn due_dates(&self) -> &[NaiveDate] {
        &self.due_dates
    }

    /// Recompute the due-date sequence after a field edit. Must be called
    /// whenever `first_due_date` or `installment_count` changes.
    pub fn recompute_due_dates(&mut self) {
        self.due_dates = schedule(self.first_due_date, self.installment_count);
    }

    /// The next unpaid due date, or `None` once every installment is paid.
    /// Safe under overpayment: an out-of-range `paid_count` also yields
    /// `None` rather than indexing past the schedule.
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        self.due_dates.get(self.paid_count as usize).copied()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.paid_count >= self.installment_count
    }

    /// More payments registered than installments exist. Representable
    /// because payment registration never enforces an upper bound.
    pub fn is_overpaid(&self) -> bool {
        self.paid_count > self.installment_count
    }
}

/// Monthly due dates: `first_due + i calendar months` for each installment.
/// Calendar arithmetic, not 30-day steps; chrono clamps the day-of-month
/// for short months (Jan 31 + 1 month = Feb 28/29).
pub fn schedule(first_due: NaiveDate, installment_count: u32) -> Vec<NaiveDate> {
    (0..installment_count)
        .map(|i| {
            first_due
                .checked_add_months(Months::new(i))
                .unwrap_or(first_due)
        })
        .collect()
}
