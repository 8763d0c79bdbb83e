use chrono::Local;
use rust_decimal::Decimal;

pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single ledger entry. Negative amounts are expenses, positive are
/// income. Entries are immutable once recorded; the only way to remove
/// them is a full balance correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub category: String,
    pub amount: Decimal,
    /// Minute-precision local timestamp, `YYYY-MM-DD HH:MM`.
    pub time: String,
}

impl Transaction {
    pub fn new(category: String, amount: Decimal) -> Self {
        Self {
            category,
            amount,
            time: Local::now().format(TIME_FORMAT).to_string(),
        }
    }

    /// The synthetic entry a balance correction replaces the ledger with.
    pub fn initial_balance(amount: Decimal) -> Self {
        Self::new("Initial balance".into(), amount)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
