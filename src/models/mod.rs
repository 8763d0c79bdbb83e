mod plan;
mod transaction;

pub use plan::{schedule, PaymentPlan};
pub use transaction::Transaction;
pub(crate) use transaction::TIME_FORMAT;
