pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod reminders;
pub(crate) mod transactions;
