use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Domain errors surfaced to the user. Store failures are wrapped with
/// their full context chain already rendered.
#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("not a valid amount: '{0}'")]
    ParseAmount(String),

    #[error("not a valid date: '{0}' (expected YYYY-MM-DD)")]
    ParseDate(String),

    #[error("no payment plan named '{0}'")]
    PlanNotFound(String),

    #[error("invalid payment plan: {0}")]
    InvalidPlan(String),

    #[error("the deadline is today; no whole days remain")]
    DeadlineIsToday,

    #[error("storage error: {0}")]
    Store(String),
}

impl Error {
    pub(crate) fn store(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}
