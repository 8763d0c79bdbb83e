pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    time     TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    amount   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_time ON transactions(time);

CREATE TABLE IF NOT EXISTS deadline (
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS payment_plans (
    name              TEXT NOT NULL UNIQUE,
    amount            TEXT NOT NULL,
    installment_count INTEGER NOT NULL,
    first_due_date    TEXT NOT NULL,
    recurs_monthly    BOOLEAN NOT NULL DEFAULT 0,
    paid_count        INTEGER NOT NULL DEFAULT 0
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE payment_plans ADD COLUMN notes TEXT NOT NULL DEFAULT '';"),
];
