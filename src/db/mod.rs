mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{PaymentPlan, Transaction};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// File-backed mirror of the session state. Three tables: `transactions`,
/// `deadline` (single row), `payment_plans`. Every mutating call commits
/// before returning; reads happen only at startup or explicit reload.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO transactions (time, category, amount) VALUES (?1, ?2, ?3)",
            params![txn.time, txn.category, txn.amount.to_string()],
        )?;
        Ok(())
    }

    /// Full ledger ordered by time, oldest first.
    pub(crate) fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self
            .conn
            .prepare("SELECT time, category, amount FROM transactions ORDER BY time")?;
        let rows = stmt.query_map([], |row| {
            let amount_str: String = row.get(2)?;
            Ok(Transaction {
                time: row.get(0)?,
                category: row.get(1)?,
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Balance correction: drop every row and insert the single synthetic
    /// entry, as one SQL transaction so a crash cannot leave the table
    /// half-replaced.
    pub(crate) fn replace_transactions(&mut self, txn: &Transaction) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        tx.execute(
            "INSERT INTO transactions (time, category, amount) VALUES (?1, ?2, ?3)",
            params![txn.time, txn.category, txn.amount.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Deadline ──────────────────────────────────────────────

    pub(crate) fn get_deadline(&self) -> Result<Option<NaiveDate>> {
        let result: std::result::Result<String, _> =
            self.conn
                .query_row("SELECT date FROM deadline LIMIT 1", [], |row| row.get(0));
        match result {
            Ok(s) => Ok(NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The deadline table holds at most one row; setting replaces it.
    pub(crate) fn set_deadline(&mut self, date: NaiveDate) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM deadline", [])?;
        tx.execute(
            "INSERT INTO deadline (date) VALUES (?1)",
            params![date.format(DATE_FORMAT).to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Payment plans ─────────────────────────────────────────

    pub(crate) fn insert_plan(&self, plan: &PaymentPlan) -> Result<()> {
        self.conn.execute(
            "INSERT INTO payment_plans
                (name, amount, installment_count, first_due_date, recurs_monthly, paid_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plan.name,
                plan.amount.to_string(),
                plan.installment_count,
                plan.first_due_date.format(DATE_FORMAT).to_string(),
                plan.recurs_monthly,
                plan.paid_count,
            ],
        )?;
        Ok(())
    }

    /// All plans, unordered in the store; callers sort as needed. The due
    /// dates are derived on load, not persisted.
    pub(crate) fn get_plans(&self) -> Result<Vec<PaymentPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, amount, installment_count, first_due_date, recurs_monthly, paid_count
             FROM payment_plans",
        )?;
        let rows = stmt.query_map([], |row| {
            let amount_str: String = row.get(1)?;
            let first_due_str: String = row.get(3)?;
            Ok(PaymentPlan::with_paid_count(
                row.get(0)?,
                Decimal::from_str(&amount_str).unwrap_or_default(),
                row.get(2)?,
                NaiveDate::parse_from_str(&first_due_str, DATE_FORMAT)
                    .unwrap_or_default(),
                row.get(4)?,
                row.get(5)?,
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Rewrite every column of the plan row keyed by its pre-edit name.
    pub(crate) fn update_plan(&self, original_name: &str, plan: &PaymentPlan) -> Result<()> {
        self.conn.execute(
            "UPDATE payment_plans
             SET name = ?1, amount = ?2, installment_count = ?3,
                 first_due_date = ?4, recurs_monthly = ?5, paid_count = ?6
             WHERE name = ?7",
            params![
                plan.name,
                plan.amount.to_string(),
                plan.installment_count,
                plan.first_due_date.format(DATE_FORMAT).to_string(),
                plan.recurs_monthly,
                plan.paid_count,
                original_name,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn set_paid_count(&self, name: &str, paid_count: u32) -> Result<()> {
        self.conn.execute(
            "UPDATE payment_plans SET paid_count = ?1 WHERE name = ?2",
            params![paid_count, name],
        )?;
        Ok(())
    }

    pub(crate) fn delete_plan(&self, name: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM payment_plans WHERE name = ?1", params![name])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
