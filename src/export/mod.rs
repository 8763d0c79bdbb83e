use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Transaction;

/// Write the ledger to a CSV file, one row per transaction in ledger
/// order. Returns the number of data rows written.
pub(crate) fn write_csv(path: &Path, txns: &[Transaction]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    writer
        .write_record(["Category", "Amount", "Time"])
        .context("Failed to write CSV header")?;

    for txn in txns {
        writer
            .write_record([
                txn.category.as_str(),
                &txn.amount.to_string(),
                txn.time.as_str(),
            ])
            .context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV export")?;
    Ok(txns.len())
}
